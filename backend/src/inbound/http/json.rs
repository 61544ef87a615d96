//! JSON body extraction settings.
//!
//! Every decode failure becomes `400` with a one-line diagnostic before any
//! handler (and therefore any persistence call) runs.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use tracing::debug;

use crate::domain::Error;

/// Largest accepted JSON body.
pub const JSON_LIMIT_BYTES: usize = 64 * 1024;

fn reject_payload(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "rejected JSON body");
    Error::invalid_request(format!("malformed JSON body: {err}")).into()
}

/// Build the [`web::JsonConfig`] shared by all handlers.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(reject_payload)
}

//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Handlers only persist or clear the caller's email; reading it back is the
//! job of the auth gate, which exposes it as a
//! [`CurrentUser`](super::current_user::CurrentUser).

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::{Email, Error};

/// Session key holding the authenticated user's email.
pub(crate) const USER_EMAIL_KEY: &str = "userEmail";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's email in the session cookie.
    pub fn persist_user(&self, email: &Email) -> Result<(), Error> {
        self.0.renew();
        self.0.insert(USER_EMAIL_KEY, email.as_ref()).map_err(|err| {
            error!(error = %err, "failed to persist session");
            Error::internal("Could not save session")
        })
    }

    /// Forget the authenticated user.
    pub fn clear_user(&self) {
        self.0.remove(USER_EMAIL_KEY);
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

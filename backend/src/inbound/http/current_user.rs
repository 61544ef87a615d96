//! Request-scoped caller identity.
//!
//! The auth gate inserts a [`CurrentUser`] into the request extensions when
//! the session carries a user. Extraction fails with `401 login required`
//! when it is absent; use `Option<CurrentUser>` to accept anonymous callers.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{Email, Error};

/// Authenticated caller of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(Email);

impl CurrentUser {
    /// Wrap the caller's email.
    pub fn new(email: Email) -> Self {
        Self(email)
    }

    /// Caller's email.
    pub fn email(&self) -> &Email {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| Error::unauthorized("login required")),
        )
    }
}

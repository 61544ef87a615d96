//! Driving port for account use-cases: registration, login, and profiles.
//!
//! Inbound adapters call this port without knowing how accounts are stored,
//! so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Email, Error, LoginCredentials, Registration, UserDetails};

/// Domain use-case port for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Hash the password and store a new account.
    async fn register(&self, registration: Registration) -> Result<(), Error>;

    /// Verify credentials and return the authenticated email.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Email, Error>;

    /// Public profile of the given user.
    async fn profile(&self, email: &Email) -> Result<UserDetails, Error>;
}

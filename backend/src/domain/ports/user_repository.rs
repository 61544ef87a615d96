//! Driven port for user account persistence.

use async_trait::async_trait;

use crate::domain::{Email, ProjectId, UserAccount, UserDetails};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// An account with this email already exists.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Port for storing and looking up user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with [`UserRepositoryError::DuplicateEmail`] when the email is
    /// already registered.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    /// Fetch an account by its normalised email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Users holding at least one of `skills`, excluding the project's
    /// manager and current team members, ordered by email.
    ///
    /// An empty skill list matches nobody.
    async fn find_eligible(
        &self,
        project_id: ProjectId,
        skills: &[String],
    ) -> Result<Vec<UserDetails>, UserRepositoryError>;
}

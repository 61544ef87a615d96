//! Driven port for password hashing and verification.
//!
//! Argon2 is CPU-bound for tens of milliseconds per call, so adapters run it
//! off the async workers.

use async_trait::async_trait;

use crate::domain::{PasswordDigest, PasswordHashingError};

/// Hashes new passwords and checks candidates against stored digests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted digest of `password`.
    async fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashingError>;

    /// Whether `candidate` matches `digest`.
    async fn verify(&self, digest: &PasswordDigest, candidate: &str) -> bool;
}

//! Authentication primitives: login credentials and password digests.
//!
//! Inbound payloads are validated here before a handler talks to a port, and
//! raw passwords only ever live inside zeroizing buffers.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use tokio::task;
use tracing::error;
use zeroize::Zeroizing;

use super::email::{Email, EmailValidationError};
use super::ports::CredentialHasher;

/// Well-formed Argon2id digest with default parameters that matches no
/// password. Verifying against it costs as much as a real account.
const UNKNOWN_ACCOUNT_PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$Y29ubmVjdGFiaWxpdHlzbA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail(EmailValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<EmailValidationError> for LoginValidationError {
    fn from(value: EmailValidationError) -> Self {
        Self::InvalidEmail(value)
    }
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is normalised (see [`Email`]).
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use connectability::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("A@x.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "a@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the user lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashingError {
    message: String,
}

impl PasswordHashingError {
    /// Wrap a failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Argon2id digest in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a raw password with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, PasswordHashingError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashingError::new(err.to_string()))?;
        Ok(Self(digest.to_string()))
    }

    /// Stand-in checked when a login names no account, so unknown emails
    /// take as long to refuse as wrong passwords.
    pub fn unknown_account() -> Self {
        Self::from_stored(UNKNOWN_ACCOUNT_PHC)
    }

    /// Wrap a digest previously produced by [`PasswordDigest::hash`].
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check a candidate password against this digest.
    ///
    /// Unparseable digests never verify.
    pub fn verify(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(error) => {
                tracing::warn!(%error, "stored password digest is not a valid PHC string");
                false
            }
        }
    }
}

impl AsRef<str> for PasswordDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// [`CredentialHasher`] running Argon2id on Tokio's blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2CredentialHasher;

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashingError> {
        let password = Zeroizing::new(password.to_owned());
        task::spawn_blocking(move || PasswordDigest::hash(&password))
            .await
            .map_err(|err| PasswordHashingError::new(err.to_string()))?
    }

    async fn verify(&self, digest: &PasswordDigest, candidate: &str) -> bool {
        let digest = digest.clone();
        let candidate = Zeroizing::new(candidate.to_owned());
        match task::spawn_blocking(move || digest.verify(&candidate)).await {
            Ok(verified) => verified,
            Err(err) => {
                error!(error = %err, "password verification task failed");
                false
            }
        }
    }
}

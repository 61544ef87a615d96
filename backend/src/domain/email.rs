//! Email address primitive used as the user identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Email::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    /// The address was blank once trimmed.
    Empty,
    /// The address lacks a local part, an `@`, or a domain.
    Malformed,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::Malformed => write!(f, "email must look like local@domain"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// Normalised email address.
///
/// ## Invariants
/// - Trimmed and lower-cased, so equality matches the store's unique key.
/// - Exactly one `@` with non-empty text on both sides and no whitespace.
///
/// # Examples
/// ```
/// use connectability::domain::Email;
///
/// let email = Email::new("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(EmailValidationError::Malformed);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(EmailValidationError::Malformed),
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

//! User aggregates: registration input, stored accounts, and public profiles.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::auth::PasswordDigest;
use super::email::{Email, EmailValidationError};

/// Validation errors returned by [`Registration::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Name was blank once trimmed.
    EmptyName,
    /// Email was missing or malformed.
    InvalidEmail(EmailValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidEmail(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<EmailValidationError> for RegistrationValidationError {
    fn from(value: EmailValidationError) -> Self {
        Self::InvalidEmail(value)
    }
}

/// Trim, lower-case, and de-duplicate skill labels, dropping blanks.
///
/// Order of first appearance is preserved.
///
/// # Examples
/// ```
/// use connectability::domain::normalise_skills;
///
/// let skills = normalise_skills(["Rust", " rust ", "", "SQL"]);
/// assert_eq!(skills, vec!["rust".to_owned(), "sql".to_owned()]);
/// ```
pub fn normalise_skills<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut skills: Vec<String> = Vec::new();
    for skill in raw {
        let skill = skill.as_ref().trim().to_lowercase();
        if !skill.is_empty() && !skills.contains(&skill) {
            skills.push(skill);
        }
    }
    skills
}

/// Public view of a registered user. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDetails {
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Unique, normalised email address.
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: Email,
    /// Normalised skill labels.
    #[schema(example = json!(["rust", "sql"]))]
    pub skills: Vec<String>,
    /// Optional free-form biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Validated registration request.
///
/// The raw password stays in a zeroizing buffer until the account service
/// hashes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    details: UserDetails,
    password: Zeroizing<String>,
}

/// Raw registration inputs, grouped to keep the constructor readable.
#[derive(Debug, Clone, Default)]
pub struct RegistrationParts<'a> {
    /// Display name.
    pub name: &'a str,
    /// Email address as typed.
    pub email: &'a str,
    /// Raw password.
    pub password: &'a str,
    /// Skill labels as typed.
    pub skills: &'a [String],
    /// Optional biography.
    pub bio: Option<&'a str>,
}

impl Registration {
    /// Validate raw registration inputs.
    pub fn try_new(parts: RegistrationParts<'_>) -> Result<Self, RegistrationValidationError> {
        let name = parts.name.trim();
        if name.is_empty() {
            return Err(RegistrationValidationError::EmptyName);
        }
        let email = Email::new(parts.email)?;
        if parts.password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        let bio = parts
            .bio
            .map(str::trim)
            .filter(|bio| !bio.is_empty())
            .map(str::to_owned);

        Ok(Self {
            details: UserDetails {
                name: name.to_owned(),
                email,
                skills: normalise_skills(parts.skills),
                bio,
            },
            password: Zeroizing::new(parts.password.to_owned()),
        })
    }

    /// Profile fields that will be stored.
    pub fn details(&self) -> &UserDetails {
        &self.details
    }

    /// Raw password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Stored account: public profile plus the password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Public profile fields.
    pub details: UserDetails,
    /// Argon2id digest of the password.
    pub password: PasswordDigest,
}

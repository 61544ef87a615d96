//! Project aggregates and the team projection.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::email::Email;
use super::user::normalise_skills;

/// Store-assigned project identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = i64, example = 42)]
pub struct ProjectId(i64);

impl ProjectId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors returned by [`ProjectDraft::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    /// Name was blank once trimmed.
    EmptyName,
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name must not be empty"),
        }
    }
}

impl std::error::Error for ProjectValidationError {}

/// Client-supplied project fields, validated.
///
/// The manager is deliberately absent: it is always the authenticated
/// caller and is attached by the project service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    name: String,
    description: String,
    required_skills: Vec<String>,
}

impl ProjectDraft {
    /// Validate raw project inputs.
    pub fn try_new(
        name: &str,
        description: &str,
        required_skills: &[String],
    ) -> Result<Self, ProjectValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            description: description.trim().to_owned(),
            required_skills: normalise_skills(required_skills),
        })
    }

    /// Attach the manager and creation time, producing a storable project.
    pub fn into_new_project(self, manager_email: Email, created_at: DateTime<Utc>) -> NewProject {
        NewProject {
            manager_email,
            name: self.name,
            description: self.description,
            required_skills: self.required_skills,
            created_at,
        }
    }
}

/// Project ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Authenticated caller who owns the project.
    pub manager_email: Email,
    /// Project name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Normalised skills the project is looking for.
    pub required_skills: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Stored project as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectDetails {
    /// Store-assigned identifier.
    pub project_id: ProjectId,
    /// Email of the managing user.
    #[schema(value_type = String, example = "ada@example.com")]
    pub manager_email: Email,
    /// Project name.
    #[schema(example = "Analytical Engine")]
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Skills the project is looking for.
    pub required_skills: Vec<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: DateTime<Utc>,
}

/// Names of the users working on a project.
///
/// # Examples
/// ```
/// use connectability::domain::{ProjectId, ProjectTeam};
///
/// let team = ProjectTeam {
///     project_id: ProjectId::new(42),
///     members_name: vec!["Alice".into(), "Bob".into()],
/// };
/// let json = serde_json::to_string(&team).unwrap();
/// assert_eq!(json, r#"{"project_id":42,"members_name":["Alice","Bob"]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectTeam {
    /// Project the team belongs to.
    pub project_id: ProjectId,
    /// Member display names in join order.
    pub members_name: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn draft_requires_a_name(#[case] name: &str) {
        assert_eq!(
            ProjectDraft::try_new(name, "desc", &[]).expect_err("blank name"),
            ProjectValidationError::EmptyName
        );
    }

    #[rstest]
    fn draft_attaches_manager() {
        let created_at = Utc::now();
        let manager = Email::new("boss@x.com").expect("email");
        let project = ProjectDraft::try_new(" Engine ", " gears ", &["Rust".to_owned()])
            .expect("valid draft")
            .into_new_project(manager.clone(), created_at);

        assert_eq!(project.manager_email, manager);
        assert_eq!(project.name, "Engine");
        assert_eq!(project.description, "gears");
        assert_eq!(project.required_skills, vec!["rust".to_owned()]);
        assert_eq!(project.created_at, created_at);
    }
}

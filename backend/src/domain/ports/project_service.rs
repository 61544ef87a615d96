//! Driving port for project use-cases.

use async_trait::async_trait;

use crate::domain::{Email, Error, ProjectDetails, ProjectDraft, ProjectId, ProjectTeam, UserDetails};

/// Domain use-case port for projects and their teams.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Create a project managed by `manager`.
    async fn create_project(
        &self,
        manager: &Email,
        draft: ProjectDraft,
    ) -> Result<ProjectDetails, Error>;

    /// Projects `user` manages or has joined, newest first.
    async fn user_projects(&self, user: &Email) -> Result<Vec<ProjectDetails>, Error>;

    /// Team member names for a project.
    async fn team(&self, project_id: ProjectId) -> Result<ProjectTeam, Error>;

    /// Users whose skills overlap `skills` and who are not yet on the team.
    async fn eligible_members(
        &self,
        project_id: ProjectId,
        skills: Vec<String>,
    ) -> Result<Vec<UserDetails>, Error>;
}

//! Driven port for project persistence and the team projection.

use async_trait::async_trait;

use crate::domain::{Email, NewProject, ProjectDetails, ProjectId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
        /// The manager email does not belong to a registered user.
        UnknownManager { email: String } => "manager is not a registered user: {email}",
    }
}

/// Port for creating projects and reading project membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project and return it with its assigned identifier.
    async fn insert(&self, project: &NewProject) -> Result<ProjectDetails, ProjectRepositoryError>;

    /// Projects the user manages or has joined, newest first.
    async fn list_for_user(
        &self,
        email: &Email,
    ) -> Result<Vec<ProjectDetails>, ProjectRepositoryError>;

    /// Display names of team members in join order.
    ///
    /// Unknown projects yield an empty list.
    async fn team_member_names(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<String>, ProjectRepositoryError>;
}

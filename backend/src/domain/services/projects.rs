//! Project service: creation, listings, team projection, and member matching.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use super::PERSISTENCE_FAILURE;
use crate::domain::ports::{
    ProjectRepository, ProjectRepositoryError, ProjectService, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Email, Error, ProjectDetails, ProjectDraft, ProjectId, ProjectTeam, UserDetails,
    normalise_skills,
};

/// Project service implementing [`ProjectService`].
#[derive(Clone)]
pub struct ProjectsService<P, U> {
    projects: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P, U> ProjectsService<P, U> {
    /// Create a new service with the given repositories and clock.
    pub fn new(projects: Arc<P>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            projects,
            users,
            clock,
        }
    }
}

fn map_project_error(operation: &'static str, err: ProjectRepositoryError) -> Error {
    match err {
        ProjectRepositoryError::UnknownManager { email } => {
            warn!(%email, operation, "session user is not registered");
            Error::unauthorized("login required")
        }
        other => {
            error!(error = %other, operation, "project repository failed");
            Error::internal(PERSISTENCE_FAILURE)
        }
    }
}

fn map_user_error(err: UserRepositoryError) -> Error {
    error!(error = %err, operation = "eligible_members", "user repository failed");
    Error::internal(PERSISTENCE_FAILURE)
}

#[async_trait]
impl<P, U> ProjectService for ProjectsService<P, U>
where
    P: ProjectRepository,
    U: UserRepository,
{
    async fn create_project(
        &self,
        manager: &Email,
        draft: ProjectDraft,
    ) -> Result<ProjectDetails, Error> {
        let project = draft.into_new_project(manager.clone(), self.clock.utc());
        let created = self
            .projects
            .insert(&project)
            .await
            .map_err(|err| map_project_error("create_project", err))?;
        info!(
            project_id = %created.project_id,
            manager_email = %created.manager_email,
            "project created"
        );
        Ok(created)
    }

    async fn user_projects(&self, user: &Email) -> Result<Vec<ProjectDetails>, Error> {
        self.projects
            .list_for_user(user)
            .await
            .map_err(|err| map_project_error("user_projects", err))
    }

    async fn team(&self, project_id: ProjectId) -> Result<ProjectTeam, Error> {
        let members_name = self
            .projects
            .team_member_names(project_id)
            .await
            .map_err(|err| map_project_error("team", err))?;
        Ok(ProjectTeam {
            project_id,
            members_name,
        })
    }

    async fn eligible_members(
        &self,
        project_id: ProjectId,
        skills: Vec<String>,
    ) -> Result<Vec<UserDetails>, Error> {
        let skills = normalise_skills(skills);
        if skills.is_empty() {
            return Ok(Vec::new());
        }
        self.users
            .find_eligible(project_id, &skills)
            .await
            .map_err(map_user_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::NewProject;
    use crate::domain::ports::{MockProjectRepository, MockUserRepository};
    use crate::domain::services::fixtures::{email, fixture_clock, fixture_timestamp};
    use rstest::rstest;

    fn make_service(
        projects: MockProjectRepository,
        users: MockUserRepository,
    ) -> ProjectsService<MockProjectRepository, MockUserRepository> {
        ProjectsService::new(Arc::new(projects), Arc::new(users), fixture_clock())
    }

    fn stored(project: &NewProject, id: i64) -> ProjectDetails {
        ProjectDetails {
            project_id: ProjectId::new(id),
            manager_email: project.manager_email.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            required_skills: project.required_skills.clone(),
            created_at: project.created_at,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_project_stamps_manager_and_time() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_insert()
            .withf(|project: &NewProject| {
                project.manager_email.as_ref() == "boss@x.com"
                    && project.created_at == fixture_timestamp()
            })
            .times(1)
            .return_once(|project| Ok(stored(project, 7)));

        let draft = ProjectDraft::try_new("Engine", "gears", &[]).expect("draft");
        let created = make_service(projects, MockUserRepository::new())
            .create_project(&email("boss@x.com"), draft)
            .await
            .expect("created");
        assert_eq!(created.project_id, ProjectId::new(7));
        assert_eq!(created.manager_email, email("boss@x.com"));
    }

    #[rstest]
    #[case(ProjectRepositoryError::unknown_manager("boss@x.com"), ErrorCode::Unauthorized)]
    #[case(ProjectRepositoryError::query("syntax error"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn create_project_maps_repository_errors(
        #[case] failure: ProjectRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut projects = MockProjectRepository::new();
        projects.expect_insert().return_once(move |_| Err(failure));

        let draft = ProjectDraft::try_new("Engine", "", &[]).expect("draft");
        let err = make_service(projects, MockUserRepository::new())
            .create_project(&email("boss@x.com"), draft)
            .await
            .expect_err("insert fails");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn team_wraps_member_names() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_team_member_names()
            .withf(|id: &ProjectId| *id == ProjectId::new(42))
            .return_once(|_| Ok(vec!["Alice".to_owned(), "Bob".to_owned()]));

        let team = make_service(projects, MockUserRepository::new())
            .team(ProjectId::new(42))
            .await
            .expect("team");
        assert_eq!(
            team,
            ProjectTeam {
                project_id: ProjectId::new(42),
                members_name: vec!["Alice".to_owned(), "Bob".to_owned()],
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn eligible_members_normalises_skills_before_querying() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_eligible()
            .withf(|id: &ProjectId, skills: &[String]| {
                *id == ProjectId::new(3) && skills == ["rust".to_owned(), "sql".to_owned()]
            })
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));

        let found = make_service(MockProjectRepository::new(), users)
            .eligible_members(
                ProjectId::new(3),
                vec!["Rust".to_owned(), " SQL ".to_owned(), "rust".to_owned()],
            )
            .await
            .expect("eligible");
        assert!(found.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn eligible_members_without_skills_skips_the_store() {
        let mut users = MockUserRepository::new();
        users.expect_find_eligible().times(0);

        let found = make_service(MockProjectRepository::new(), users)
            .eligible_members(ProjectId::new(3), vec!["  ".to_owned()])
            .await
            .expect("eligible");
        assert!(found.is_empty());
    }
}

//! PostgreSQL-backed `ProjectRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{Email, NewProject, ProjectDetails, ProjectId};

use super::error_mapping::{DbFailure, classify};
use super::models::{NewProjectRow, ProjectRow};
use super::pool::{DbPool, PoolError};
use super::schema::{project_members, projects, users};

/// Diesel-backed implementation of the project repository port.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProjectRepositoryError {
    ProjectRepositoryError::connection(error.into_message())
}

fn map_diesel_error(
    error: diesel::result::Error,
    manager: Option<&Email>,
) -> ProjectRepositoryError {
    match (classify(error), manager) {
        (DbFailure::ForeignKeyViolation { .. }, Some(manager)) => {
            ProjectRepositoryError::unknown_manager(manager.as_ref())
        }
        (DbFailure::Connection(message), _) => ProjectRepositoryError::connection(message),
        (failure, _) => ProjectRepositoryError::query(failure.message()),
    }
}

fn row_to_project(row: ProjectRow) -> Result<ProjectDetails, ProjectRepositoryError> {
    let manager_email = Email::new(&row.manager_email).map_err(|err| {
        ProjectRepositoryError::query(format!("project {} manager email: {err}", row.id))
    })?;
    Ok(ProjectDetails {
        project_id: ProjectId::new(row.id),
        manager_email,
        name: row.name,
        description: row.description,
        required_skills: row.required_skills,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<ProjectDetails, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProjectRow {
            manager_email: project.manager_email.as_ref(),
            name: &project.name,
            description: &project.description,
            required_skills: &project.required_skills,
            created_at: project.created_at,
        };

        let stored = diesel::insert_into(projects::table)
            .values(&row)
            .returning(ProjectRow::as_returning())
            .get_result::<ProjectRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(&project.manager_email)))?;
        row_to_project(stored)
    }

    async fn list_for_user(
        &self,
        email: &Email,
    ) -> Result<Vec<ProjectDetails>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let joined = project_members::table
            .filter(project_members::member_email.eq(email.as_ref()))
            .select(project_members::project_id);

        let rows: Vec<ProjectRow> = projects::table
            .filter(
                projects::manager_email
                    .eq(email.as_ref())
                    .or(projects::id.eq_any(joined)),
            )
            .order((projects::created_at.desc(), projects::id.desc()))
            .select(ProjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(row_to_project).collect()
    }

    async fn team_member_names(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<String>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        project_members::table
            .inner_join(users::table)
            .filter(project_members::project_id.eq(project_id.get()))
            .order((project_members::joined_at.asc(), users::email.asc()))
            .select(users::name)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, ProjectRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn rows_convert_to_details() {
        let created_at = Utc::now();
        let project = row_to_project(ProjectRow {
            id: 7,
            manager_email: "alice@x.com".to_owned(),
            name: "Engine".to_owned(),
            description: String::new(),
            required_skills: vec!["rust".to_owned()],
            created_at,
        })
        .expect("valid row");
        assert_eq!(project.project_id, ProjectId::new(7));
        assert_eq!(project.manager_email.as_ref(), "alice@x.com");
        assert_eq!(project.created_at, created_at);
    }
}

//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, PasswordDigest, ProjectId, UserAccount, UserDetails};

use super::error_mapping::{DbFailure, classify};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{project_members, projects, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, email: Option<&Email>) -> UserRepositoryError {
    match (classify(error), email) {
        (DbFailure::UniqueViolation { .. }, Some(email)) => {
            UserRepositoryError::duplicate_email(email.as_ref())
        }
        (DbFailure::Connection(message), _) => UserRepositoryError::connection(message),
        (failure, _) => UserRepositoryError::query(failure.message()),
    }
}

fn row_to_details(
    email: String,
    name: String,
    skills: Vec<String>,
    bio: Option<String>,
) -> Result<UserDetails, UserRepositoryError> {
    let email = Email::new(&email)
        .map_err(|err| UserRepositoryError::query(format!("stored email {email:?}: {err}")))?;
    Ok(UserDetails {
        name,
        email,
        skills,
        bio,
    })
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserRepositoryError> {
    let UserRow {
        email,
        name,
        password_hash,
        skills,
        bio,
    } = row;
    Ok(UserAccount {
        details: row_to_details(email, name, skills, bio)?,
        password: PasswordDigest::from_stored(password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = &account.details;
        let row = NewUserRow {
            email: details.email.as_ref(),
            name: &details.name,
            password_hash: account.password.as_ref(),
            skills: &details.skills,
            bio: details.bio.as_deref(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(&details.email)))
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_account).transpose()
    }

    async fn find_eligible(
        &self,
        project_id: ProjectId,
        skills: &[String],
    ) -> Result<Vec<UserDetails>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let manager = projects::table
            .filter(projects::id.eq(project_id.get()))
            .select(projects::manager_email)
            .first::<String>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        let mut excluded: Vec<String> = project_members::table
            .filter(project_members::project_id.eq(project_id.get()))
            .select(project_members::member_email)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        excluded.extend(manager);

        let rows: Vec<(String, String, Vec<String>, Option<String>)> = users::table
            .filter(users::skills.overlaps_with(skills))
            .filter(diesel::dsl::not(users::email.eq_any(&excluded)))
            .order(users::email.asc())
            .select((users::email, users::name, users::skills, users::bio))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter()
            .map(|(email, name, skills, bio)| row_to_details(email, name, skills, bio))
            .collect()
    }
}

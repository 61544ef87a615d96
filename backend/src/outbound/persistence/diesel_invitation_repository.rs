//! PostgreSQL-backed `InvitationRepository`.
//!
//! Decisions run in one transaction: a conditional update that only matches
//! a pending row, followed by the team insert when accepting. A concurrent
//! decision on the same invitation therefore updates zero rows and reports
//! the status the winner wrote.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{InvitationRepository, InvitationRepositoryError};
use crate::domain::{
    Email, Invitation, InvitationDecision, InvitationKey, InvitationStatus, NewInvitation,
    ProjectId,
};

use super::error_mapping::{DbFailure, classify};
use super::models::{InvitationListingRow, NewInvitationRow, NewMemberRow};
use super::pool::{DbPool, PoolError};
use super::schema::{invitations, project_members, projects};

/// Diesel-backed implementation of the invitation repository port.
#[derive(Clone)]
pub struct DieselInvitationRepository {
    pool: DbPool,
}

impl DieselInvitationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InvitationRepositoryError {
    InvitationRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> InvitationRepositoryError {
    match classify(error) {
        DbFailure::UniqueViolation { .. } => InvitationRepositoryError::duplicate(),
        DbFailure::ForeignKeyViolation { .. } => InvitationRepositoryError::unknown_reference(),
        DbFailure::Connection(message) => InvitationRepositoryError::connection(message),
        DbFailure::Query(message) => InvitationRepositoryError::query(message),
    }
}

/// Error carried out of the decision transaction.
///
/// Diesel rolls back on any `Err`, so lifecycle refusals travel the same path
/// as database failures.
#[derive(Debug)]
enum DecisionError {
    Database(diesel::result::Error),
    Refused(InvitationRepositoryError),
}

impl From<diesel::result::Error> for DecisionError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

impl From<DecisionError> for InvitationRepositoryError {
    fn from(value: DecisionError) -> Self {
        match value {
            DecisionError::Database(err) => map_diesel_error(err),
            DecisionError::Refused(err) => err,
        }
    }
}

fn parse_status(raw: &str) -> Result<InvitationStatus, InvitationRepositoryError> {
    raw.parse::<InvitationStatus>()
        .map_err(|err| InvitationRepositoryError::query(err.to_string()))
}

fn row_to_invitation(row: InvitationListingRow) -> Result<Invitation, InvitationRepositoryError> {
    let email = |raw: &str, field: &str| {
        Email::new(raw).map_err(|err| InvitationRepositoryError::query(format!("{field}: {err}")))
    };
    Ok(Invitation {
        project_id: ProjectId::new(row.project_id),
        project_name: row.project_name,
        manager_email: email(&row.manager_email, "manager_email")?,
        receiver_email: email(&row.receiver_email, "receiver_email")?,
        status: parse_status(&row.status)?,
        created_at: row.created_at,
    })
}

async fn apply_decision(
    conn: &mut AsyncPgConnection,
    key: &InvitationKey,
    decision: InvitationDecision,
) -> Result<InvitationStatus, DecisionError> {
    let target = decision.target();
    let matches_key = || {
        invitations::project_id
            .eq(key.project_id.get())
            .and(invitations::receiver_email.eq(key.receiver_email.as_ref()))
    };

    let updated = diesel::update(
        invitations::table
            .filter(matches_key())
            .filter(invitations::status.eq(InvitationStatus::Pending.as_str())),
    )
    .set(invitations::status.eq(target.as_str()))
    .execute(conn)
    .await?;

    if updated == 0 {
        let current = invitations::table
            .filter(matches_key())
            .select(invitations::status)
            .first::<String>(conn)
            .await
            .optional()?;
        let refusal = match current {
            None => InvitationRepositoryError::not_found(),
            Some(raw) => match parse_status(&raw) {
                Ok(current) => InvitationRepositoryError::not_pending(current),
                Err(err) => err,
            },
        };
        return Err(DecisionError::Refused(refusal));
    }

    if target == InvitationStatus::Accepted {
        diesel::insert_into(project_members::table)
            .values(&NewMemberRow {
                project_id: key.project_id.get(),
                member_email: key.receiver_email.as_ref(),
            })
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(target)
}

#[async_trait]
impl InvitationRepository for DieselInvitationRepository {
    async fn insert(&self, invitation: &NewInvitation) -> Result<(), InvitationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewInvitationRow {
            project_id: invitation.key.project_id.get(),
            receiver_email: invitation.key.receiver_email.as_ref(),
            status: InvitationStatus::Pending.as_str(),
            created_at: invitation.created_at,
        };

        diesel::insert_into(invitations::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn pending_for_receiver(
        &self,
        receiver: &Email,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<InvitationListingRow> = invitations::table
            .inner_join(projects::table)
            .filter(invitations::receiver_email.eq(receiver.as_ref()))
            .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
            .order((invitations::created_at.desc(), invitations::project_id.desc()))
            .select((
                invitations::project_id,
                projects::name,
                projects::manager_email,
                invitations::receiver_email,
                invitations::status,
                invitations::created_at,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_invitation).collect()
    }

    async fn decide(
        &self,
        key: &InvitationKey,
        decision: InvitationDecision,
    ) -> Result<InvitationStatus, InvitationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, DecisionError, _>(|conn| {
            async move { apply_decision(conn, key, decision).await }.scope_boxed()
        })
        .await
        .map_err(InvitationRepositoryError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn listing(status: &str) -> InvitationListingRow {
        InvitationListingRow {
            project_id: 3,
            project_name: "Engine".to_owned(),
            manager_email: "alice@x.com".to_owned(),
            receiver_email: "bob@x.com".to_owned(),
            status: status.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn listing_rows_convert() {
        let invitation = row_to_invitation(listing("pending")).expect("valid row");
        assert_eq!(invitation.project_id, ProjectId::new(3));
        assert_eq!(invitation.status, InvitationStatus::Pending);
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let err = row_to_invitation(listing("maybe")).expect_err("bad status");
        assert!(matches!(err, InvitationRepositoryError::Query { .. }));
    }

    #[rstest]
    fn refusals_survive_the_transaction_boundary() {
        let err = InvitationRepositoryError::from(DecisionError::Refused(
            InvitationRepositoryError::not_pending(InvitationStatus::Rejected),
        ));
        assert_eq!(
            err,
            InvitationRepositoryError::not_pending(InvitationStatus::Rejected)
        );
    }

    #[rstest]
    fn database_failures_are_classified() {
        let err = InvitationRepositoryError::from(DecisionError::Database(
            diesel::result::Error::NotFound,
        ));
        assert_eq!(err, InvitationRepositoryError::query("record not found"));
    }
}

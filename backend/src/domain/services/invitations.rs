//! Invitation service: sending invitations and applying receiver decisions.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use super::PERSISTENCE_FAILURE;
use crate::domain::ports::{InvitationRepository, InvitationRepositoryError, InvitationService};
use crate::domain::{
    Email, Error, Invitation, InvitationDecision, InvitationKey, NewInvitation,
};

/// Invitation service implementing [`InvitationService`].
#[derive(Clone)]
pub struct InvitationsService<I> {
    invitations: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<I> InvitationsService<I> {
    /// Create a new service with the given repository and clock.
    pub fn new(invitations: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self { invitations, clock }
    }
}

fn map_invitation_error(
    operation: &'static str,
    key: Option<&InvitationKey>,
    err: InvitationRepositoryError,
) -> Error {
    let project_id = key.map(|key| key.project_id.get());
    let receiver_email = key.map(|key| key.receiver_email.as_ref());
    match err {
        InvitationRepositoryError::Duplicate => Error::conflict("invitation already exists"),
        InvitationRepositoryError::UnknownReference => {
            Error::not_found("project or user not found")
        }
        InvitationRepositoryError::NotFound => Error::not_found("invitation not found"),
        InvitationRepositoryError::NotPending { current } => {
            info!(operation, ?project_id, ?receiver_email, %current, "invitation already decided");
            Error::conflict("invitation is no longer pending")
        }
        other => {
            error!(error = %other, operation, ?project_id, ?receiver_email, "invitation repository failed");
            Error::internal(PERSISTENCE_FAILURE)
        }
    }
}

#[async_trait]
impl<I> InvitationService for InvitationsService<I>
where
    I: InvitationRepository,
{
    async fn invite(&self, key: InvitationKey) -> Result<(), Error> {
        let invitation = NewInvitation {
            key,
            created_at: self.clock.utc(),
        };
        self.invitations
            .insert(&invitation)
            .await
            .map_err(|err| map_invitation_error("invite", Some(&invitation.key), err))?;
        info!(
            project_id = %invitation.key.project_id,
            receiver_email = %invitation.key.receiver_email,
            "invitation sent"
        );
        Ok(())
    }

    async fn invitations_for(&self, receiver: &Email) -> Result<Vec<Invitation>, Error> {
        self.invitations
            .pending_for_receiver(receiver)
            .await
            .map_err(|err| map_invitation_error("invitations_for", None, err))
    }

    async fn decide(&self, key: InvitationKey, decision: InvitationDecision) -> Result<(), Error> {
        let status = self
            .invitations
            .decide(&key, decision)
            .await
            .map_err(|err| map_invitation_error("decide", Some(&key), err))?;
        info!(
            project_id = %key.project_id,
            receiver_email = %key.receiver_email,
            %status,
            "invitation decided"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockInvitationRepository;
    use crate::domain::services::fixtures::{email, fixture_clock, fixture_timestamp};
    use crate::domain::{ErrorCode, InvitationStatus, ProjectId};
    use rstest::rstest;

    fn make_service(repo: MockInvitationRepository) -> InvitationsService<MockInvitationRepository> {
        InvitationsService::new(Arc::new(repo), fixture_clock())
    }

    fn key() -> InvitationKey {
        InvitationKey {
            project_id: ProjectId::new(5),
            receiver_email: email("bob@x.com"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn invite_stamps_creation_time() {
        let mut repo = MockInvitationRepository::new();
        repo.expect_insert()
            .withf(|invitation: &NewInvitation| {
                invitation.key == key() && invitation.created_at == fixture_timestamp()
            })
            .times(1)
            .return_once(|_| Ok(()));

        make_service(repo).invite(key()).await.expect("invite");
    }

    #[rstest]
    #[case(InvitationRepositoryError::duplicate(), ErrorCode::Conflict, "invitation already exists")]
    #[case(
        InvitationRepositoryError::unknown_reference(),
        ErrorCode::NotFound,
        "project or user not found"
    )]
    #[case(InvitationRepositoryError::query("deadlock"), ErrorCode::InternalError, PERSISTENCE_FAILURE)]
    #[tokio::test]
    async fn invite_maps_repository_errors(
        #[case] failure: InvitationRepositoryError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let mut repo = MockInvitationRepository::new();
        repo.expect_insert().return_once(move |_| Err(failure));

        let err = make_service(repo).invite(key()).await.expect_err("insert fails");
        assert_eq!(err.code(), code);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[case(InvitationDecision::Accept)]
    #[case(InvitationDecision::Reject)]
    #[tokio::test]
    async fn decide_forwards_the_decision(#[case] decision: InvitationDecision) {
        let mut repo = MockInvitationRepository::new();
        repo.expect_decide()
            .withf(move |k: &InvitationKey, d: &InvitationDecision| *k == key() && *d == decision)
            .times(1)
            .return_once(move |_, d| Ok(d.target()));

        make_service(repo)
            .decide(key(), decision)
            .await
            .expect("decision applies");
    }

    #[rstest]
    #[case(InvitationRepositoryError::not_found(), ErrorCode::NotFound)]
    #[case(
        InvitationRepositoryError::not_pending(InvitationStatus::Accepted),
        ErrorCode::Conflict
    )]
    #[case(InvitationRepositoryError::connection("reset"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn decide_maps_repository_errors(
        #[case] failure: InvitationRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockInvitationRepository::new();
        repo.expect_decide().return_once(move |_, _| Err(failure));

        let err = make_service(repo)
            .decide(key(), InvitationDecision::Reject)
            .await
            .expect_err("decision fails");
        assert_eq!(err.code(), expected);
    }
}

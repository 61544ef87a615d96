//! Driven port for invitation persistence.
//!
//! Adapters must honour the lifecycle encoded by
//! [`InvitationStatus::apply`](crate::domain::InvitationStatus::apply):
//! a decision only applies to a pending invitation, and accepting adds the
//! receiver to the team in the same unit of work.

use async_trait::async_trait;

use crate::domain::{Email, Invitation, InvitationDecision, InvitationKey, InvitationStatus, NewInvitation};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by invitation repository adapters.
    pub enum InvitationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "invitation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "invitation repository query failed: {message}",
        /// An invitation for this project and receiver already exists.
        Duplicate => "invitation already exists",
        /// The project or the receiver does not exist.
        UnknownReference => "project or receiver does not exist",
        /// No invitation matches the key.
        NotFound => "invitation not found",
        /// The invitation already reached a terminal status.
        NotPending { current: InvitationStatus } => "invitation is already {current}",
    }
}

/// Port for the invitation workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Insert a pending invitation.
    async fn insert(&self, invitation: &NewInvitation) -> Result<(), InvitationRepositoryError>;

    /// Pending invitations addressed to `receiver`, newest first.
    async fn pending_for_receiver(
        &self,
        receiver: &Email,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError>;

    /// Apply a decision to a pending invitation and return the new status.
    async fn decide(
        &self,
        key: &InvitationKey,
        decision: InvitationDecision,
    ) -> Result<InvitationStatus, InvitationRepositoryError>;
}

//! Driving port for the invitation workflow.

use async_trait::async_trait;

use crate::domain::{Email, Error, Invitation, InvitationDecision, InvitationKey};

/// Domain use-case port for sending and answering invitations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationService: Send + Sync {
    /// Invite a user to a project. The invitation starts pending.
    async fn invite(&self, key: InvitationKey) -> Result<(), Error>;

    /// Pending invitations addressed to `receiver`.
    async fn invitations_for(&self, receiver: &Email) -> Result<Vec<Invitation>, Error>;

    /// Accept or reject a pending invitation.
    async fn decide(&self, key: InvitationKey, decision: InvitationDecision) -> Result<(), Error>;
}

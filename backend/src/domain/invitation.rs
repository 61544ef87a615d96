//! Invitation lifecycle.
//!
//! An invitation starts `pending` and moves to `accepted` or `rejected`
//! exactly once. [`InvitationStatus::apply`] is the single place that encodes
//! this state machine; persistence adapters call it (or mirror it with a
//! conditional update) so that terminal states are never overwritten.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::email::Email;
use super::project::ProjectId;

/// Lifecycle state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting a decision from the receiver.
    Pending,
    /// The receiver joined the project team.
    Accepted,
    /// The receiver declined.
    Rejected,
}

/// Receiver decision on a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationDecision {
    /// Join the project team.
    Accept,
    /// Decline the invitation.
    Reject,
}

impl InvitationDecision {
    /// Status reached when this decision applies to a pending invitation.
    pub const fn target(self) -> InvitationStatus {
        match self {
            Self::Accept => InvitationStatus::Accepted,
            Self::Reject => InvitationStatus::Rejected,
        }
    }
}

/// Raised when a decision is applied to a terminal invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invitation is already {current}")]
pub struct InvitationNotPending {
    /// Status the invitation is stuck in.
    pub current: InvitationStatus,
}

impl InvitationStatus {
    /// Stable lower-case label used in storage and JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transition is possible.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Apply a decision, returning the next status.
    ///
    /// # Examples
    /// ```
    /// use connectability::domain::{InvitationDecision, InvitationStatus};
    ///
    /// let next = InvitationStatus::Pending.apply(InvitationDecision::Accept).unwrap();
    /// assert_eq!(next, InvitationStatus::Accepted);
    /// assert!(next.apply(InvitationDecision::Reject).is_err());
    /// ```
    pub const fn apply(
        self,
        decision: InvitationDecision,
    ) -> Result<Self, InvitationNotPending> {
        match self {
            Self::Pending => Ok(decision.target()),
            current => Err(InvitationNotPending { current }),
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown invitation status: {0}")]
pub struct UnknownInvitationStatus(pub String);

impl FromStr for InvitationStatus {
    type Err = UnknownInvitationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownInvitationStatus(other.to_owned())),
        }
    }
}

/// Identifies an invitation: one per project and receiver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvitationKey {
    /// Project the receiver is invited to.
    pub project_id: ProjectId,
    /// Invited user.
    pub receiver_email: Email,
}

/// Invitation ready for insertion; always starts pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvitation {
    /// Project and receiver.
    pub key: InvitationKey,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Invitation as listed for its receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Invitation {
    /// Project the receiver is invited to.
    pub project_id: ProjectId,
    /// Name of that project.
    pub project_name: String,
    /// Manager who owns the project.
    #[schema(value_type = String)]
    pub manager_email: Email,
    /// Invited user.
    #[schema(value_type = String)]
    pub receiver_email: Email,
    /// Current lifecycle state.
    pub status: InvitationStatus,
    /// Creation timestamp (RFC 3339).
    pub created_at: DateTime<Utc>,
}

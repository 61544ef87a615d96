//! Domain services implementing the driving ports on top of the driven
//! repositories.
//!
//! Services log repository failures with their full context and surface a
//! generic [`Error`](crate::domain::Error) so persistence details never reach
//! clients.

mod accounts;
mod invitations;
mod projects;

#[cfg(test)]
pub(crate) mod fixtures;

pub use accounts::AccountsService;
pub use invitations::InvitationsService;
pub use projects::ProjectsService;

/// Message carried by internal errors raised from repository failures.
///
/// Inbound adapters replace it with endpoint-specific text.
pub const PERSISTENCE_FAILURE: &str = "persistence failure";

//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, InvitationService, ProjectService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and profiles.
    pub accounts: Arc<dyn AccountService>,
    /// Projects, teams, and member matching.
    pub projects: Arc<dyn ProjectService>,
    /// Invitation workflow.
    pub invitations: Arc<dyn InvitationService>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        projects: Arc<dyn ProjectService>,
        invitations: Arc<dyn InvitationService>,
    ) -> Self {
        Self {
            accounts,
            projects,
            invitations,
        }
    }
}

//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `CredentialHasher`) are implemented by
//! adapters outside the services.
//! Driving ports (`*Service`) are called by inbound adapters and implemented
//! by the services in [`crate::domain`].

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod credential_hasher;
mod invitation_repository;
mod invitation_service;
mod project_repository;
mod project_service;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::CredentialHasher;
#[cfg(test)]
pub use invitation_repository::MockInvitationRepository;
pub use invitation_repository::{InvitationRepository, InvitationRepositoryError};
#[cfg(test)]
pub use invitation_service::MockInvitationService;
pub use invitation_service::InvitationService;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use project_service::MockProjectService;
pub use project_service::ProjectService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};

#[cfg(test)]
mod tests {
    //! Regression coverage for port error rendering.
    use super::*;
    use crate::domain::InvitationStatus;
    use rstest::rstest;

    #[rstest]
    #[case(
        UserRepositoryError::duplicate_email("a@x.com").to_string(),
        "email already registered: a@x.com"
    )]
    #[case(
        ProjectRepositoryError::unknown_manager("b@x.com").to_string(),
        "manager is not a registered user: b@x.com"
    )]
    #[case(
        InvitationRepositoryError::not_pending(InvitationStatus::Accepted).to_string(),
        "invitation is already accepted"
    )]
    #[case(InvitationRepositoryError::duplicate().to_string(), "invitation already exists")]
    fn port_errors_render_context(#[case] rendered: String, #[case] expected: &str) {
        assert_eq!(rendered, expected);
    }
}

//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, and the services that implement the driving ports. Types
//! validate their invariants at construction so adapters only ever handle
//! well-formed values.

pub mod auth;
pub mod email;
pub mod error;
pub mod invitation;
pub mod ports;
pub mod project;
pub mod services;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    Argon2CredentialHasher, LoginCredentials, LoginValidationError, PasswordDigest,
    PasswordHashingError,
};
pub use self::email::{Email, EmailValidationError};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::invitation::{
    Invitation, InvitationDecision, InvitationKey, InvitationNotPending, InvitationStatus,
    NewInvitation, UnknownInvitationStatus,
};
pub use self::project::{
    NewProject, ProjectDetails, ProjectDraft, ProjectId, ProjectTeam, ProjectValidationError,
};
pub use self::services::{AccountsService, InvitationsService, ProjectsService};
pub use self::trace_id::TraceId;
pub use self::user::{
    Registration, RegistrationParts, RegistrationValidationError, UserAccount, UserDetails,
    normalise_skills,
};


//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] registers every handler in the inbound HTTP layer, the request
//! and response schemas, and the session cookie security scheme. Swagger UI
//! serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Invitation, InvitationStatus, ProjectDetails, ProjectId, ProjectTeam, UserDetails,
};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest};
use crate::inbound::http::invitations::InvitationRequest;
use crate::inbound::http::projects::{CreateProjectRequest, EligibleRequest, TeamRequest};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Encrypted session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Connectability backend API",
        description = "Accounts, projects, teams, and invitations behind a session cookie."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::authenticate,
        crate::inbound::http::accounts::profile,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::user_projects,
        crate::inbound::http::projects::team_members,
        crate::inbound::http::projects::eligible_members,
        crate::inbound::http::invitations::invite_user,
        crate::inbound::http::invitations::user_invitations,
        crate::inbound::http::invitations::accept_invite,
        crate::inbound::http::invitations::reject_invite,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        CreateProjectRequest,
        TeamRequest,
        EligibleRequest,
        InvitationRequest,
        UserDetails,
        ProjectId,
        ProjectDetails,
        ProjectTeam,
        Invitation,
        InvitationStatus,
    )),
    tags(
        (name = "accounts", description = "Registration, login, and profiles"),
        (name = "projects", description = "Projects, teams, and member matching"),
        (name = "invitations", description = "Invitation workflow"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

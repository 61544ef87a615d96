//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod current_user;
pub mod error;
pub mod health;
pub mod invitations;
pub mod json;
pub mod projects;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register every REST endpoint on `cfg`.
///
/// Health probes are included; shared app data (state, JSON config, health
/// flags) and middleware are left to the caller.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::authenticate)
        .service(accounts::profile)
        .service(projects::create_project)
        .service(projects::user_projects)
        .service(projects::team_members)
        .service(projects::eligible_members)
        .service(invitations::invite_user)
        .service(invitations::user_invitations)
        .service(invitations::accept_invite)
        .service(invitations::reject_invite)
        .service(health::ready)
        .service(health::live);
}

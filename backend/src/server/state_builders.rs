//! Builders wiring domain services onto the configured repositories.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use connectability::domain::ports::{InvitationRepository, ProjectRepository, UserRepository};
use connectability::domain::{AccountsService, InvitationsService, ProjectsService};
use connectability::inbound::http::state::HttpState;
use connectability::outbound::InMemoryStore;
use connectability::outbound::persistence::{
    DbPool, DieselInvitationRepository, DieselProjectRepository, DieselUserRepository,
};

/// Wrap the three repositories in their services.
fn build_services<U, P, I>(
    users: Arc<U>,
    projects: Arc<P>,
    invitations: Arc<I>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    P: ProjectRepository + 'static,
    I: InvitationRepository + 'static,
{
    HttpState::new(
        Arc::new(AccountsService::new(users.clone())),
        Arc::new(ProjectsService::new(projects, users, clock.clone())),
        Arc::new(InvitationsService::new(invitations, clock)),
    )
}

/// Select PostgreSQL repositories when a pool is configured, otherwise one
/// shared in-memory store.
pub(super) fn build_http_state(db_pool: Option<&DbPool>) -> web::Data<HttpState> {
    web::Data::new(build_http_state_with_clock(db_pool, Arc::new(DefaultClock)))
}

fn build_http_state_with_clock(db_pool: Option<&DbPool>, clock: Arc<dyn Clock>) -> HttpState {
    match db_pool {
        Some(pool) => {
            info!(adapter = "postgres", "wiring persistence");
            build_services(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselProjectRepository::new(pool.clone())),
                Arc::new(DieselInvitationRepository::new(pool.clone())),
                clock,
            )
        }
        None => {
            warn!(
                adapter = "memory",
                "no database URL configured; state is lost on restart"
            );
            let store = Arc::new(InMemoryStore::new());
            build_services(store.clone(), store.clone(), store, clock)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectability::domain::{
        Email, LoginCredentials, ProjectDraft, Registration, RegistrationParts,
    };
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn memory_state_shares_one_store() {
        let state = build_http_state_with_clock(None, Arc::new(DefaultClock));
        let skills = vec!["rust".to_owned()];
        let registration = Registration::try_new(RegistrationParts {
            name: "Ada",
            email: "ada@x.com",
            password: "engine",
            skills: &skills,
            bio: None,
        })
        .expect("valid registration");
        state
            .accounts
            .register(registration)
            .await
            .expect("register");

        let creds = LoginCredentials::try_from_parts("ada@x.com", "engine").expect("creds");
        let email = state.accounts.login(&creds).await.expect("login");
        assert_eq!(email, Email::new("ada@x.com").expect("email"));

        let project = state
            .projects
            .create_project(
                &email,
                ProjectDraft::try_new("Engine", "", &skills).expect("draft"),
            )
            .await
            .expect("project visible to the project service");
        assert_eq!(project.manager_email, email);
    }
}

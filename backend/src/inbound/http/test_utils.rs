//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::{App, web};
use serde_json::json;

use super::health::HealthState;
use super::json::json_config;
use super::session_config::SESSION_COOKIE_NAME;
use super::state::HttpState;
use crate::domain::ports::{MockAccountService, MockInvitationService, MockProjectService};
use crate::domain::services::fixtures::fixture_clock;
use crate::domain::{
    AccountsService, Email, InvitationsService, PasswordDigest, ProjectDetails, ProjectId,
    ProjectsService, UserAccount, UserDetails,
};
use crate::middleware::{AuthGate, Trace};
use crate::outbound::memory::InMemoryStore;

/// Password shared by every seeded account.
pub const SEEDED_PASSWORD: &str = "password";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Uses the production cookie name and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocked driving ports for handler tests.
///
/// The default account mock accepts any login so that tests focused on other
/// ports can still obtain a session cookie.
pub struct TestPorts {
    accounts: MockAccountService,
    projects: MockProjectService,
    invitations: MockInvitationService,
}

impl Default for TestPorts {
    fn default() -> Self {
        let mut accounts = MockAccountService::new();
        accounts
            .expect_login()
            .returning(|creds| Ok(creds.email().clone()));
        Self {
            accounts,
            projects: MockProjectService::new(),
            invitations: MockInvitationService::new(),
        }
    }
}

impl TestPorts {
    pub fn accounts(mut self, accounts: MockAccountService) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn projects(mut self, projects: MockProjectService) -> Self {
        self.projects = projects;
        self
    }

    pub fn invitations(mut self, invitations: MockInvitationService) -> Self {
        self.invitations = invitations;
        self
    }
}

impl From<TestPorts> for HttpState {
    fn from(ports: TestPorts) -> Self {
        Self::new(
            Arc::new(ports.accounts),
            Arc::new(ports.projects),
            Arc::new(ports.invitations),
        )
    }
}

fn build_test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(HealthState::new()))
        .app_data(json_config())
        .wrap(AuthGate::default())
        .wrap(test_session_middleware())
        .wrap(Trace)
        .configure(super::configure_routes)
}

/// App wired exactly like production, backed by mocked ports.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    build_test_app(ports.into())
}

fn seeded_account(name: &str, email: &str, skills: &[&str]) -> UserAccount {
    UserAccount {
        details: UserDetails {
            name: name.to_owned(),
            email: Email::new(email).expect("seed email"),
            skills: skills.iter().map(|s| (*s).to_owned()).collect(),
            bio: None,
        },
        password: PasswordDigest::hash(SEEDED_PASSWORD).expect("hash seed password"),
    }
}

/// App backed by real services over an in-memory store.
///
/// Seeds Alice (rust, sql), Bob (rust), Carol (design), and Dave (cooking),
/// all using [`SEEDED_PASSWORD`].
pub fn seeded_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store = Arc::new(InMemoryStore::new());
    for account in [
        seeded_account("Alice", "alice@x.com", &["rust", "sql"]),
        seeded_account("Bob", "bob@x.com", &["rust"]),
        seeded_account("Carol", "carol@x.com", &["design"]),
        seeded_account("Dave", "dave@x.com", &["cooking"]),
    ] {
        store.insert_account(account).expect("seed account");
    }

    let clock = fixture_clock();
    let state = HttpState::new(
        Arc::new(AccountsService::new(store.clone())),
        Arc::new(ProjectsService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
        )),
        Arc::new(InvitationsService::new(store, clock)),
    );
    build_test_app(state)
}

/// Dispatch a request builder against an initialised app.
pub async fn call<S, B>(app: &S, request: actix_test::TestRequest) -> ServiceResponse<B>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    actix_test::call_service(app, request.to_request()).await
}

/// Read a response body as UTF-8 text.
pub async fn plain_body<B: MessageBody>(response: ServiceResponse<B>) -> String {
    let bytes = actix_test::read_body(response).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Log in and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let response = call(
        app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login for {email}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie")
        .into_owned()
}

/// Session cookie for an app built with the default [`TestPorts`] accounts mock.
pub async fn mock_login_cookie<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    login_cookie(app, "ada@x.com", "pw").await
}

/// Create a project as the cookie holder and return its identifier.
pub async fn create_project<S, B>(app: &S, cookie: &Cookie<'static>, name: &str) -> ProjectId
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let created = call(
        app,
        actix_test::TestRequest::post()
            .uri("/project")
            .cookie(cookie.clone())
            .set_json(json!({"name": name, "required_skills": ["rust"]})),
    )
    .await;
    assert_eq!(created.status(), StatusCode::OK, "create project {name}");

    let listed = call(
        app,
        actix_test::TestRequest::get().uri("/projects").cookie(cookie.clone()),
    )
    .await;
    let projects: Vec<ProjectDetails> = actix_test::read_body_json(listed).await;
    projects
        .into_iter()
        .find(|project| project.name == name)
        .map(|project| project.project_id)
        .expect("created project is listed")
}

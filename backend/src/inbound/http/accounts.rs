//! Account handlers: registration, login, logout, and the caller's profile.
//!
//! ```text
//! POST /register {"name":"Ada","email":"ada@x.com","password":"pw","skills":["rust"]}
//! POST /login {"email":"ada@x.com","password":"pw"}
//! POST /logout
//! GET /authenticate
//! GET /profile
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::{
    Error, ErrorCode, LoginCredentials, Registration, RegistrationParts, UserDetails,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::current_user::CurrentUser;
use crate::inbound::http::error::EndpointMessage;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const LOGIN_FAILED: &str = "Authentication failed: Unauthorized access";

/// Registration body. The password is only ever accepted, never returned.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Email address; normalised before storage.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Raw password.
    pub password: String,
    /// Skill labels.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Optional biography.
    #[serde(default)]
    pub bio: Option<String>,
}

impl TryFrom<&RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: &RegisterRequest) -> Result<Self, Self::Error> {
        Registration::try_new(RegistrationParts {
            name: &value.name,
            email: &value.email,
            password: &value.password,
            skills: &value.skills,
            bio: value.bio.as_deref(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Login body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Registered email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Raw password.
    pub password: String,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid body or email already registered", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["accounts"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(&payload.into_inner())?;
    state
        .accounts
        .register(registration)
        .await
        .map_err(|err| match err.code() {
            ErrorCode::InvalidRequest => err.with_message("User not successfully registered"),
            _ => err,
        })
        .or_internal("Error while registering user")?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("User successfully registered"))
}

/// Authenticate and establish a session.
///
/// Every credential or lookup failure answers `401` with the same body, so
/// callers cannot probe which emails are registered.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = String, content_type = "text/plain",
            headers(("Set-Cookie" = String, description = "Connectability session cookie"))),
        (status = 400, description = "Malformed body", body = String, content_type = "text/plain"),
        (status = 401, description = "Invalid credentials", body = String, content_type = "text/plain")
    ),
    tags = ["accounts"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let email = state.accounts.login(&credentials).await.map_err(|err| {
        warn!(email = %credentials.email(), error = %err, "login failed");
        Error::unauthorized(LOGIN_FAILED)
    })?;
    session.persist_user(&email)?;
    info!(%email, "user logged in");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("User successfully logged in"))
}

/// Drop the caller from the session.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear_user();
    HttpResponse::Ok().finish()
}

/// Report whether the session carries a user.
#[utoipa::path(
    get,
    path = "/authenticate",
    responses(
        (status = 200, description = "Session is authenticated"),
        (status = 401, description = "No user in session")
    ),
    tags = ["accounts"],
    operation_id = "authenticate"
)]
#[get("/authenticate")]
pub async fn authenticate(user: Option<CurrentUser>) -> HttpResponse {
    match user {
        Some(_) => HttpResponse::Ok().finish(),
        None => HttpResponse::Unauthorized().finish(),
    }
}

/// Profile of the caller.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Caller profile", body = UserDetails),
        (status = 401, description = "Login required", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["accounts"],
    operation_id = "profile"
)]
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<UserDetails>> {
    let details = state
        .accounts
        .profile(user.email())
        .await
        .or_internal("Error while extracting user details")?;
    Ok(web::Json(details))
}

//! Session gate that resolves the caller for each request.
//!
//! When the session holds a valid `userEmail`, the gate inserts a
//! [`CurrentUser`] into the request extensions. Otherwise the request is
//! forwarded untouched in [`GateMode::PassThrough`], or answered with
//! `401 login required` in [`GateMode::Enforce`] unless its path is public.
//!
//! The gate must sit inside the session middleware: register it with
//! `.wrap(AuthGate::..)` before `.wrap(SessionMiddleware::..)`.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, HttpMessage, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::domain::{Email, Error};
use crate::inbound::http::current_user::CurrentUser;
use crate::inbound::http::session::USER_EMAIL_KEY;

/// Paths reachable without a session when the gate enforces logins.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &[
    "/register",
    "/login",
    "/logout",
    "/authenticate",
    "/health/ready",
    "/health/live",
    "/docs",
    "/api-docs",
];

/// How the gate treats requests without a current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GateMode {
    /// Forward every request; handlers decide whether they need a caller.
    #[default]
    PassThrough,
    /// Reject anonymous requests outside the public allow-list.
    Enforce {
        /// Public path prefixes. A prefix matches itself and its sub-paths.
        public_paths: Arc<[String]>,
    },
}

impl GateMode {
    /// Enforcing mode with [`DEFAULT_PUBLIC_PATHS`].
    pub fn enforce_default() -> Self {
        Self::Enforce {
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    /// Whether an anonymous request to `path` must be refused.
    pub fn requires_user(&self, path: &str) -> bool {
        match self {
            Self::PassThrough => false,
            Self::Enforce { public_paths } => !public_paths.iter().any(|public| {
                path == public
                    || path
                        .strip_prefix(public.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }),
        }
    }
}

/// Middleware placing the session's user into request extensions.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use connectability::middleware::{AuthGate, GateMode};
///
/// let app = App::new().wrap(AuthGate::new(GateMode::PassThrough));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    mode: GateMode,
}

impl AuthGate {
    /// Build a gate with the given mode.
    pub fn new(mode: GateMode) -> Self {
        Self { mode }
    }

    /// Pass-through by default; enforcing with the default allow-list when
    /// `enforce` is set.
    pub fn from_enforce_flag(enforce: bool) -> Self {
        if enforce {
            Self::new(GateMode::enforce_default())
        } else {
            Self::default()
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service,
            mode: self.mode.clone(),
        }))
    }
}

/// Service wrapper produced by [`AuthGate`].
pub struct AuthGateMiddleware<S> {
    service: S,
    mode: GateMode,
}

fn session_user(req: &ServiceRequest) -> Option<Email> {
    let raw = match req.get_session().get::<String>(USER_EMAIL_KEY) {
        Ok(raw) => raw?,
        Err(error) => {
            warn!(%error, "unreadable session state");
            return None;
        }
    };
    match Email::new(&raw) {
        Ok(email) => Some(email),
        Err(error) => {
            debug!(%error, "ignoring invalid session email");
            None
        }
    }
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match session_user(&req) {
            Some(email) => {
                req.extensions_mut().insert(CurrentUser::new(email));
            }
            None if self.mode.requires_user(req.path()) => {
                debug!(path = req.path(), "anonymous request refused");
                let refusal = Error::unauthorized("login required").error_response();
                return Box::pin(ready(Ok(req.into_response(refusal).map_into_right_body())));
            }
            None => {}
        }
        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

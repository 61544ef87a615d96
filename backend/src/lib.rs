//! Connectability backend library.
//!
//! Hexagonal layout: `domain` holds types, ports, and services; `inbound`
//! exposes them over HTTP; `outbound` implements the driven ports; and
//! `middleware` carries request tracing and the session gate.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns such
//! as tracing and session authentication.

pub mod auth_gate;
pub mod trace;

pub use auth_gate::{AuthGate, DEFAULT_PUBLIC_PATHS, GateMode};
pub use trace::Trace;

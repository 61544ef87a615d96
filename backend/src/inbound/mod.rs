//! Inbound adapters that translate external requests into driving-port calls
//! while keeping framework details at the edge.
//!
//! HTTP is the only transport; handlers live under [`http`].

pub mod http;

//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel with a bb8 pool.
//! - **memory**: a process-local store used when no database is configured
//!   and by HTTP tests.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business logic.

pub mod memory;
pub mod persistence;

pub use memory::InMemoryStore;

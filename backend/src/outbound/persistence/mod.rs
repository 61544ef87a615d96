//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and carry no
//! business rules. Row structs (`models`) and table definitions (`schema`)
//! stay private to this module. Queries run on `diesel-async` connections
//! checked out from a `bb8` pool, and every Diesel failure is reduced to a
//! port error before it leaves.
//!
//! # Example
//!
//! ```no_run
//! use connectability::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/connectability")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_invitation_repository;
mod diesel_project_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_invitation_repository::DieselInvitationRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError};

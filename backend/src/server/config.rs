//! Server settings and the assembled server configuration.

use std::net::{AddrParseError, SocketAddr};

use connectability::inbound::http::session_config::SessionSettings;
use connectability::middleware::AuthGate;
use connectability::outbound::persistence::{DEFAULT_POOL_MAX_SIZE, DbPool};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Process settings loaded via OrthoConfig (`CONNECTABILITY_*` variables,
/// configuration files, and CLI flags).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONNECTABILITY")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps state in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Refuse anonymous requests outside the public allow-list.
    #[ortho_config(default = false)]
    pub enforce_sessions: bool,
}

impl ServerSettings {
    /// Configured listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Configured pool size, falling back to the pool default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}

/// Everything `create_server` needs, assembled by `main`.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) gate: AuthGate,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// In-memory, pass-through configuration.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            gate: AuthGate::default(),
            db_pool: None,
        }
    }

    /// Use PostgreSQL repositories backed by `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the session gate.
    #[must_use]
    pub fn with_gate(mut self, gate: AuthGate) -> Self {
        self.gate = gate;
        self
    }
}

//! Backend entry-point: loads settings, prepares persistence, and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use connectability::inbound::http::health::HealthState;
use connectability::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_env,
};
use connectability::middleware::AuthGate;
use connectability::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Session cookie settings from the process environment.
fn session_settings() -> Result<SessionSettings> {
    session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load server settings: {err}"))?;
    let session = session_settings()?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("CONNECTABILITY_BIND_ADDR is not a socket address")?;

    let mut config = ServerConfig::new(session, bind_addr)
        .with_gate(AuthGate::from_enforce_flag(settings.enforce_sessions));
    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("database migration failed")?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
        )
        .await
        .wrap_err("database pool construction failed")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to bind server")?;
    info!(%bind_addr, enforce_sessions = settings.enforce_sessions, "server listening");
    server.await.wrap_err("server terminated abnormally")
}

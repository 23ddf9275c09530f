#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]
//! Backend entry-point: loads configuration, prepares storage and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, bail, eyre};
use ortho_config::OrthoConfig;
use rand::RngCore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use todo_backend::inbound::http::health::HealthState;
use todo_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use todo_backend::outbound::security::TokenSettings;
use todo_backend::settings::AppSettings;

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

/// Resolve the token signing secret.
///
/// Debug builds fall back to a random per-process secret so local runs work
/// without configuration; tokens then do not survive a restart.
fn token_settings(settings: &AppSettings) -> Result<TokenSettings> {
    let secret = match settings.token_secret() {
        Some(secret) => secret.as_bytes().to_vec(),
        None if cfg!(debug_assertions) => {
            warn!("TODO_TOKEN_SECRET not set; using an ephemeral secret (dev only)");
            let mut bytes = vec![0u8; 32];
            rand::thread_rng().fill_bytes(&mut bytes);
            bytes
        }
        None => bail!("TODO_TOKEN_SECRET must be set in release builds"),
    };
    Ok(TokenSettings::new(
        secret,
        settings.token_issuer(),
        settings.token_lifetime(),
    ))
}

async fn connect_database(settings: &AppSettings, database_url: &str) -> Result<DbPool> {
    if settings.run_migrations {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }
    DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to build database pool")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    info!(?settings, "configuration loaded");

    let bind_addr = settings
        .bind_addr()
        .wrap_err_with(|| format!("invalid bind address {}:{}", settings.host(), settings.port()))?;
    let mut config = ServerConfig::new(bind_addr, token_settings(&settings)?);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_database(&settings, database_url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await?;
    Ok(())
}

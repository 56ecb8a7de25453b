#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use axum::Extension;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::router;
use crate::settings::Settings;
use crate::storage::DEFAULT_TABLE;
use crate::storage::Memory;
use crate::storage::NoteStore;
use crate::storage::Postgres;
use crate::storage::TableName;
use crate::utils::env_var_or_else;

mod api;
mod graceful_shutdown;
mod notes;
mod prettytime;
mod settings;
mod storage;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "notekeep=debug,tower_http=debug";
const DEFAULT_SETTINGS_FILE: &str = "env.json";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let settings = setup_settings()?;

    let app = setup_app(&settings).await?;

    let address = setup_address(&settings)?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Could not listen on {address}"))?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// Notes are stored in PostgreSQL when a hostname is configured, in memory otherwise
///
/// # Errors
///
/// Will return `Err` if any of its dependencies fail to load:
/// - Table name
/// - Database connection
pub async fn setup_app(settings: &Settings) -> Result<Router> {
    let postgresql = &settings.postgresql;

    if !postgresql.is_configured() {
        tracing::warn!("No PostgreSQL hostname configured, notes are kept in memory");

        return Ok(create_router(Memory::new()));
    }

    let table = TableName::new(&env_var_or_else("NOTE_TABLE", || {
        DEFAULT_TABLE.to_string()
    }))?;

    let connection_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&postgresql.connection_string())
        .await
        .with_context(|| {
            format!(
                "Could not connect to PostgreSQL at {}:{}",
                postgresql.hostname, postgresql.port
            )
        })?;

    tracing::info!(
        "Storing notes in table `{table}` of PostgreSQL at {}:{}",
        postgresql.hostname,
        postgresql.port
    );

    Ok(create_router(Postgres::with_table(connection_pool, table)))
}

/// Create the router for the notes API
fn create_router<S: NoteStore>(storage: S) -> Router {
    Router::new()
        .nest("/api", router::<S>())
        .fallback(api::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(env_var_or_else("RUST_LOG", || {
            DEFAULT_RUST_LOG.into()
        })))
        .with(fmt::layer())
        .init();
}

fn setup_settings() -> Result<Settings> {
    let path = env_var_or_else("SETTINGS_FILE", || DEFAULT_SETTINGS_FILE.into());

    let settings = Settings::load(&path)?;
    tracing::info!("Loaded settings from {}", settings.path().display());

    if settings.server.use_https {
        tracing::warn!("HTTPS is not served by this process, only HTTP");
    }

    Ok(settings)
}

fn setup_address(settings: &Settings) -> Result<SocketAddr> {
    let mut address = match std::env::var("ADDRESS") {
        Ok(address) if !address.is_empty() => address.parse::<SocketAddr>()?,
        _ => settings.server.address(),
    };

    // optional override of just the port
    if let Ok(port) = std::env::var("PORT") {
        // only check non-empty strings
        if !port.is_empty() {
            let port = port.parse::<u16>()?;

            address.set_port(port);
        }
    }

    Ok(address)
}

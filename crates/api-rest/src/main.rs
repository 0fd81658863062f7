//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging of the HTTP surface. The workspace's
//! main `ppr-run` binary serves the same router.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use ppr_core::config::{database_path_from_env_value, reference_data_from_env_value};
use ppr_core::{CoreConfig, Database, SystemClock, DEFAULT_REST_ADDR};

/// Main entry point for the PPR REST API server
///
/// # Environment Variables
/// - `PPR_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PPR_DATABASE_PATH`: SQLite database file (default: "ppr.sqlite3")
/// - `PPR_REFERENCE_DATA`: Optional YAML file imported at startup
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the database cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("ppr_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PPR_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = CoreConfig::new(
        database_path_from_env_value(std::env::var("PPR_DATABASE_PATH").ok()),
        reference_data_from_env_value(std::env::var("PPR_REFERENCE_DATA").ok()),
    )?;
    let db = Database::open_configured(&cfg)?;

    tracing::info!(
        "-- Starting PPR REST API on {} (database {})",
        addr,
        cfg.database_path().display()
    );

    let app = router(AppState::new(db, Arc::new(SystemClock)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

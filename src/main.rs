use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use ppr_core::config::{database_path_from_env_value, reference_data_from_env_value};
use ppr_core::{CoreConfig, DEFAULT_REST_ADDR, Database, SystemClock};

/// Main entry point for the PPR application
///
/// Resolves configuration once, opens (and migrates) the SQLite database, imports reference
/// data when configured, then serves the REST API.
///
/// # Environment Variables
/// - `PPR_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PPR_DATABASE_PATH`: SQLite database file (default: "ppr.sqlite3")
/// - `PPR_REFERENCE_DATA`: Optional YAML file with catalog and directory data
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ppr_run=info".parse()?)
                .add_directive("ppr_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PPR_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = CoreConfig::new(
        database_path_from_env_value(std::env::var("PPR_DATABASE_PATH").ok()),
        reference_data_from_env_value(std::env::var("PPR_REFERENCE_DATA").ok()),
    )?;
    let db = Database::open_configured(&cfg)?;

    tracing::info!("++ Starting PPR REST on {}", rest_addr);

    let rest_app = router(AppState::new(db, Arc::new(SystemClock)));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, rest_app).await?;

    Ok(())
}

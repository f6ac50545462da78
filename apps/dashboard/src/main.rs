//! # Tally Dashboard Entry Point
//!
//! Runs the dashboard backend as a JSON-lines process: intents on stdin,
//! responses on stdout, logs on stderr. A web or desktop shell spawns it
//! and talks to it over the pipes.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (`TALLY_*` environment variables)
//! 3. Determine database path (app data directory unless overridden)
//! 4. Connect to database & run migrations
//! 5. Load the initial snapshot
//! 6. Serve intents until stdin closes

use std::sync::Arc;

use tally_dashboard::{database_path, init_tracing, serve, ConfigState, Dashboard, Intent};
use tally_db::{Database, DbConfig};
use tokio::io::BufReader;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Tally dashboard");

    let config = ConfigState::from_env()?;
    let db_path = database_path(&config)?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path).max_connections(config.max_connections)).await?;
    let stats = db.stats().await?;
    info!(
        items = stats.items,
        sales = stats.sales,
        lines = stats.lines,
        "Database ready"
    );

    let dashboard = Dashboard::new(Arc::new(db.clone()), config);

    // The frontend can still ask for a reload later.
    if let Err(e) = dashboard.dispatch(Intent::Reload).await {
        warn!(error = %e, "Initial load failed");
    }

    serve(
        &dashboard,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    db.close().await;
    info!("Tally dashboard stopped");
    Ok(())
}

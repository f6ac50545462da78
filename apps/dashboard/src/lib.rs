//! # Tally Dashboard Library
//!
//! Backend of the Tally sales dashboard: recording sales, the history
//! table and the top items chart.
//!
//! ## Module Organization
//! ```text
//! tally_dashboard/
//! ├── lib.rs          ◄─── You are here (startup helpers, command loop)
//! ├── dashboard.rs    ◄─── Intent routing
//! ├── store/
//! │   ├── mod.rs      ◄─── SalesStore trait, StoreError
//! │   ├── sqlite.rs   ◄─── SalesStore for tally_db::Database
//! │   └── memory.rs   ◄─── In-memory store with failure injection
//! ├── submit.rs       ◄─── Two-step write with compensation
//! ├── delete.rs       ◄─── Sale deletion
//! ├── state/
//! │   ├── snapshot.rs ◄─── Cached items, sales, ranking
//! │   ├── entry.rs    ◄─── Entry form session
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── entry.rs    ◄─── Form editing commands
//! │   ├── sale.rs     ◄─── Submit / delete commands
//! │   └── view.rs     ◄─── Reload / history / chart / items
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Command Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin  ─► {"type":"submitSale"}                                       │
//! │               │                                                         │
//! │               ▼                                                         │
//! │         Dashboard::dispatch                                            │
//! │               │                                                         │
//! │               ▼                                                         │
//! │  stdout ◄─ {"ok":{...}}  or  {"error":{"code":"...","message":"..."}}  │
//! │                                                                         │
//! │  stderr ◄─ tracing output                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod dashboard;
pub mod delete;
pub mod error;
pub mod state;
pub mod store;
pub mod submit;

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub use commands::{Intent, Reply};
pub use dashboard::Dashboard;
pub use error::{ApiError, ErrorCode};
pub use state::{ConfigError, ConfigState};

/// One line of output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    Ok(Reply),
    Error(ApiError),
}

impl From<Result<Reply, ApiError>> for Response {
    fn from(result: Result<Reply, ApiError>) -> Self {
        match result {
            Ok(reply) => Response::Ok(reply),
            Err(err) => Response::Error(err),
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries the response stream.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_dashboard=trace` - Trace the dashboard only
/// - Default: INFO, DEBUG for tally crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,tally_core=debug,tally_db=debug,tally_dashboard=debug,sqlx=warn")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.tally.dashboard/tally.db`
/// - **Windows**: `%APPDATA%\tally\dashboard\data\tally.db`
/// - **Linux**: `~/.local/share/dashboard/tally.db`
///
/// `TALLY_DB_PATH` (via [`ConfigState`]) takes precedence.
pub fn database_path(config: &ConfigState) -> Result<PathBuf, ConfigError> {
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "tally", "dashboard")
        .ok_or_else(|| ConfigError::DataDir("no home directory".to_string()))?;
    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("tally.db"))
}

/// Reads intents line by line and writes one response line per intent.
///
/// Blank lines are skipped. Returns when the input ends.
pub async fn serve<R, W>(dashboard: &Dashboard, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response: Response = match serde_json::from_str::<Intent>(line) {
            Ok(intent) => dashboard.dispatch(intent).await.into(),
            Err(e) => {
                debug!(error = %e, "Malformed intent");
                Response::Error(ApiError::new(
                    ErrorCode::MalformedRequest,
                    format!("Malformed intent: {}", e),
                ))
            }
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
        handled += 1;
    }

    info!(handled, "Input closed");
    Ok(())
}

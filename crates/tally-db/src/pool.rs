//! # Database Handle
//!
//! Opening the SQLite store and handing out repositories.
//!
//! ```text
//!  DbConfig ──► Database::new ──► SqlitePool ──┬──► db.items()  ItemRepository
//!                    │                          └──► db.sales()  SaleRepository
//!                    └──► migrations (unless disabled)
//! ```
//!
//! The file is opened in WAL mode: a history reload reads while a sale is
//! being written. Foreign keys are switched on for every connection, which
//! is what rejects a line pointing at a deleted sale or an unknown item.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::item::ItemRepository;
use crate::repository::sale::SaleRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where and how to open the sales database.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/tally/tally.db").max_connections(4);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file. `None` opens a private in-memory database.
    pub path: Option<PathBuf>,

    /// Pool size. Default: 5
    pub max_connections: u32,

    /// Connections kept open while idle. Default: 1
    pub min_connections: u32,

    /// How long a query waits for a free connection. Default: 30s
    pub acquire_timeout: Duration,

    /// How long SQLite waits on a locked file before failing. Default: 5s
    pub busy_timeout: Duration,

    /// Apply pending migrations when opening. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for a database file, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: Some(path.into()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Configuration for a throwaway in-memory database.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every new SQLite connection to `:memory:` starts an empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            path: None,
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(1),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.path {
            Some(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
            None => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };

        Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Row counts of the three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DbStats {
    pub items: i64,
    pub sales: i64,
    pub lines: i64,
}

/// Open sales database. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let location = config
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        info!(location = %location, "Opening sales database");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout);

        if config.is_in_memory() {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies every embedded migration that has not run yet.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;

        let status = migrations::migration_status(&self.pool).await?;
        info!(
            applied = status.applied,
            embedded = status.embedded,
            "Schema up to date"
        );
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Counts items, sales and sale lines in one round trip.
    pub async fn stats(&self) -> DbResult<DbStats> {
        let (items, sales, lines): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM items),
                (SELECT COUNT(*) FROM sales),
                (SELECT COUNT(*) FROM sale_lines)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DbStats {
            items,
            sales,
            lines,
        })
    }

    /// Closes every connection. Later queries fail with `ConnectionFailed`.
    pub async fn close(&self) {
        debug!("Closing sales database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

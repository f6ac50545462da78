//! # Sales Store Boundary
//!
//! The persistence contract the dashboard depends on. Everything above this
//! trait (submission, deletion, reload) works the same against SQLite or
//! the in-memory store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SalesStore                                        │
//! │                                                                         │
//! │  SaleSubmitter ──┐                                                     │
//! │  SaleDeleter ────┼──► Arc<dyn SalesStore>                              │
//! │  reload ─────────┘         │                                            │
//! │                            ├──► tally_db::Database   (SQLite, sqlx)    │
//! │                            └──► MemoryStore          (tests, demos)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;
mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_core::{Item, SaleLine, SaleRecord};
use tally_db::DbError;
use thiserror::Error;

pub use memory::{LineGate, MemoryStore, StoreCalls};

/// Errors returned by a [`SalesStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The store refused the data (unknown item, constraint violation).
    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other read or write failure.
    #[error("Store operation failed: {0}")]
    Failed(String),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::CheckViolation { .. } => StoreError::Rejected(err.to_string()),
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                StoreError::Unavailable(err.to_string())
            }
            DbError::MigrationFailed(_) | DbError::QueryFailed(_) | DbError::Internal(_) => {
                StoreError::Failed(err.to_string())
            }
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for items and sales.
///
/// Every method is a single round trip; callers compose them (the
/// submitter writes the header and the lines as two calls).
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// All items, ordered by name.
    async fn list_items(&self) -> StoreResult<Vec<Item>>;

    /// All sales with lines resolved to item names, newest `sale_date`
    /// first, then newest creation time first.
    async fn list_sales(&self) -> StoreResult<Vec<SaleRecord>>;

    /// Writes a sale header and returns its ID.
    async fn create_sale(&self, buyer_name: &str, sale_date: NaiveDate) -> StoreResult<String>;

    /// Writes all lines of a sale. Either every line is stored or none is.
    async fn create_sale_lines(&self, sale_id: &str, lines: &[SaleLine]) -> StoreResult<()>;

    /// Removes a sale and its lines. `NotFound` when the sale is absent.
    async fn delete_sale(&self, sale_id: &str) -> StoreResult<()>;
}

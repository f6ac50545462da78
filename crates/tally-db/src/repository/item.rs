//! # Item Repository
//!
//! The item catalog backing the entry form's item selector.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use tally_core::Item;

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists every item, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name
            FROM items
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Loaded item catalog");
        Ok(items)
    }

    /// Gets an item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>("SELECT id, name FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Inserts a new item with a generated ID.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if an item with this name already exists.
    pub async fn insert(&self, name: &str) -> DbResult<Item> {
        let item = Item {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };

        debug!(id = %item.id, name = %item.name, "Inserting item");

        sqlx::query("INSERT INTO items (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&item.id)
            .bind(&item.name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(item)
    }

    /// Counts items in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

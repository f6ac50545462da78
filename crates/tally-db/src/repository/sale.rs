//! # Sale Repository
//!
//! Database operations for sale headers and sale lines.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. HEADER                                                             │
//! │     └── create_sale() → sale id                                        │
//! │                                                                         │
//! │  2. LINES                                                              │
//! │     └── insert_lines() → all lines in one transaction                  │
//! │         (on failure the caller deletes the header again)               │
//! │                                                                         │
//! │  3. (OPTIONAL) DELETE                                                  │
//! │     └── delete_sale() → lines first, then header, one transaction      │
//! │                                                                         │
//! │  READ                                                                  │
//! │     └── list_with_lines() → newest sale_date first                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Header and lines are separate calls on purpose: the dashboard owns the
//! two-step write and its compensation, so the same flow runs against any
//! store.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{SaleLine, SaleRecord, SoldLine};

/// Header columns as read from `sales`.
type SaleHeaderRow = (String, String, NaiveDate, DateTime<Utc>);

/// Line columns joined with the item name.
type SoldLineRow = (String, String, String, i64);

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Writes a sale header and returns its generated ID.
    pub async fn create_sale(&self, buyer_name: &str, sale_date: NaiveDate) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, buyer = %buyer_name, date = %sale_date, "Creating sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, buyer_name, sale_date, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&id)
        .bind(buyer_name)
        .bind(sale_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Writes every line of a sale in one transaction.
    ///
    /// Either all lines are written or none are. Line order is kept in
    /// the `position` column.
    ///
    /// ## Errors
    /// - `ForeignKeyViolation` when the sale or an item does not exist
    /// - `CheckViolation` when a quantity is below 1
    pub async fn insert_lines(&self, sale_id: &str, lines: &[SaleLine]) -> DbResult<()> {
        debug!(sale_id = %sale_id, count = lines.len(), "Inserting sale lines");

        let mut tx = self.pool.begin().await?;

        for (position, line) in lines.iter().enumerate() {
            let position = i64::try_from(position).map_err(|_| {
                DbError::Internal(format!("line position {} out of range", position))
            })?;
            sqlx::query(
                r#"
                INSERT INTO sale_lines (id, sale_id, item_id, quantity, position)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(sale_id)
            .bind(&line.item_id)
            .bind(i64::from(line.quantity.get()))
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Deletes a sale and its lines.
    ///
    /// Lines go first so the delete never depends on the cascade being
    /// enabled on the connection.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no sale has this ID.
    pub async fn delete_sale(&self, sale_id: &str) -> DbResult<()> {
        debug!(sale_id = %sale_id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query("DELETE FROM sale_lines WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        let header = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        if header.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::not_found("Sale", sale_id));
        }

        tx.commit().await?;

        debug!(
            sale_id = %sale_id,
            lines_removed = lines.rows_affected(),
            "Sale deleted"
        );
        Ok(())
    }

    /// Lists every sale with its lines.
    ///
    /// Sales are ordered by `sale_date` descending, then by creation time
    /// descending. Lines keep the order they were submitted in.
    pub async fn list_with_lines(&self) -> DbResult<Vec<SaleRecord>> {
        let mut tx = self.pool.begin().await?;

        let headers: Vec<SaleHeaderRow> = sqlx::query_as(
            r#"
            SELECT id, buyer_name, sale_date, created_at
            FROM sales
            ORDER BY sale_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let line_rows: Vec<SoldLineRow> = sqlx::query_as(
            r#"
            SELECT sl.sale_id, sl.item_id, i.name, sl.quantity
            FROM sale_lines sl
            JOIN items i ON i.id = sl.item_id
            ORDER BY sl.sale_id, sl.position
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut lines_by_sale: HashMap<String, Vec<SoldLine>> = HashMap::new();
        for (sale_id, item_id, item_name, quantity) in line_rows {
            let quantity = u32::try_from(quantity).map_err(|_| {
                DbError::Internal(format!(
                    "sale {sale_id} has out-of-range quantity {quantity}"
                ))
            })?;

            lines_by_sale.entry(sale_id).or_default().push(SoldLine {
                item_id,
                item_name,
                quantity,
            });
        }

        let sales: Vec<SaleRecord> = headers
            .into_iter()
            .map(|(id, buyer_name, sale_date, created_at)| {
                let lines = lines_by_sale.remove(&id).unwrap_or_default();
                SaleRecord {
                    id,
                    buyer_name,
                    sale_date,
                    created_at,
                    lines,
                }
            })
            .collect();

        debug!(count = sales.len(), "Loaded sale history");
        Ok(sales)
    }

    /// Counts sale headers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts lines belonging to a sale.
    pub async fn line_count(&self, sale_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_lines WHERE sale_id = ?1")
            .bind(sale_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tally_core::{Item, Quantity};

    async fn test_db() -> (Database, Item, Item) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let widget = db.items().insert("Widget").await.unwrap();
        let gadget = db.items().insert("Gadget").await.unwrap();
        (db, widget, gadget)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_sale() {
        let (db, widget, gadget) = test_db().await;
        let repo = db.sales();

        let id = repo.create_sale("Grace", date(2026, 1, 5)).await.unwrap();
        repo.insert_lines(
            &id,
            &[
                SaleLine::new(&widget.id, qty(2)),
                SaleLine::new(&gadget.id, qty(4)),
            ],
        )
        .await
        .unwrap();

        let sales = repo.list_with_lines().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, id);
        assert_eq!(sales[0].buyer_name, "Grace");
        assert_eq!(sales[0].sale_date, date(2026, 1, 5));

        let names: Vec<&str> = sales[0].lines.iter().map(|l| l.item_name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gadget"]);
        assert_eq!(sales[0].total_quantity(), 6);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_descending() {
        let (db, widget, _) = test_db().await;
        let repo = db.sales();

        let older = repo.create_sale("A", date(2026, 1, 1)).await.unwrap();
        let newer = repo.create_sale("B", date(2026, 3, 1)).await.unwrap();
        let middle = repo.create_sale("C", date(2026, 2, 1)).await.unwrap();
        for id in [&older, &newer, &middle] {
            repo.insert_lines(id, &[SaleLine::new(&widget.id, qty(1))])
                .await
                .unwrap();
        }

        let ids: Vec<String> = repo
            .list_with_lines()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![newer, middle, older]);
    }

    #[tokio::test]
    async fn test_duplicate_items_stay_separate_lines() {
        let (db, widget, _) = test_db().await;
        let repo = db.sales();

        let id = repo.create_sale("Ada", date(2026, 1, 5)).await.unwrap();
        repo.insert_lines(
            &id,
            &[
                SaleLine::new(&widget.id, qty(1)),
                SaleLine::new(&widget.id, qty(3)),
            ],
        )
        .await
        .unwrap();

        assert_eq!(repo.line_count(&id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_lines_is_all_or_nothing() {
        let (db, widget, _) = test_db().await;
        let repo = db.sales();

        let id = repo.create_sale("Ada", date(2026, 1, 5)).await.unwrap();
        let err = repo
            .insert_lines(
                &id,
                &[
                    SaleLine::new(&widget.id, qty(1)),
                    SaleLine::new("no-such-item", qty(1)),
                ],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(repo.line_count(&id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_sale_removes_lines() {
        let (db, widget, _) = test_db().await;
        let repo = db.sales();

        let id = repo.create_sale("Ada", date(2026, 1, 5)).await.unwrap();
        repo.insert_lines(&id, &[SaleLine::new(&widget.id, qty(2))])
            .await
            .unwrap();

        repo.delete_sale(&id).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(repo.line_count(&id).await.unwrap(), 0);
        assert!(repo.list_with_lines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_sale_is_not_found() {
        let (db, _, _) = test_db().await;
        let err = db.sales().delete_sale("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_header_without_lines_is_listed() {
        let (db, _, _) = test_db().await;
        let repo = db.sales();

        let id = repo.create_sale("Ada", date(2026, 1, 5)).await.unwrap();
        let sales = repo.list_with_lines().await.unwrap();

        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, id);
        assert!(sales[0].lines.is_empty());
    }
}

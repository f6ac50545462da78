//! `SalesStore` over the SQLite database.

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_core::{Item, SaleLine, SaleRecord};
use tally_db::Database;

use super::{SalesStore, StoreResult};

#[async_trait]
impl SalesStore for Database {
    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        Ok(self.items().list_all().await?)
    }

    async fn list_sales(&self) -> StoreResult<Vec<SaleRecord>> {
        Ok(self.sales().list_with_lines().await?)
    }

    async fn create_sale(&self, buyer_name: &str, sale_date: NaiveDate) -> StoreResult<String> {
        Ok(self.sales().create_sale(buyer_name, sale_date).await?)
    }

    async fn create_sale_lines(&self, sale_id: &str, lines: &[SaleLine]) -> StoreResult<()> {
        Ok(self.sales().insert_lines(sale_id, lines).await?)
    }

    async fn delete_sale(&self, sale_id: &str) -> StoreResult<()> {
        Ok(self.sales().delete_sale(sale_id).await?)
    }
}

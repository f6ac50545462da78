//! Sale deletion.
//!
//! Removes a sale together with its lines. Deleting a sale that is already
//! gone is not an error: the caller wanted it gone and it is.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::store::{SalesStore, StoreResult};

/// What a delete actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeleteOutcome {
    Deleted,
    /// No sale had this ID.
    NotFound,
}

pub struct SaleDeleter {
    store: Arc<dyn SalesStore>,
}

impl SaleDeleter {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        SaleDeleter { store }
    }

    /// Deletes a sale and its lines as one unit.
    ///
    /// Store failures other than "not found" are returned unchanged and
    /// leave the sale in place.
    pub async fn delete(&self, sale_id: &str) -> StoreResult<DeleteOutcome> {
        debug!(sale_id = %sale_id, "Deleting sale");

        match self.store.delete_sale(sale_id).await {
            Ok(()) => {
                info!(sale_id = %sale_id, "Sale deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) if e.is_not_found() => {
                warn!(sale_id = %sale_id, "Sale already gone");
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }
}

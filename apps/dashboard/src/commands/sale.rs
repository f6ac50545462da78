//! # Sale Commands
//!
//! Submitting the entry form and deleting recorded sales. Both follow the
//! same shape: write, then reload, then answer with the refreshed panels.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit_sale                          delete_sale                       │
//! │  ───────────                          ───────────                       │
//! │  copy form out of EntryState          validate id                       │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  SaleSubmitter::submit                SaleDeleter::delete               │
//! │       │ ok → close form                    │                            │
//! │       ▼                                    ▼                            │
//! │  reload ─► DashboardView              reload ─► DashboardView          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A reload that fails after a committed write does not turn the write into
//! an error: the response carries the previous panels and `stale: true`.

use serde::Serialize;
use tracing::{debug, warn};

use crate::commands::view::{reload, DashboardView};
use crate::delete::{DeleteOutcome, SaleDeleter};
use crate::error::ApiError;
use crate::state::{AppState, ConfigState, EntryState};
use crate::store::SalesStore;
use crate::submit::SaleSubmitter;
use tally_core::validation::validate_sale_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub sale_id: String,
    pub line_count: usize,
    #[serde(flatten)]
    pub view: DashboardView,
    /// The reload after the write failed; `view` shows the previous state.
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub sale_id: String,
    pub outcome: DeleteOutcome,
    #[serde(flatten)]
    pub view: DashboardView,
    pub stale: bool,
}

/// Submits the open entry form.
///
/// The form stays open on failure so the user can correct or retry it. On
/// success it is closed unless it was reopened or edited in the meantime.
pub async fn submit_sale(
    store: &dyn SalesStore,
    submitter: &SaleSubmitter,
    entry: &EntryState,
    app: &AppState,
    config: &ConfigState,
) -> Result<SubmitResponse, ApiError> {
    debug!("submit_sale command");

    let draft = entry
        .with_session(|s| s.draft())
        .ok_or_else(ApiError::entry_closed)?;

    let receipt = submitter
        .submit(&draft.buyer_name, draft.sale_date, draft.lines)
        .await?;
    if !entry.close_if(draft.stamp) {
        debug!(sale_id = %receipt.sale_id, "Entry form changed during submit, leaving it open");
    }

    let (view, stale) = refreshed(store, app, config).await;
    Ok(SubmitResponse {
        sale_id: receipt.sale_id,
        line_count: receipt.line_count,
        view,
        stale,
    })
}

/// Deletes a sale. Deleting a sale that no longer exists still succeeds,
/// with outcome `notFound`.
pub async fn delete_sale(
    store: &dyn SalesStore,
    deleter: &SaleDeleter,
    app: &AppState,
    config: &ConfigState,
    sale_id: &str,
) -> Result<DeleteResponse, ApiError> {
    debug!(sale_id = %sale_id, "delete_sale command");
    validate_sale_id(sale_id)?;

    let outcome = deleter.delete(sale_id).await?;

    let (view, stale) = refreshed(store, app, config).await;
    Ok(DeleteResponse {
        sale_id: sale_id.to_string(),
        outcome,
        view,
        stale,
    })
}

async fn refreshed(store: &dyn SalesStore, app: &AppState, config: &ConfigState) -> (DashboardView, bool) {
    match reload(store, app).await {
        Ok(snapshot) => (DashboardView::from_snapshot(&snapshot, config), false),
        Err(e) => {
            warn!(error = %e, "Reload after write failed, serving cached views");
            (DashboardView::from_snapshot(&app.snapshot(), config), true)
        }
    }
}

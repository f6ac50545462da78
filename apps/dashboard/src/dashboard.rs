//! # Dashboard
//!
//! Owns the store handle and every piece of state, and routes each
//! [`Intent`] to its command function.

use std::sync::Arc;

use tracing::debug;

use crate::commands::view::DashboardView;
use crate::commands::{entry, sale, view, Intent, Reply};
use crate::delete::SaleDeleter;
use crate::error::ApiError;
use crate::state::{AppState, ConfigState, EntryState};
use crate::store::SalesStore;
use crate::submit::{SaleSubmitter, SubmitPhase};

pub struct Dashboard {
    store: Arc<dyn SalesStore>,
    app: AppState,
    entry: EntryState,
    submitter: SaleSubmitter,
    deleter: SaleDeleter,
    config: ConfigState,
}

impl Dashboard {
    pub fn new(store: Arc<dyn SalesStore>, config: ConfigState) -> Self {
        Dashboard {
            submitter: SaleSubmitter::new(store.clone()),
            deleter: SaleDeleter::new(store.clone()),
            store,
            app: AppState::new(),
            entry: EntryState::new(),
            config,
        }
    }

    /// Handles one intent.
    pub async fn dispatch(&self, intent: Intent) -> Result<Reply, ApiError> {
        debug!(intent = intent.name(), "Dispatching intent");

        let reply = match intent {
            Intent::OpenEntry { date } => Reply::Entry(entry::open_entry(&self.entry, date.as_deref())?),
            Intent::CancelEntry => {
                entry::cancel_entry(&self.entry);
                Reply::Done
            }
            Intent::GetEntry => Reply::Entry(entry::get_entry(&self.entry)?),
            Intent::AddRow => Reply::Entry(entry::add_row(&self.entry)?),
            Intent::RemoveRow { row_id } => Reply::Entry(entry::remove_row(&self.entry, row_id)?),
            Intent::SelectItem { row_id, item_id } => {
                Reply::Entry(entry::select_item(&self.entry, row_id, item_id)?)
            }
            Intent::SetQuantity { row_id, value } => {
                Reply::Entry(entry::set_quantity(&self.entry, row_id, &value)?)
            }
            Intent::SetBuyer { name } => Reply::Entry(entry::set_buyer(&self.entry, name)?),
            Intent::SetDate { date } => Reply::Entry(entry::set_date(&self.entry, &date)?),
            Intent::SubmitSale => Reply::Submitted(
                sale::submit_sale(
                    self.store.as_ref(),
                    &self.submitter,
                    &self.entry,
                    &self.app,
                    &self.config,
                )
                .await?,
            ),
            Intent::DeleteSale { sale_id } => Reply::Deleted(
                sale::delete_sale(
                    self.store.as_ref(),
                    &self.deleter,
                    &self.app,
                    &self.config,
                    &sale_id,
                )
                .await?,
            ),
            Intent::Reload => {
                let snapshot = view::reload(self.store.as_ref(), &self.app).await?;
                Reply::Dashboard(DashboardView::from_snapshot(&snapshot, &self.config))
            }
            Intent::GetHistory => Reply::History(view::get_history(&self.app)),
            Intent::GetChart => Reply::Chart(view::get_chart(&self.app, &self.config)),
            Intent::GetItems => Reply::Items(view::get_items(&self.app)),
        };

        Ok(reply)
    }

    /// Phase of the current or last submission.
    pub fn submit_phase(&self) -> SubmitPhase {
        self.submitter.phase()
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delete::DeleteOutcome;
    use crate::error::ErrorCode;
    use crate::store::MemoryStore;
    use tally_core::rows::RowId;

    const DATE: &str = "2026-01-05";

    fn dashboard(items: &[&str]) -> (Dashboard, MemoryStore) {
        let store = MemoryStore::with_items(items);
        let dashboard = Dashboard::new(Arc::new(store.clone()), ConfigState::default());
        (dashboard, store)
    }

    fn entry_of(reply: Reply) -> crate::state::EntryView {
        match reply {
            Reply::Entry(view) => view,
            other => panic!("expected entry, got {:?}", other),
        }
    }

    /// Fills the open form: one row per `(item, quantity)`.
    async fn fill(dashboard: &Dashboard, store: &MemoryStore, buyer: &str, lines: &[(&str, u32)]) {
        let mut row = entry_of(dashboard.dispatch(Intent::GetEntry).await.unwrap()).rows[0].id;

        for (i, (item, quantity)) in lines.iter().enumerate() {
            if i > 0 {
                let view = entry_of(dashboard.dispatch(Intent::AddRow).await.unwrap());
                row = view.rows.last().unwrap().id;
            }
            dashboard
                .dispatch(Intent::SelectItem {
                    row_id: row,
                    item_id: store.item_id(item),
                })
                .await
                .unwrap();
            dashboard
                .dispatch(Intent::SetQuantity {
                    row_id: row,
                    value: quantity.to_string(),
                })
                .await
                .unwrap();
        }

        dashboard
            .dispatch(Intent::SetBuyer {
                name: buyer.to_string(),
            })
            .await
            .unwrap();
    }

    async fn record_sale(
        dashboard: &Dashboard,
        store: &MemoryStore,
        buyer: &str,
        lines: &[(&str, u32)],
    ) -> crate::commands::sale::SubmitResponse {
        dashboard
            .dispatch(Intent::OpenEntry {
                date: Some(DATE.to_string()),
            })
            .await
            .unwrap();
        fill(dashboard, store, buyer, lines).await;

        match dashboard.dispatch(Intent::SubmitSale).await.unwrap() {
            Reply::Submitted(response) => response,
            other => panic!("expected submitted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_record_sale_refreshes_history_and_chart() {
        let (dashboard, store) = dashboard(&["Widget", "Gadget"]);

        let response = record_sale(&dashboard, &store, "Grace", &[("Widget", 2), ("Gadget", 4)]).await;

        assert_eq!(response.line_count, 2);
        assert!(!response.stale);
        assert_eq!(response.view.history.rows.len(), 1);
        let row = &response.view.history.rows[0];
        assert_eq!(row.sale_id, response.sale_id);
        assert_eq!(row.buyer_name, "Grace");
        assert_eq!(row.date, "Jan 5, 2026");
        assert_eq!(row.items, "Widget (2), Gadget (4)");
        assert_eq!(response.view.chart.labels, vec!["Gadget", "Widget"]);
        assert_eq!(response.view.chart.data, vec![4, 2]);

        // The form closes after a committed sale.
        let err = dashboard.dispatch(Intent::GetEntry).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EntryClosed);
    }

    #[tokio::test]
    async fn test_sales_accumulate_in_ranking() {
        let (dashboard, store) = dashboard(&["Widget", "Gadget"]);

        record_sale(&dashboard, &store, "Grace", &[("Widget", 2), ("Gadget", 4)]).await;
        let response = record_sale(&dashboard, &store, "Alan", &[("Widget", 3)]).await;

        assert_eq!(response.view.history.rows.len(), 2);
        assert_eq!(response.view.chart.labels, vec!["Widget", "Gadget"]);
        assert_eq!(response.view.chart.data, vec![5, 4]);
    }

    #[tokio::test]
    async fn test_tied_totals_keep_first_seen_order() {
        let (dashboard, store) = dashboard(&["A", "B"]);

        let response = record_sale(&dashboard, &store, "Grace", &[("B", 3), ("A", 3)]).await;

        assert_eq!(response.view.chart.labels, vec!["B", "A"]);
        assert_eq!(response.view.chart.data, vec![3, 3]);
    }

    #[tokio::test]
    async fn test_chart_keeps_top_five() {
        let names = ["I1", "I2", "I3", "I4", "I5", "I6", "I7"];
        let (dashboard, store) = dashboard(&names);

        let lines: Vec<(&str, u32)> = names
            .iter()
            .zip(1..)
            .map(|(name, qty)| (*name, qty))
            .collect();
        let response = record_sale(&dashboard, &store, "Grace", &lines).await;

        assert_eq!(response.line_count, 7);
        assert_eq!(response.view.chart.labels, vec!["I7", "I6", "I5", "I4", "I3"]);
        assert_eq!(response.view.chart.data, vec![7, 6, 5, 4, 3]);
    }

    #[tokio::test]
    async fn test_empty_submission_never_reaches_store() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
        dashboard
            .dispatch(Intent::SetBuyer {
                name: "Grace".to_string(),
            })
            .await
            .unwrap();

        let err = dashboard.dispatch(Intent::SubmitSale).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Please add at least one item to the sale");
        assert_eq!(store.calls().total(), 0);
        // The form stays open for correction.
        assert!(dashboard.dispatch(Intent::GetEntry).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejected_quantity_keeps_previous_value() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
        let row = RowId::from(0);

        let err = dashboard
            .dispatch(Intent::SetQuantity {
                row_id: row,
                value: "0".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let view = entry_of(dashboard.dispatch(Intent::GetEntry).await.unwrap());
        assert_eq!(view.rows[0].quantity.get(), 1);
    }

    #[tokio::test]
    async fn test_failed_lines_remove_header() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard
            .dispatch(Intent::OpenEntry {
                date: Some(DATE.to_string()),
            })
            .await
            .unwrap();
        fill(&dashboard, &store, "Grace", &[("Widget", 2)]).await;

        store.fail_next_create_lines();
        let err = dashboard.dispatch(Intent::SubmitSale).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::StoreError);
        assert_eq!(store.sale_count(), 0);
        assert_eq!(store.line_count(), 0);
        assert_eq!(dashboard.submit_phase(), SubmitPhase::Failed);

        // Retrying the still-open form succeeds.
        let reply = dashboard.dispatch(Intent::SubmitSale).await.unwrap();
        assert!(matches!(reply, Reply::Submitted(_)));
        assert_eq!(store.sale_count(), 1);
        assert_eq!(dashboard.submit_phase(), SubmitPhase::Committed);
    }

    #[tokio::test]
    async fn test_failed_compensation_reports_partial_write() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
        fill(&dashboard, &store, "Grace", &[("Widget", 2)]).await;

        store.fail_next_create_lines();
        store.fail_next_delete();
        let err = dashboard.dispatch(Intent::SubmitSale).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PartialWrite);
        assert_eq!(store.sale_count(), 1);
        assert_eq!(store.line_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_sale_from_views() {
        let (dashboard, store) = dashboard(&["Widget", "Gadget"]);
        let first = record_sale(&dashboard, &store, "Grace", &[("Widget", 2), ("Gadget", 4)]).await;
        record_sale(&dashboard, &store, "Alan", &[("Widget", 3)]).await;

        let reply = dashboard
            .dispatch(Intent::DeleteSale {
                sale_id: first.sale_id.clone(),
            })
            .await
            .unwrap();
        let Reply::Deleted(response) = reply else {
            panic!("expected deleted");
        };

        assert_eq!(response.outcome, DeleteOutcome::Deleted);
        assert_eq!(response.view.history.rows.len(), 1);
        assert_eq!(response.view.history.rows[0].buyer_name, "Alan");
        assert_eq!(response.view.chart.labels, vec!["Widget"]);
        assert_eq!(response.view.chart.data, vec![3]);
        assert_eq!(store.lines_of(&first.sale_id), 0);

        // Deleting again is not an error.
        let reply = dashboard
            .dispatch(Intent::DeleteSale {
                sale_id: first.sale_id,
            })
            .await
            .unwrap();
        let Reply::Deleted(response) = reply else {
            panic!("expected deleted");
        };
        assert_eq!(response.outcome, DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_delete_last_sale_empties_views() {
        let (dashboard, store) = dashboard(&["Widget"]);
        let sale = record_sale(&dashboard, &store, "Grace", &[("Widget", 1)]).await;

        let reply = dashboard
            .dispatch(Intent::DeleteSale {
                sale_id: sale.sale_id,
            })
            .await
            .unwrap();
        let Reply::Deleted(response) = reply else {
            panic!("expected deleted");
        };

        assert!(response.view.history.rows.is_empty());
        assert!(response.view.history.empty_message.is_some());
        assert!(response.view.chart.is_empty());
        assert_eq!(
            response.view.chart.empty_message.as_deref(),
            Some("No sales data available")
        );
    }

    #[tokio::test]
    async fn test_blank_sale_id_rejected() {
        let (dashboard, store) = dashboard(&["Widget"]);

        let err = dashboard
            .dispatch(Intent::DeleteSale {
                sale_id: "  ".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(store.calls().delete_sale, 0);
    }

    #[tokio::test]
    async fn test_second_submit_while_persisting_is_refused() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
        fill(&dashboard, &store, "Grace", &[("Widget", 2)]).await;

        let gate = store.hold_next_create_lines();
        let (first, second) = tokio::join!(dashboard.dispatch(Intent::SubmitSale), async {
            gate.entered().await;
            let second = dashboard.dispatch(Intent::SubmitSale).await;
            gate.release();
            second
        });

        assert!(matches!(first, Ok(Reply::Submitted(_))));
        assert_eq!(second.unwrap_err().code, ErrorCode::SubmitInProgress);
        assert_eq!(store.sale_count(), 1);
        assert_eq!(store.calls().create_sale, 1);
    }

    #[tokio::test]
    async fn test_form_reopened_during_submit_stays_open() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
        fill(&dashboard, &store, "Grace", &[("Widget", 2)]).await;

        let gate = store.hold_next_create_lines();
        let (submitted, ()) = tokio::join!(dashboard.dispatch(Intent::SubmitSale), async {
            gate.entered().await;
            dashboard.dispatch(Intent::CancelEntry).await.unwrap();
            dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
            dashboard
                .dispatch(Intent::SetBuyer {
                    name: "Alan".to_string(),
                })
                .await
                .unwrap();
            gate.release();
        });

        assert!(matches!(submitted, Ok(Reply::Submitted(_))));
        let view = entry_of(dashboard.dispatch(Intent::GetEntry).await.unwrap());
        assert_eq!(view.buyer_name, "Alan");
    }

    #[tokio::test]
    async fn test_form_edited_during_submit_stays_open() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
        fill(&dashboard, &store, "Grace", &[("Widget", 2)]).await;

        let gate = store.hold_next_create_lines();
        let (submitted, ()) = tokio::join!(dashboard.dispatch(Intent::SubmitSale), async {
            gate.entered().await;
            dashboard
                .dispatch(Intent::SetBuyer {
                    name: "Grace Hopper".to_string(),
                })
                .await
                .unwrap();
            gate.release();
        });

        assert!(matches!(submitted, Ok(Reply::Submitted(_))));
        assert_eq!(store.sale_count(), 1);
        let view = entry_of(dashboard.dispatch(Intent::GetEntry).await.unwrap());
        assert_eq!(view.buyer_name, "Grace Hopper");
    }

    #[tokio::test]
    async fn test_unknown_item_is_a_store_error() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
        let row = entry_of(dashboard.dispatch(Intent::GetEntry).await.unwrap()).rows[0].id;
        dashboard
            .dispatch(Intent::SelectItem {
                row_id: row,
                item_id: Some("ghost".to_string()),
            })
            .await
            .unwrap();
        dashboard
            .dispatch(Intent::SetBuyer {
                name: "Grace".to_string(),
            })
            .await
            .unwrap();

        let err = dashboard.dispatch(Intent::SubmitSale).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreError);
        assert!(!err.message.contains("ghost"));
        // Header, rejected lines, removal of the header.
        assert_eq!(store.calls().writes(), 3);
        assert_eq!(store.sale_count(), 0);
        assert!(dashboard.dispatch(Intent::GetEntry).await.is_ok());
    }

    #[tokio::test]
    async fn test_reload_failure_after_write_marks_stale() {
        let (dashboard, store) = dashboard(&["Widget"]);
        dashboard.dispatch(Intent::Reload).await.unwrap();
        dashboard.dispatch(Intent::OpenEntry { date: None }).await.unwrap();
        fill(&dashboard, &store, "Grace", &[("Widget", 2)]).await;

        store.fail_next_list_sales();
        let Reply::Submitted(response) = dashboard.dispatch(Intent::SubmitSale).await.unwrap() else {
            panic!("expected submitted");
        };

        assert!(response.stale);
        assert!(response.view.history.rows.is_empty());
        assert_eq!(store.sale_count(), 1);

        // The next reload catches up.
        let Reply::Dashboard(view) = dashboard.dispatch(Intent::Reload).await.unwrap() else {
            panic!("expected dashboard");
        };
        assert_eq!(view.history.rows.len(), 1);
    }
}

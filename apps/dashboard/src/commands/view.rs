//! # View Commands
//!
//! Reloading the cache and reading the history, chart and item catalog
//! from it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{AppState, ConfigState, DashboardSnapshot};
use crate::store::SalesStore;
use tally_core::view::{ChartData, HistoryView};
use tally_core::Item;

/// History and chart, the two panels refreshed after every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub history: HistoryView,
    pub chart: ChartData,
}

impl DashboardView {
    pub fn from_snapshot(snapshot: &DashboardSnapshot, config: &ConfigState) -> Self {
        DashboardView {
            history: snapshot.history(),
            chart: snapshot.chart(&config.chart_label, &config.empty_chart_message),
        }
    }
}

/// Loads items and sales and replaces the cached snapshot.
///
/// On failure the cache is left as it was. A result that arrives after a
/// newer reload was applied is dropped.
pub async fn reload(store: &dyn SalesStore, app: &AppState) -> Result<Arc<DashboardSnapshot>, ApiError> {
    let ticket = app.begin_reload();
    debug!(?ticket, "reload command");

    let (items, sales) = tokio::try_join!(store.list_items(), store.list_sales())?;
    let snapshot = DashboardSnapshot::new(items, sales);

    let (sales, ranked) = (snapshot.sales.len(), snapshot.top_items.len());
    if app.apply(ticket, snapshot) {
        info!(sales, ranked, "Dashboard reloaded");
    } else {
        debug!(?ticket, "Stale reload discarded");
    }

    Ok(app.snapshot())
}

pub fn get_history(app: &AppState) -> HistoryView {
    app.snapshot().history()
}

pub fn get_chart(app: &AppState, config: &ConfigState) -> ChartData {
    app.snapshot()
        .chart(&config.chart_label, &config.empty_chart_message)
}

pub fn get_items(app: &AppState) -> Vec<Item> {
    app.snapshot().items.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use tally_core::view::EMPTY_HISTORY_MESSAGE;
    use tally_core::{Quantity, SaleLine};

    #[tokio::test]
    async fn test_reload_fills_cache() {
        let store = MemoryStore::with_items(&["Widget", "Gadget"]);
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let id = store.create_sale("Grace", date).await.unwrap();
        store
            .create_sale_lines(
                &id,
                &[SaleLine::new(store.item_id("Gadget").unwrap(), Quantity::new(4).unwrap())],
            )
            .await
            .unwrap();

        let app = AppState::new();
        let config = ConfigState::default();
        reload(&store, &app).await.unwrap();

        assert_eq!(get_items(&app).len(), 2);
        assert_eq!(get_history(&app).rows[0].items, "Gadget (4)");
        assert_eq!(get_chart(&app, &config).data, vec![4]);
    }

    #[tokio::test]
    async fn test_empty_views() {
        let app = AppState::new();
        let config = ConfigState::default();
        reload(&MemoryStore::new(), &app).await.unwrap();

        let view = DashboardView::from_snapshot(&app.snapshot(), &config);
        assert_eq!(view.history.empty_message.as_deref(), Some(EMPTY_HISTORY_MESSAGE));
        assert_eq!(
            view.chart.empty_message.as_deref(),
            Some("No sales data available")
        );
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_cache() {
        let store = MemoryStore::with_items(&["Widget"]);
        let app = AppState::new();
        reload(&store, &app).await.unwrap();

        store.fail_next_list_sales();
        let err = reload(&store, &app).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::StoreError);
        assert_eq!(get_items(&app).len(), 1);
    }
}

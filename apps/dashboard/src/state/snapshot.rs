//! # Dashboard Snapshot
//!
//! The cached items, sale history and ranking the dashboard renders from.
//!
//! ## Reload Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  begin_reload() ─► ticket 7 ──── list_items + list_sales ───┐          │
//! │  begin_reload() ─► ticket 8 ── list ─┐                      │          │
//! │                                       ▼                      ▼          │
//! │                              apply(8) ✓ replaces    apply(7) ✗ stale   │
//! │                                                                         │
//! │  Readers clone the Arc and always see one whole snapshot.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tally_core::aggregate::rank_top_items;
use tally_core::view::{ChartData, HistoryView};
use tally_core::{Item, RankedTotal, SaleRecord};

/// Everything loaded by one reload, with the ranking derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub items: Vec<Item>,
    pub sales: Vec<SaleRecord>,
    pub top_items: Vec<RankedTotal>,
}

impl DashboardSnapshot {
    pub fn new(items: Vec<Item>, sales: Vec<SaleRecord>) -> Self {
        let top_items = rank_top_items(&sales);
        DashboardSnapshot {
            items,
            sales,
            top_items,
        }
    }

    pub fn history(&self) -> HistoryView {
        HistoryView::from_sales(&self.sales)
    }

    pub fn chart(&self, label: &str, empty_message: &str) -> ChartData {
        ChartData::from_ranked(&self.top_items, label, empty_message)
    }
}

/// Identifies one reload; later reloads carry larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

#[derive(Debug)]
struct Applied {
    ticket: u64,
    snapshot: Arc<DashboardSnapshot>,
}

/// Owner of the current snapshot.
#[derive(Debug)]
pub struct AppState {
    next_ticket: AtomicU64,
    current: RwLock<Applied>,
}

impl AppState {
    /// Starts with an empty snapshot, as before the first load.
    pub fn new() -> Self {
        AppState {
            next_ticket: AtomicU64::new(1),
            current: RwLock::new(Applied {
                ticket: 0,
                snapshot: Arc::new(DashboardSnapshot::default()),
            }),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        self.current
            .read()
            .expect("Snapshot lock poisoned")
            .snapshot
            .clone()
    }

    /// Takes a ticket for a reload about to start.
    pub fn begin_reload(&self) -> ReloadTicket {
        ReloadTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Replaces the snapshot unless a newer reload was applied already.
    ///
    /// Returns `false` when the result was stale and discarded.
    pub fn apply(&self, ticket: ReloadTicket, snapshot: DashboardSnapshot) -> bool {
        let mut current = self.current.write().expect("Snapshot lock poisoned");
        if ticket.0 <= current.ticket {
            return false;
        }
        current.ticket = ticket.0;
        current.snapshot = Arc::new(snapshot);
        true
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

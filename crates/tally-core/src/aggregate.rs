//! # Sales Aggregation
//!
//! Turns the sale history into per-item totals and the top-N ranking shown
//! in the dashboard chart.
//!
//! ## Ranking Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Top Items Pipeline                                   │
//! │                                                                         │
//! │  [SaleRecord] (history, input order)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Accumulate: total[item_name] += quantity                           │
//! │     (first time a name is seen fixes its position)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Stable sort by total, descending                                   │
//! │     Widget 3 │ Gadget 4  ──►  Gadget 4 │ Widget 3                      │
//! │     A 2 │ B 2            ──►  A 2 │ B 2   (tie keeps first-seen order) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Truncate to TOP_ITEMS_LIMIT (5)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [RankedTotal] (empty when there are no sales)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here borrows its input and allocates a fresh result, so
//! calling it twice on the same history yields the same ranking.

use std::collections::HashMap;

use crate::types::{RankedTotal, SaleRecord};
use crate::TOP_ITEMS_LIMIT;

/// Per-item totals in first-seen order (unsorted).
///
/// Items are keyed by name, matching what the chart displays.
pub fn item_totals(sales: &[SaleRecord]) -> Vec<RankedTotal> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<RankedTotal> = Vec::new();

    for sale in sales {
        for line in &sale.lines {
            let quantity = u64::from(line.quantity);
            match positions.get(line.item_name.as_str()) {
                Some(&idx) => totals[idx].total_quantity += quantity,
                None => {
                    positions.insert(line.item_name.as_str(), totals.len());
                    totals.push(RankedTotal::new(line.item_name.clone(), quantity));
                }
            }
        }
    }

    totals
}

/// The `limit` best-selling items, highest total first.
///
/// Equal totals keep the order in which their names first appeared in
/// `sales`. `Vec::sort_by` is stable, which is what guarantees this.
pub fn top_items(sales: &[SaleRecord], limit: usize) -> Vec<RankedTotal> {
    let mut totals = item_totals(sales);
    totals.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    totals.truncate(limit);
    totals
}

/// [`top_items`] with the chart's limit of [`TOP_ITEMS_LIMIT`].
pub fn rank_top_items(sales: &[SaleRecord]) -> Vec<RankedTotal> {
    top_items(sales, TOP_ITEMS_LIMIT)
}

// =============================================================================
// Unit Tests
// =============================================================================

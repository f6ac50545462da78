//! # Row Set Builder
//!
//! The dynamic list of "item + quantity" rows behind the sale entry form.
//!
//! ## Row Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Entry Form Rows                                      │
//! │                                                                         │
//! │  Frontend Action          Intent                  Row Set Change        │
//! │  ───────────────          ──────                  ──────────────        │
//! │                                                                         │
//! │  Click "Add item" ───────► AddRow ─────────────► push(row #n, qty 1)   │
//! │                                                                         │
//! │  Pick item ──────────────► SelectItem(#n, id) ──► rows[#n].item = id    │
//! │                                                                         │
//! │  Type quantity ──────────► SetQuantity(#n, q) ──► rows[#n].qty = q      │
//! │                                                                         │
//! │  Click "Remove" ─────────► RemoveRow(#n) ───────► retain(id != #n)      │
//! │                                                                         │
//! │  Submit ─────────────────► snapshot() ──────────► [SaleLine] (rows      │
//! │                                                   with an item only)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row ids come from a counter that only moves forward, so a stale "Remove"
//! click can never hit a row that was added later.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Quantity, SaleLine};

/// Identifier of a row within one editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct RowId(#[ts(type = "number")] u64);

impl RowId {
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RowId {
    fn from(value: u64) -> Self {
        RowId(value)
    }
}

/// One candidate line in the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Row {
    pub id: RowId,
    /// Selected item, `None` until the user picks one.
    pub item_id: Option<String>,
    pub quantity: Quantity,
}

impl Row {
    fn selected_item(&self) -> Option<&str> {
        self.item_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Ordered, mutable collection of rows for a sale that has not been submitted.
///
/// ## Invariants
/// - Row ids are unique and strictly increasing in insertion order
/// - Every row's quantity is ≥ 1 (guaranteed by [`Quantity`])
/// - Selecting the same item in two rows is allowed; they stay two lines
#[derive(Debug, Clone, Default)]
pub struct RowSetBuilder {
    rows: Vec<Row>,
    next_id: u64,
}

impl RowSetBuilder {
    /// Creates an empty row set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row set holding one empty row, the state of a freshly
    /// opened entry form.
    pub fn with_initial_row() -> Self {
        let mut rows = Self::new();
        rows.add_row();
        rows
    }

    /// Appends a row with no item and quantity 1.
    pub fn add_row(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push(Row {
            id,
            item_id: None,
            quantity: Quantity::ONE,
        });
        id
    }

    /// Removes a row. Returns `false` if no row has this id.
    pub fn remove_row(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        self.rows.len() != before
    }

    /// Sets or clears the item of a row. Returns `false` for an unknown id.
    pub fn select_item(&mut self, id: RowId, item_id: Option<String>) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.item_id = item_id;
                true
            }
            None => false,
        }
    }

    /// Sets the quantity of a row. Returns `false` for an unknown id.
    pub fn set_quantity(&mut self, id: RowId, quantity: Quantity) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Lines for every row that has an item, in insertion order.
    ///
    /// Rows without an item are abandoned rows, not errors, and are skipped.
    pub fn snapshot(&self) -> Vec<SaleLine> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.selected_item()
                    .map(|item_id| SaleLine::new(item_id, row.quantity))
            })
            .collect()
    }

    /// All rows, including ones without an item.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

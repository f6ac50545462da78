//! # Entry Commands
//!
//! Editing the sale entry form.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Frontend Action          Command                 Entry Change          │
//! │  ───────────────          ───────                 ────────────          │
//! │  "New sale" ────────────► open_entry ───────────► fresh session        │
//! │  "Add item" ────────────► add_row ──────────────► rows + 1             │
//! │  "Remove" ──────────────► remove_row ───────────► rows - 1 (or no-op)  │
//! │  Item dropdown ─────────► select_item ──────────► row.item             │
//! │  Quantity input ────────► set_quantity ─────────► row.quantity (≥ 1)   │
//! │  Buyer / date inputs ───► set_buyer / set_date ─► header fields        │
//! │  "Cancel" ──────────────► cancel_entry ─────────► session dropped      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every edit returns the whole form so the frontend can re-render it.

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{EntrySession, EntryState, EntryView};
use tally_core::rows::RowId;
use tally_core::validation::parse_sale_date;
use tally_core::Quantity;

/// Opens a fresh entry form dated `date`, or today when absent.
pub fn open_entry(entry: &EntryState, date: Option<&str>) -> Result<EntryView, ApiError> {
    let sale_date = match date {
        Some(raw) => parse_sale_date(raw)?,
        None => today(),
    };
    debug!(date = %sale_date, "open_entry command");
    Ok(entry.open(sale_date))
}

/// Discards the open form. Cancelling a closed form is a no-op.
pub fn cancel_entry(entry: &EntryState) {
    let was_open = entry.close();
    debug!(was_open, "cancel_entry command");
}

pub fn get_entry(entry: &EntryState) -> Result<EntryView, ApiError> {
    entry
        .with_session(|s| EntryView::from(s))
        .ok_or_else(ApiError::entry_closed)
}

pub fn add_row(entry: &EntryState) -> Result<EntryView, ApiError> {
    edit(entry, |s| {
        let id = s.rows.add_row();
        debug!(row_id = id.get(), "add_row command");
    })
}

/// Removes a row. Unknown row IDs are ignored.
pub fn remove_row(entry: &EntryState, row_id: RowId) -> Result<EntryView, ApiError> {
    edit(entry, |s| {
        let removed = s.rows.remove_row(row_id);
        debug!(row_id = row_id.get(), removed, "remove_row command");
    })
}

pub fn select_item(
    entry: &EntryState,
    row_id: RowId,
    item_id: Option<String>,
) -> Result<EntryView, ApiError> {
    edit(entry, |s| {
        let found = s.rows.select_item(row_id, item_id);
        debug!(row_id = row_id.get(), found, "select_item command");
    })
}

/// Sets a row's quantity from raw input. Invalid input leaves the row as it was.
pub fn set_quantity(entry: &EntryState, row_id: RowId, value: &str) -> Result<EntryView, ApiError> {
    let quantity = Quantity::parse(value)?;
    edit(entry, |s| {
        let found = s.rows.set_quantity(row_id, quantity);
        debug!(row_id = row_id.get(), quantity = quantity.get(), found, "set_quantity command");
    })
}

/// Stores the buyer name as typed; it is validated on submit.
pub fn set_buyer(entry: &EntryState, name: String) -> Result<EntryView, ApiError> {
    edit(entry, |s| s.buyer_name = name)
}

pub fn set_date(entry: &EntryState, date: &str) -> Result<EntryView, ApiError> {
    let sale_date = parse_sale_date(date)?;
    edit(entry, |s| s.sale_date = sale_date)
}

fn edit<F>(entry: &EntryState, f: F) -> Result<EntryView, ApiError>
where
    F: FnOnce(&mut EntrySession),
{
    entry
        .with_session_mut(|s| {
            f(s);
            EntryView::from(&*s)
        })
        .ok_or_else(ApiError::entry_closed)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

//! # Commands Module
//!
//! Everything the frontend can ask of the dashboard, as one [`Intent`] enum,
//! and the command functions that carry them out.
//!
//! ## Wire Format
//! One JSON object per intent, tagged by `type`:
//! ```json
//! {"type":"openEntry"}
//! {"type":"selectItem","rowId":0,"itemId":"3f0c..."}
//! {"type":"setQuantity","rowId":0,"value":"4"}
//! {"type":"setBuyer","name":"Grace"}
//! {"type":"submitSale"}
//! {"type":"deleteSale","saleId":"9b1d..."}
//! ```
//!
//! ## Modules
//! - [`entry`] - entry form editing
//! - [`sale`] - submit and delete
//! - [`view`] - reload, history, chart, items

pub mod entry;
pub mod sale;
pub mod view;

use serde::{Deserialize, Serialize};
use tally_core::rows::RowId;
use tally_core::view::{ChartData, HistoryView};
use tally_core::Item;

use crate::state::EntryView;
use sale::{DeleteResponse, SubmitResponse};
use view::DashboardView;

/// A request from the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    /// Opens a fresh entry form. `date` is `YYYY-MM-DD`, today when absent.
    OpenEntry {
        #[serde(default)]
        date: Option<String>,
    },
    CancelEntry,
    GetEntry,
    AddRow,
    RemoveRow {
        row_id: RowId,
    },
    SelectItem {
        row_id: RowId,
        #[serde(default)]
        item_id: Option<String>,
    },
    /// `value` is the raw text of the quantity input.
    SetQuantity {
        row_id: RowId,
        value: String,
    },
    SetBuyer {
        name: String,
    },
    SetDate {
        date: String,
    },
    SubmitSale,
    DeleteSale {
        sale_id: String,
    },
    Reload,
    GetHistory,
    GetChart,
    GetItems,
}

impl Intent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::OpenEntry { .. } => "openEntry",
            Intent::CancelEntry => "cancelEntry",
            Intent::GetEntry => "getEntry",
            Intent::AddRow => "addRow",
            Intent::RemoveRow { .. } => "removeRow",
            Intent::SelectItem { .. } => "selectItem",
            Intent::SetQuantity { .. } => "setQuantity",
            Intent::SetBuyer { .. } => "setBuyer",
            Intent::SetDate { .. } => "setDate",
            Intent::SubmitSale => "submitSale",
            Intent::DeleteSale { .. } => "deleteSale",
            Intent::Reload => "reload",
            Intent::GetHistory => "getHistory",
            Intent::GetChart => "getChart",
            Intent::GetItems => "getItems",
        }
    }
}

/// The successful answer to an [`Intent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Entry(EntryView),
    Submitted(SubmitResponse),
    Deleted(DeleteResponse),
    Dashboard(DashboardView),
    History(HistoryView),
    Chart(ChartData),
    Items(Vec<Item>),
    /// Nothing to report (e.g. after cancel).
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_wire_format() {
        let intent: Intent =
            serde_json::from_str(r#"{"type":"setQuantity","rowId":2,"value":"4"}"#).unwrap();
        assert_eq!(
            intent,
            Intent::SetQuantity {
                row_id: RowId::from(2),
                value: "4".to_string()
            }
        );

        let intent: Intent = serde_json::from_str(r#"{"type":"openEntry"}"#).unwrap();
        assert_eq!(intent, Intent::OpenEntry { date: None });

        let intent: Intent =
            serde_json::from_str(r#"{"type":"deleteSale","saleId":"abc"}"#).unwrap();
        assert_eq!(intent.name(), "deleteSale");
    }

    #[test]
    fn test_unknown_intent_rejected() {
        assert!(serde_json::from_str::<Intent>(r#"{"type":"dropTables"}"#).is_err());
        assert!(serde_json::from_str::<Intent>(r#"{"type":"removeRow"}"#).is_err());
    }

    #[test]
    fn test_done_serializes_as_null() {
        assert_eq!(serde_json::to_value(Reply::Done).unwrap(), serde_json::Value::Null);
    }
}

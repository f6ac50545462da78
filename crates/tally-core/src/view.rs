//! # Dashboard Views
//!
//! Display-ready shapes derived from the sale history: the history table and
//! the top items bar chart. Both carry an explicit empty state so the
//! frontend never has to guess what an empty list means.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{RankedTotal, SaleRecord};

/// Shown in place of the history table when nothing has been sold.
pub const EMPTY_HISTORY_MESSAGE: &str = "No sales recorded yet";

/// Default chart title when the ranking is empty.
pub const DEFAULT_EMPTY_CHART_MESSAGE: &str = "No sales data available";

/// Default dataset label of the bar chart.
pub const DEFAULT_CHART_LABEL: &str = "Items Sold";

/// Formats a sale date the way the history table shows it: `Jan 5, 2026`.
pub fn format_sale_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

// =============================================================================
// History
// =============================================================================

/// One row of the history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HistoryRow {
    /// Target of the row's delete button.
    pub sale_id: String,
    pub date: String,
    pub buyer_name: String,
    /// `Widget (2), Gadget (4)`
    pub items: String,
}

impl From<&SaleRecord> for HistoryRow {
    fn from(sale: &SaleRecord) -> Self {
        let items = sale
            .lines
            .iter()
            .map(|line| format!("{} ({})", line.item_name, line.quantity))
            .collect::<Vec<_>>()
            .join(", ");

        HistoryRow {
            sale_id: sale.id.clone(),
            date: format_sale_date(sale.sale_date),
            buyer_name: sale.buyer_name.clone(),
            items,
        }
    }
}

/// The history table, rows in the order the store listed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HistoryView {
    pub rows: Vec<HistoryRow>,
    /// Set only when `rows` is empty.
    pub empty_message: Option<String>,
}

impl HistoryView {
    pub fn from_sales(sales: &[SaleRecord]) -> Self {
        let rows: Vec<HistoryRow> = sales.iter().map(HistoryRow::from).collect();
        let empty_message = rows
            .is_empty()
            .then(|| EMPTY_HISTORY_MESSAGE.to_string());
        HistoryView {
            rows,
            empty_message,
        }
    }
}

// =============================================================================
// Chart
// =============================================================================

/// Bar chart of the top-selling items.
///
/// ```text
///  Items Sold
///  4 │ ██
///  3 │ ██ ██
///  2 │ ██ ██
///  1 │ ██ ██
///    └──────────
///     Gadget Widget
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChartData {
    pub label: String,
    pub labels: Vec<String>,
    #[ts(type = "Array<number>")]
    pub data: Vec<u64>,
    /// Set only when there is nothing to chart; the frontend shows it as
    /// the chart title instead of drawing empty axes.
    pub empty_message: Option<String>,
}

impl ChartData {
    pub fn from_ranked(
        ranked: &[RankedTotal],
        label: impl Into<String>,
        empty_message: impl Into<String>,
    ) -> Self {
        let labels = ranked.iter().map(|r| r.item_name.clone()).collect();
        let data = ranked.iter().map(|r| r.total_quantity).collect();
        let empty_message = ranked.is_empty().then(|| empty_message.into());

        ChartData {
            label: label.into(),
            labels,
            data,
            empty_message,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SoldLine;
    use chrono::Utc;

    fn record() -> SaleRecord {
        SaleRecord {
            id: "sale-1".to_string(),
            buyer_name: "Grace".to_string(),
            sale_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            created_at: Utc::now(),
            lines: vec![
                SoldLine {
                    item_id: "w".to_string(),
                    item_name: "Widget".to_string(),
                    quantity: 2,
                },
                SoldLine {
                    item_id: "g".to_string(),
                    item_name: "Gadget".to_string(),
                    quantity: 4,
                },
            ],
        }
    }

    #[test]
    fn test_format_sale_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_sale_date(date), "Jan 5, 2026");

        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(format_sale_date(date), "Dec 31, 2025");
    }

    #[test]
    fn test_history_row_summary() {
        let row = HistoryRow::from(&record());
        assert_eq!(row.sale_id, "sale-1");
        assert_eq!(row.date, "Jan 5, 2026");
        assert_eq!(row.buyer_name, "Grace");
        assert_eq!(row.items, "Widget (2), Gadget (4)");
    }

    #[test]
    fn test_history_empty_state() {
        let view = HistoryView::from_sales(&[]);
        assert!(view.rows.is_empty());
        assert_eq!(view.empty_message.as_deref(), Some(EMPTY_HISTORY_MESSAGE));

        let view = HistoryView::from_sales(&[record()]);
        assert_eq!(view.rows.len(), 1);
        assert!(view.empty_message.is_none());
    }

    #[test]
    fn test_chart_from_ranked() {
        let ranked = vec![RankedTotal::new("Gadget", 4), RankedTotal::new("Widget", 3)];
        let chart = ChartData::from_ranked(&ranked, DEFAULT_CHART_LABEL, DEFAULT_EMPTY_CHART_MESSAGE);

        assert_eq!(chart.label, "Items Sold");
        assert_eq!(chart.labels, vec!["Gadget", "Widget"]);
        assert_eq!(chart.data, vec![4, 3]);
        assert!(chart.empty_message.is_none());
        assert!(!chart.is_empty());
    }

    #[test]
    fn test_chart_empty_state() {
        let chart = ChartData::from_ranked(&[], DEFAULT_CHART_LABEL, DEFAULT_EMPTY_CHART_MESSAGE);
        assert!(chart.is_empty());
        assert_eq!(
            chart.empty_message.as_deref(),
            Some("No sales data available")
        );
    }
}

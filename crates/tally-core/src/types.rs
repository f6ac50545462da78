//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  WRITE SIDE (entry form → store)     READ SIDE (store → dashboard)      │
//! │  ┌─────────────────┐                 ┌─────────────────┐                │
//! │  │   SaleDraft     │                 │   SaleRecord    │                │
//! │  │  buyer_name     │                 │  id (UUID)      │                │
//! │  │  sale_date      │                 │  buyer_name     │                │
//! │  │  lines ─────┐   │                 │  sale_date      │                │
//! │  └─────────────┼───┘                 │  lines ─────┐   │                │
//! │                ▼                     └─────────────┼───┘                │
//! │  ┌─────────────────┐                 ┌─────────────▼───┐                │
//! │  │    SaleLine     │                 │    SoldLine     │                │
//! │  │  item_id        │                 │  item_id        │                │
//! │  │  quantity (≥1)  │                 │  item_name      │                │
//! │  └─────────────────┘                 │  quantity       │                │
//! │                                      └─────────────────┘                │
//! │                                                                         │
//! │  ┌─────────────────┐                 ┌─────────────────┐                │
//! │  │      Item       │                 │  RankedTotal    │  derived,      │
//! │  │  id, name       │                 │  item_name      │  never stored  │
//! │  └─────────────────┘                 │  total_quantity │                │
//! │                                      └─────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Quantity
// =============================================================================

/// A line quantity: a whole number of at least 1.
///
/// The only constructors validate, so a row can never hold zero or a
/// non-numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "u32", into = "u32")]
#[ts(export)]
pub struct Quantity(u32);

impl Quantity {
    /// Quantity of a freshly added row.
    pub const ONE: Quantity = Quantity(1);

    /// Creates a quantity, rejecting zero.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
        Ok(Quantity(value))
    }

    /// Parses raw form input (e.g. `" 4 "`).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::Quantity;
    ///
    /// assert_eq!(Quantity::parse("4").unwrap().get(), 4);
    /// assert!(Quantity::parse("0").is_err());
    /// assert!(Quantity::parse("four").is_err());
    /// assert!(Quantity::parse("-2").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ValidationError::required("quantity"));
        }

        if input.starts_with('-') {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }

        let value: u32 = input
            .parse()
            .map_err(|_| ValidationError::invalid_format("quantity", "must be a whole number"))?;

        Quantity::new(value)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A sellable item. Reference data; the core never creates or edits items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Sale Line (write side)
// =============================================================================

/// One `(item, quantity)` pair of a sale being submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLine {
    pub item_id: String,
    pub quantity: Quantity,
}

impl SaleLine {
    pub fn new(item_id: impl Into<String>, quantity: Quantity) -> Self {
        SaleLine {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// A validated sale ready to be persisted: header fields plus a non-empty
/// line set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDraft {
    pub buyer_name: String,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    pub lines: Vec<SaleLine>,
}

// =============================================================================
// Sale Record (read side)
// =============================================================================

/// A committed line, resolved to the item's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SoldLine {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
}

/// A committed sale with its lines, as listed in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRecord {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub buyer_name: String,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    /// When the header was written; breaks ties between sales on the same date.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub lines: Vec<SoldLine>,
}

impl SaleRecord {
    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

// =============================================================================
// Ranked Total
// =============================================================================

/// Total units sold for one item name. Derived on every aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RankedTotal {
    pub item_name: String,
    #[ts(type = "number")]
    pub total_quantity: u64,
}

impl RankedTotal {
    pub fn new(item_name: impl Into<String>, total_quantity: u64) -> Self {
        RankedTotal {
            item_name: item_name.into(),
            total_quantity,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

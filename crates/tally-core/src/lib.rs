//! # tally-core: Pure Business Logic for Tally
//!
//! This crate holds everything about recording and ranking sales that can be
//! expressed without touching a database or a network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (web dashboard)                     │   │
//! │  │    Entry form ──► History table ──► Top items chart             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON intents                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                tally-dashboard (submit, delete, state)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   rows    │  │ aggregate │  │ validation│  │   │
//! │  │   │   Item    │  │  RowSet   │  │  top-N    │  │   rules   │  │   │
//! │  │   │   Sale    │  │  Builder  │  │  ranking  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, SaleLine, SaleRecord, RankedTotal)
//! - [`rows`] - The in-progress row set of the sale entry form
//! - [`aggregate`] - Per-item totals and the top-N ranking
//! - [`view`] - History rows and chart data derived for display
//! - [`validation`] - Input validation at the form boundary
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::rows::RowSetBuilder;
//! use tally_core::Quantity;
//!
//! let mut rows = RowSetBuilder::new();
//! let first = rows.add_row();
//! let second = rows.add_row();
//!
//! rows.select_item(first, Some("widget".to_string()));
//! rows.set_quantity(first, Quantity::parse("3").unwrap());
//!
//! // The second row never got an item, so it is dropped.
//! let lines = rows.snapshot();
//! assert_eq!(lines.len(), 1);
//! assert_eq!(lines[0].quantity.get(), 3);
//! assert!(rows.remove_row(second));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod rows;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of entries shown in the top-selling items chart.
pub const TOP_ITEMS_LIMIT: usize = 5;

/// Maximum length of a buyer name, in characters.
pub const MAX_BUYER_NAME_LEN: usize = 200;

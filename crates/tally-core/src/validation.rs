//! # Validation Module
//!
//! Input validation for the sale entry form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  ├── required / min="1" attributes                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Intent boundary (Rust)                                       │
//! │  ├── Quantity::parse rejects non-numeric and < 1                       │
//! │  └── THIS MODULE: buyer, date, line set                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 1)                                             │
//! │  └── Foreign key sale_lines.item_id → items.id                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_buyer_name, validate_draft};
//! use tally_core::{Quantity, SaleLine};
//! use chrono::NaiveDate;
//!
//! assert_eq!(validate_buyer_name("  Ada  ").unwrap(), "Ada");
//!
//! let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
//! let lines = vec![SaleLine::new("widget", Quantity::ONE)];
//! let draft = validate_draft("Ada", date, lines).unwrap();
//! assert_eq!(draft.lines.len(), 1);
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{SaleDraft, SaleLine};
use crate::MAX_BUYER_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Date format used on the wire and in the date input (`2026-01-05`).
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Validates a buyer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_BUYER_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_buyer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("buyer name"));
    }

    if name.chars().count() > MAX_BUYER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "buyer name".to_string(),
            max: MAX_BUYER_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Parses a sale date from the date input (`YYYY-MM-DD`).
pub fn parse_sale_date(input: &str) -> ValidationResult<NaiveDate> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::required("date"));
    }

    NaiveDate::parse_from_str(input, DATE_INPUT_FORMAT)
        .map_err(|_| ValidationError::invalid_format("date", "expected YYYY-MM-DD"))
}

/// Validates that a sale has at least one line.
pub fn validate_lines(lines: &[SaleLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::NoLines);
    }
    Ok(())
}

/// Validates a sale identifier (UUID).
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_sale_id;
///
/// assert!(validate_sale_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_sale_id("not-a-uuid").is_err());
/// ```
pub fn validate_sale_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("sale id"));
    }

    uuid::Uuid::parse_str(id)
        .map_err(|_| ValidationError::invalid_format("sale id", "must be a valid UUID"))?;

    Ok(())
}

/// Runs every check a sale needs before it may reach the store.
///
/// Lines are checked first: an empty row set is the most common reason a
/// submission is refused.
pub fn validate_draft(
    buyer_name: &str,
    sale_date: NaiveDate,
    lines: Vec<SaleLine>,
) -> ValidationResult<SaleDraft> {
    validate_lines(&lines)?;
    let buyer_name = validate_buyer_name(buyer_name)?;

    Ok(SaleDraft {
        buyer_name,
        sale_date,
        lines,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

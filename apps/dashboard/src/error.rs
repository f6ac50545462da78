//! # API Error Type
//!
//! Unified error type for dashboard commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally                                  │
//! │                                                                         │
//! │  {"type":"submitSale"}                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function  → Result<T, ApiError>                         │  │
//! │  │                                                                  │  │
//! │  │  ValidationError ───────────────► VALIDATION_ERROR               │  │
//! │  │  SubmitError::InProgress ───────► SUBMIT_IN_PROGRESS             │  │
//! │  │  StoreError ────────────────────► STORE_ERROR (retry-able)       │  │
//! │  │  StoreError::NotFound ──────────► NOT_FOUND                      │  │
//! │  │  SubmitError::PartialWrite ─────► PARTIAL_WRITE                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  {"error":{"code":"STORE_ERROR","message":"..."}}                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tally_core::ValidationError;

use crate::store::StoreError;
use crate::submit::SubmitError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Please add at least one item to the sale"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed; nothing was sent to the store
    ValidationError,

    /// Store read or write failed; safe to retry
    StoreError,

    /// Sale header stored without lines and not cleaned up
    PartialWrite,

    /// A submission is already running
    SubmitInProgress,

    /// Row or form edit without an open entry form
    EntryClosed,

    /// The request line could not be understood
    MalformedRequest,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an entry-closed error.
    pub fn entry_closed() -> Self {
        ApiError::new(ErrorCode::EntryClosed, "No sale entry is open")
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts store errors to API errors.
///
/// Failure details are logged, the frontend gets a message it can show.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            StoreError::Rejected(reason) => {
                tracing::warn!("Store rejected data: {}", reason);
                ApiError::new(
                    ErrorCode::StoreError,
                    "The sales store refused the sale, reload and try again",
                )
            }
            StoreError::Unavailable(e) => {
                tracing::error!("Store unavailable: {}", e);
                ApiError::new(
                    ErrorCode::StoreError,
                    "The sales store is unavailable, please try again",
                )
            }
            StoreError::Failed(e) => {
                tracing::error!("Store operation failed: {}", e);
                ApiError::new(
                    ErrorCode::StoreError,
                    "The sales store could not complete the request, please try again",
                )
            }
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(e) => e.into(),
            SubmitError::InProgress => {
                ApiError::new(ErrorCode::SubmitInProgress, "A sale is already being submitted")
            }
            SubmitError::Store(e) => e.into(),
            SubmitError::PartialWrite { sale_id, .. } => ApiError::new(
                ErrorCode::PartialWrite,
                format!(
                    "Sale {} was saved without its items and could not be removed; \
                     delete it from the history before entering it again",
                    sale_id
                ),
            ),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

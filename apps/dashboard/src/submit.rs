//! # Sale Submission
//!
//! Validates a sale and writes it as two store calls: the header, then the
//! lines. A failed line write is compensated by deleting the header again,
//! so a sale without lines is never left behind silently.
//!
//! ## Submission State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──► Validating ──┬──► (invalid) ──────────────────► Failed      │
//! │                         │                                               │
//! │                         └──► Persisting                                 │
//! │                                 │                                       │
//! │                    create_sale ─┼── err ─────────────────► Failed      │
//! │                                 │                                       │
//! │              create_sale_lines ─┼── ok ──────────────────► Committed   │
//! │                                 │                                       │
//! │                                 └── err ──► delete_sale                 │
//! │                                               ├── ok ────► Failed      │
//! │                                               │   (line error)          │
//! │                                               └── err ───► Failed      │
//! │                                                   (PartialWrite)        │
//! │                                                                         │
//! │   A submit while Validating/Persisting ──► SubmitError::InProgress     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried automatically.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::store::{SalesStore, StoreError};
use tally_core::validation::validate_draft;
use tally_core::{SaleLine, ValidationError};

/// Observable phase of the most recent submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitPhase {
    Idle,
    Validating,
    Persisting,
    Committed,
    Failed,
}

/// Why a submission did not commit.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The input was refused before any store call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another submission is still running.
    #[error("A sale is already being submitted")]
    InProgress,

    /// A store call failed; nothing of the sale remains stored.
    #[error("Could not save the sale: {0}")]
    Store(#[from] StoreError),

    /// The header was written, the lines were not, and removing the header
    /// failed too. Needs manual reconciliation.
    #[error(
        "Sale {sale_id} was stored without its lines (line write: {line_error}; \
         cleanup: {compensation_error})"
    )]
    PartialWrite {
        sale_id: String,
        line_error: StoreError,
        compensation_error: StoreError,
    },
}

/// A committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub sale_id: String,
    pub line_count: usize,
}

/// Drives the validate-then-persist protocol for one sale at a time.
pub struct SaleSubmitter {
    store: Arc<dyn SalesStore>,
    in_flight: tokio::sync::Mutex<()>,
    phase: Mutex<SubmitPhase>,
}

impl SaleSubmitter {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        SaleSubmitter {
            store,
            in_flight: tokio::sync::Mutex::new(()),
            phase: Mutex::new(SubmitPhase::Idle),
        }
    }

    /// Phase of the current or last submission.
    pub fn phase(&self) -> SubmitPhase {
        *self.phase.lock().expect("Submit phase mutex poisoned")
    }

    /// Submits a sale.
    ///
    /// ## Errors
    /// - [`SubmitError::InProgress`] when another submission holds the guard
    /// - [`SubmitError::Validation`] for bad input, with zero store calls
    /// - [`SubmitError::Store`] when the header write fails, or the line
    ///   write fails and the header was removed again
    /// - [`SubmitError::PartialWrite`] when the header could not be removed
    pub async fn submit(
        &self,
        buyer_name: &str,
        sale_date: NaiveDate,
        lines: Vec<SaleLine>,
    ) -> Result<SubmitReceipt, SubmitError> {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            debug!("Submission rejected, another one is in flight");
            SubmitError::InProgress
        })?;

        self.set_phase(SubmitPhase::Validating);
        let draft = match validate_draft(buyer_name, sale_date, lines) {
            Ok(draft) => draft,
            Err(e) => {
                debug!(error = %e, "Sale failed validation");
                self.set_phase(SubmitPhase::Failed);
                return Err(e.into());
            }
        };

        self.set_phase(SubmitPhase::Persisting);
        let result = self.persist(&draft.buyer_name, draft.sale_date, &draft.lines).await;

        self.set_phase(match result {
            Ok(_) => SubmitPhase::Committed,
            Err(_) => SubmitPhase::Failed,
        });
        result
    }

    async fn persist(
        &self,
        buyer_name: &str,
        sale_date: NaiveDate,
        lines: &[SaleLine],
    ) -> Result<SubmitReceipt, SubmitError> {
        debug!(buyer = %buyer_name, date = %sale_date, lines = lines.len(), "Persisting sale");

        let sale_id = self.store.create_sale(buyer_name, sale_date).await?;

        let line_error = match self.store.create_sale_lines(&sale_id, lines).await {
            Ok(()) => {
                info!(sale_id = %sale_id, lines = lines.len(), "Sale committed");
                return Ok(SubmitReceipt {
                    sale_id,
                    line_count: lines.len(),
                });
            }
            Err(e) => e,
        };

        warn!(sale_id = %sale_id, error = %line_error, "Line write failed, removing sale header");

        match self.store.delete_sale(&sale_id).await {
            Ok(()) => {
                info!(sale_id = %sale_id, "Sale header removed after failed line write");
                Err(SubmitError::Store(line_error))
            }
            // Already gone: nothing was left behind.
            Err(e) if e.is_not_found() => {
                warn!(sale_id = %sale_id, "Sale header vanished before cleanup");
                Err(SubmitError::Store(line_error))
            }
            Err(compensation_error) => {
                error!(
                    sale_id = %sale_id,
                    line_error = %line_error,
                    compensation_error = %compensation_error,
                    "Sale header left without lines, manual reconciliation required"
                );
                Err(SubmitError::PartialWrite {
                    sale_id,
                    line_error,
                    compensation_error,
                })
            }
        }
    }

    fn set_phase(&self, phase: SubmitPhase) {
        *self.phase.lock().expect("Submit phase mutex poisoned") = phase;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

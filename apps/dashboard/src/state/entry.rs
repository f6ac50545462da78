//! # Entry State
//!
//! The sale entry form: buyer, date and the row set, from "open" until the
//! sale is committed or the form is cancelled.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   (closed) ──OpenEntry──► open: buyer "", date today, one empty row    │
//! │                              │                                          │
//! │                              ├── AddRow / SelectItem / SetQuantity ...  │
//! │                              │                                          │
//! │                              ├── CancelEntry ──────────► (closed)      │
//! │                              │                                          │
//! │                              └── SubmitSale ── ok ─────► (closed)      │
//! │                                            └── err ────► stays open    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A submission copies the form out together with its [`SessionStamp`]. On
//! commit only that exact form is closed: a form reopened or edited while
//! the sale was being written is left alone.
//!
//! ## Thread Safety
//! The session lives behind `Arc<Mutex<_>>`; the lock is never held across
//! a store call.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::rows::{Row, RowSetBuilder};
use tally_core::validation::DATE_INPUT_FORMAT;
use tally_core::SaleLine;

/// Identifies one state of one form: which session, and how many edits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStamp {
    pub session: u64,
    pub revision: u64,
}

/// One open entry form.
#[derive(Debug, Clone)]
pub struct EntrySession {
    id: u64,
    revision: u64,
    pub buyer_name: String,
    pub sale_date: NaiveDate,
    pub rows: RowSetBuilder,
}

/// The form as copied out for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub stamp: SessionStamp,
    pub buyer_name: String,
    pub sale_date: NaiveDate,
    pub lines: Vec<SaleLine>,
}

impl EntrySession {
    /// A fresh form: no buyer, the given date, one empty row.
    fn new(id: u64, sale_date: NaiveDate) -> Self {
        EntrySession {
            id,
            revision: 0,
            buyer_name: String::new(),
            sale_date,
            rows: RowSetBuilder::with_initial_row(),
        }
    }

    pub fn stamp(&self) -> SessionStamp {
        SessionStamp {
            session: self.id,
            revision: self.revision,
        }
    }

    /// What the submitter needs, copied out so the lock can be released.
    pub fn draft(&self) -> EntryDraft {
        EntryDraft {
            stamp: self.stamp(),
            buyer_name: self.buyer_name.clone(),
            sale_date: self.sale_date,
            lines: self.rows.snapshot(),
        }
    }
}

/// The entry form as the frontend renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub buyer_name: String,
    /// `YYYY-MM-DD`, the date input's format.
    pub sale_date: String,
    pub rows: Vec<Row>,
}

impl From<&EntrySession> for EntryView {
    fn from(session: &EntrySession) -> Self {
        EntryView {
            buyer_name: session.buyer_name.clone(),
            sale_date: session.sale_date.format(DATE_INPUT_FORMAT).to_string(),
            rows: session.rows.rows().to_vec(),
        }
    }
}

#[derive(Debug, Default)]
struct EntrySlot {
    opened: u64,
    session: Option<EntrySession>,
}

/// Holder of the (optional) open entry session.
#[derive(Debug, Clone, Default)]
pub struct EntryState {
    slot: Arc<Mutex<EntrySlot>>,
}

impl EntryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh session, discarding any open one.
    pub fn open(&self, sale_date: NaiveDate) -> EntryView {
        let mut slot = self.lock();
        slot.opened += 1;
        let session = EntrySession::new(slot.opened, sale_date);
        let view = EntryView::from(&session);
        slot.session = Some(session);
        view
    }

    /// Closes the session. Returns `false` if none was open.
    pub fn close(&self) -> bool {
        self.lock().session.take().is_some()
    }

    /// Closes the session only if it is still exactly the form `stamp` was
    /// taken from. Returns whether it was closed.
    pub fn close_if(&self, stamp: SessionStamp) -> bool {
        let mut slot = self.lock();
        let unchanged = slot.session.as_ref().map(EntrySession::stamp) == Some(stamp);
        if unchanged {
            slot.session = None;
        }
        unchanged
    }

    pub fn is_open(&self) -> bool {
        self.lock().session.is_some()
    }

    /// Executes a function with read access to the open session.
    ///
    /// Returns `None` when no session is open.
    pub fn with_session<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&EntrySession) -> R,
    {
        self.lock().session.as_ref().map(f)
    }

    /// Executes a function with write access to the open session.
    ///
    /// Counts as an edit: the session's revision moves on.
    pub fn with_session_mut<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut EntrySession) -> R,
    {
        self.lock().session.as_mut().map(|session| {
            session.revision += 1;
            f(session)
        })
    }

    fn lock(&self) -> MutexGuard<'_, EntrySlot> {
        self.slot.lock().expect("Entry mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Quantity;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    #[test]
    fn test_open_starts_with_one_row() {
        let entry = EntryState::new();
        let view = entry.open(date());

        assert_eq!(view.buyer_name, "");
        assert_eq!(view.sale_date, "2026-01-05");
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].quantity, Quantity::ONE);
        assert!(entry.is_open());
    }

    #[test]
    fn test_reopen_discards_previous_session() {
        let entry = EntryState::new();
        entry.open(date());
        entry.with_session_mut(|s| {
            s.buyer_name = "Ada".to_string();
            s.rows.add_row();
        });

        let view = entry.open(date());
        assert_eq!(view.buyer_name, "");
        assert_eq!(view.rows.len(), 1);
    }

    #[test]
    fn test_closed_session_refuses_access() {
        let entry = EntryState::new();
        assert_eq!(entry.with_session(|s| s.rows.len()), None);

        entry.open(date());
        assert!(entry.close());
        assert!(!entry.close());
        assert!(entry.with_session_mut(|s| s.rows.add_row()).is_none());
    }

    #[test]
    fn test_draft_drops_unselected_rows() {
        let entry = EntryState::new();
        entry.open(date());

        let draft = entry
            .with_session_mut(|s| {
                s.buyer_name = "Grace".to_string();
                let second = s.rows.add_row();
                s.rows.select_item(second, Some("widget".to_string()));
                s.draft()
            })
            .unwrap();

        assert_eq!(draft.buyer_name, "Grace");
        assert_eq!(draft.sale_date, date());
        assert_eq!(draft.lines, vec![SaleLine::new("widget", Quantity::ONE)]);
    }

    #[test]
    fn test_close_if_only_closes_the_same_form() {
        let entry = EntryState::new();
        entry.open(date());
        let stamp = entry.with_session(|s| s.stamp()).unwrap();
        assert!(entry.close_if(stamp));
        assert!(!entry.is_open());

        // Reopened: a new session, even though nothing was edited.
        entry.open(date());
        let first = entry.with_session(|s| s.stamp()).unwrap();
        entry.close();
        entry.open(date());
        assert!(!entry.close_if(first));
        assert!(entry.is_open());

        // Edited after the stamp was taken.
        let stamp = entry.with_session(|s| s.stamp()).unwrap();
        entry.with_session_mut(|s| s.buyer_name = "Alan".to_string());
        assert!(!entry.close_if(stamp));
        assert_eq!(entry.with_session(|s| s.buyer_name.clone()).unwrap(), "Alan");
    }
}

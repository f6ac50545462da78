//! # State Module
//!
//! Application state for the dashboard, split by concern like the command
//! layer that uses it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │    AppState      │  │   EntryState     │  │   ConfigState    │      │
//! │  │                  │  │                  │  │                  │      │
//! │  │  Arc<Dashboard   │  │  Arc<Mutex<      │  │  db path         │      │
//! │  │    Snapshot>     │  │   Option<Entry   │  │  pool size       │      │
//! │  │  reload tickets  │  │   Session>>>     │  │  chart text      │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • AppState: snapshot swapped whole under an RwLock                    │
//! │  • EntryState: Mutex, never held across a store call                   │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod entry;
mod snapshot;

pub use config::{ConfigError, ConfigState};
pub use entry::{EntryDraft, EntrySession, EntryState, EntryView, SessionStamp};
pub use snapshot::{AppState, DashboardSnapshot, ReloadTicket};

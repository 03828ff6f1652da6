//! Core domain logic for Reflecto journaling.
//! This crate is the single source of truth for entry-persistence and
//! session-mode reconciliation invariants.

pub mod calendar;
pub mod db;
pub mod journal;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;

pub use journal::{Journal, JournalError, JournalMode, JournalView};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{normalize_content, Entry, EntryId, EntrySource, Identity};
pub use session::{SessionHub, SessionListener, SessionOracle, SessionSubscription};
pub use store::{EntryStore, GuestBuffer, SqliteEntryStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Backing-store contracts for journal entries.
//!
//! # Responsibility
//! - Define the narrow select/insert/delete contract the journal depends on.
//! - Isolate storage details from the journal state machine.
//!
//! # Invariants
//! - `select_for_owner` returns entries newest first.
//! - Every operation is scoped to one owning identity; `delete` filters by
//!   both entry id and owner so an id collision can never remove a foreign
//!   row.

use crate::db::DbError;
use crate::model::entry::{Entry, EntryId, Identity};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod guest;
mod sqlite;

pub use guest::GuestBuffer;
pub use sqlite::SqliteEntryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque failure signal from a durable entry store.
///
/// The journal treats every variant the same way: log, keep prior state.
/// Variants exist so diagnostics stay useful, not to drive control flow.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::Backend(message) => write!(f, "entry store backend failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable entry store contract consumed by the journal.
pub trait EntryStore {
    /// Returns all entries owned by `owner`, sorted by `created_at`
    /// descending.
    fn select_for_owner(&self, owner: &Identity) -> StoreResult<Vec<Entry>>;

    /// Persists one entry for `owner`. The store assigns id and timestamp.
    fn insert(&self, content: &str, owner: &Identity) -> StoreResult<()>;

    /// Removes the entry matching both `id` and `owner`. Removing an entry
    /// that does not exist (or belongs to another identity) succeeds as a
    /// no-op, matching hosted row-store delete semantics.
    fn delete(&self, id: EntryId, owner: &Identity) -> StoreResult<()>;
}

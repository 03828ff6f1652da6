//! SQLite implementation of the durable entry store.
//!
//! # Responsibility
//! - Map the entry store contract onto the migrated `entries` table.
//! - Keep SQL details inside this persistence boundary.
//!
//! # Invariants
//! - Rows are written with store-assigned id and timestamp; callers never
//!   supply either.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::entry::{Entry, EntryId, Identity};
use crate::store::{EntryStore, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Durable entry store backed by a migrated SQLite connection.
///
/// The connection sits behind a mutex so one store value can be shared by a
/// journal and its session listener. Operations hold the lock only for the
/// duration of their own statement.
pub struct SqliteEntryStore {
    conn: Mutex<Connection>,
}

impl SqliteEntryStore {
    /// Wraps a connection produced by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-statement;
        // the connection itself is still usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntryStore for SqliteEntryStore {
    fn select_for_owner(&self, owner: &Identity) -> StoreResult<Vec<Entry>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, owner, content, created_at
             FROM entries
             WHERE owner = ?1
             ORDER BY created_at DESC, id ASC;",
        )?;

        let mut rows = stmt.query([owner.as_str()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn insert(&self, content: &str, owner: &Identity) -> StoreResult<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO entries (id, owner, content, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                Uuid::new_v4().to_string(),
                owner.as_str(),
                content,
                Utc::now().timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: EntryId, owner: &Identity) -> StoreResult<()> {
        let conn = self.lock();
        conn.execute(
            "DELETE FROM entries WHERE id = ?1 AND owner = ?2;",
            params![id.to_string(), owner.as_str()],
        )?;
        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> StoreResult<Entry> {
    let id_text: String = row.get("id")?;
    let id: EntryId = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in entries.id"))
    })?;

    let owner_text: String = row.get("owner")?;
    let owner = Identity::new(owner_text).ok_or_else(|| {
        StoreError::InvalidData("blank owner value in entries.owner".to_string())
    })?;

    let created_at_ms: i64 = row.get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at_ms).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "out-of-range timestamp `{created_at_ms}` in entries.created_at"
        ))
    })?;

    Ok(Entry::remote(id, created_at, row.get::<_, String>("content")?, owner))
}

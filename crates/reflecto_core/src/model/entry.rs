//! Entry domain model.
//!
//! # Responsibility
//! - Define the single entry shape used by both the durable store and the
//!   guest buffer, discriminated by `EntrySource`.
//! - Provide the content normalization rule applied to every submission.
//!
//! # Invariants
//! - `id` is unique within its backing store and never reused.
//! - Entries are immutable after creation; the only lifecycle change is
//!   removal from their store.
//! - `owner` is `Some` exactly when `source` is `EntrySource::Remote`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a journal entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = Uuid;

/// Opaque authenticated-user reference scoping entry ownership.
///
/// The core treats the inner value as a token handed over by the session
/// layer. It is never inspected beyond non-blank validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wraps a raw identity token. Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let value = raw.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which backing store produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Row owned durably by an authenticated identity.
    Remote,
    /// In-memory guest entry; vanishes with the current session.
    Guest,
}

/// Canonical journal entry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable global ID, unique within the backing store.
    pub id: EntryId,
    /// Creation instant. Entries have no update time; they never change.
    pub created_at: DateTime<Utc>,
    /// Free-form journal text. Never empty.
    pub content: String,
    /// Owning identity for remote entries, `None` for guest entries.
    pub owner: Option<Identity>,
    /// Discriminant for the store that holds this entry.
    pub source: EntrySource,
}

impl Entry {
    /// Synthesizes a guest entry with a fresh id and the current instant.
    ///
    /// Callers must pass content that already went through
    /// [`normalize_content`].
    pub fn guest(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            content: content.into(),
            owner: None,
            source: EntrySource::Guest,
        }
    }

    /// Builds a remote entry from store-confirmed fields.
    pub fn remote(
        id: EntryId,
        created_at: DateTime<Utc>,
        content: impl Into<String>,
        owner: Identity,
    ) -> Self {
        Self {
            id,
            created_at,
            content: content.into(),
            owner: Some(owner),
            source: EntrySource::Remote,
        }
    }
}

/// Applies the submission rule shared by every create path: trim, and
/// reject input that is empty afterwards.
pub fn normalize_content(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

//! Domain model for journal entries and session identity.
//!
//! # Responsibility
//! - Define the canonical entry record shared by every backing store.
//! - Keep identity opaque: the core observes it, never mints or parses it.
//!
//! # Invariants
//! - Every entry carries a stable `EntryId` and an explicit `EntrySource`.
//! - Entry content is non-empty once an `Entry` value exists; blank input
//!   is rejected before any store is reached.

pub mod entry;

//! Ephemeral guest-mode entry buffer.

use crate::model::entry::{Entry, EntryId};

/// Ordered in-memory container for guest entries.
///
/// Newest entries sit at the front. The buffer has no persistence hooks
/// and no capacity bound; it lives exactly as long as the guest session
/// that owns it.
#[derive(Debug, Default)]
pub struct GuestBuffer {
    entries: Vec<Entry>,
}

impl GuestBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one entry at the front of the buffer.
    pub fn prepend(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
    }

    /// Removes the entry with the matching id. Returns whether an entry
    /// was removed; an absent id leaves the buffer untouched.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() < before
    }

    /// Current entries, newest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::GuestBuffer;
    use crate::model::entry::Entry;

    #[test]
    fn prepend_keeps_newest_first() {
        let mut buffer = GuestBuffer::new();
        let first = Entry::guest("first");
        let second = Entry::guest("second");
        buffer.prepend(first.clone());
        buffer.prepend(second.clone());

        let ids: Vec<_> = buffer.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn remove_is_a_no_op_for_unknown_id() {
        let mut buffer = GuestBuffer::new();
        let entry = Entry::guest("kept");
        buffer.prepend(entry.clone());

        assert!(!buffer.remove(uuid::Uuid::new_v4()));
        assert_eq!(buffer.len(), 1);

        assert!(buffer.remove(entry.id));
        assert!(buffer.is_empty());
    }
}

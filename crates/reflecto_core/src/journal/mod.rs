//! Journal entry repository and session-mode state machine.
//!
//! # Responsibility
//! - Present one uniform list/create/delete surface to the presentation
//!   layer regardless of which backing store is active.
//! - Reconcile session identity transitions with the durable store or the
//!   guest buffer.
//!
//! # Invariants
//! - The authenticated view is refreshed by full re-query after every
//!   mutation, never by local patching; it always reflects store-confirmed
//!   state.
//! - Every entry into guest mode starts with an empty buffer; entries never
//!   carry over across a transition in either direction.
//! - The state lock is never held across a store call.
//! - A store response observed under a different epoch than the one it was
//!   issued in is discarded, so a stale reload can never overwrite the
//!   result of a newer transition.

use crate::model::entry::{normalize_content, Entry, EntryId, Identity};
use crate::session::{SessionOracle, SessionSubscription};
use crate::store::{EntryStore, GuestBuffer, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Journal operation errors surfaced to the presentation layer.
///
/// Store failures are additionally logged at this boundary; callers can
/// rely on the prior view being preserved whenever an error is returned.
#[derive(Debug)]
pub enum JournalError {
    /// Submitted content was empty after trimming.
    EmptyContent,
    /// A create is already in flight; the submission was not dispatched.
    SaveInFlight,
    /// The journal has not finished selecting a backing store yet.
    NotReady,
    /// The durable store reported a failure; the view was left untouched.
    Store(StoreError),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "entry content is empty after trimming"),
            Self::SaveInFlight => write!(f, "another entry submission is still in flight"),
            Self::NotReady => write!(f, "journal backing store is not ready"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Discriminant-only view of the journal state, for presentation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    Uninitialized,
    LoadingAuthenticated,
    ReadyAuthenticated,
    ReadyGuest,
}

/// Snapshot handed across the presentation boundary.
#[derive(Debug, Clone)]
pub struct JournalView {
    /// Current entries, newest first.
    pub entries: Vec<Entry>,
    /// True while an authenticated reload after sign-in is outstanding.
    pub is_loading: bool,
    /// True while a create submission is in flight.
    pub is_saving: bool,
}

enum JournalState {
    Uninitialized,
    LoadingAuthenticated {
        identity: Identity,
    },
    ReadyAuthenticated {
        identity: Identity,
        entries: Vec<Entry>,
    },
    ReadyGuest {
        buffer: GuestBuffer,
    },
}

struct Inner {
    state: JournalState,
    /// Bumped on every session transition. Store responses carry the epoch
    /// they were issued under and are dropped when it no longer matches.
    epoch: u64,
}

/// Entry repository reconciling session state with the active backing
/// store.
pub struct Journal<S: EntryStore> {
    store: S,
    inner: Mutex<Inner>,
    saving: AtomicBool,
}

impl<S: EntryStore> Journal<S> {
    /// Creates a journal that has not observed any session state yet.
    pub fn new(store: S) -> Self {
        Self {
            store,
            inner: Mutex::new(Inner {
                state: JournalState::Uninitialized,
                epoch: 0,
            }),
            saving: AtomicBool::new(false),
        }
    }

    /// Applies the oracle's current identity, then subscribes for
    /// transitions. The journal holds exactly one subscription; dropping
    /// the returned registration detaches it.
    pub fn attach(self: &Arc<Self>, oracle: &dyn SessionOracle) -> SessionSubscription
    where
        S: Send + Sync + 'static,
    {
        self.apply_identity(oracle.current_identity());
        let weak = Arc::downgrade(self);
        oracle.subscribe(Box::new(move |identity| {
            if let Some(journal) = weak.upgrade() {
                journal.apply_identity(identity);
            }
        }))
    }

    /// Selects the backing store for `identity` and loads the view from it.
    ///
    /// `None` resets the journal to guest mode with an empty buffer. `Some`
    /// enters the loading state and replaces the in-memory list with a full
    /// reload for that identity; a load failure is logged and yields an
    /// empty authenticated view.
    pub fn apply_identity(&self, identity: Option<Identity>) {
        let Some(identity) = identity else {
            let mut inner = self.lock();
            inner.epoch += 1;
            inner.state = JournalState::ReadyGuest {
                buffer: GuestBuffer::new(),
            };
            info!("event=session_transition module=journal status=ok mode=guest");
            return;
        };

        let epoch = {
            let mut inner = self.lock();
            inner.epoch += 1;
            inner.state = JournalState::LoadingAuthenticated {
                identity: identity.clone(),
            };
            inner.epoch
        };
        info!("event=session_transition module=journal status=start mode=authenticated");

        let loaded = self.store.select_for_owner(&identity);

        let mut inner = self.lock();
        if inner.epoch != epoch {
            info!("event=entries_load module=journal status=discarded reason=stale_epoch");
            return;
        }
        let entries = match loaded {
            Ok(rows) => {
                info!(
                    "event=entries_load module=journal status=ok count={}",
                    rows.len()
                );
                rows
            }
            Err(err) => {
                error!("event=entries_load module=journal status=error error={err}");
                Vec::new()
            }
        };
        inner.state = JournalState::ReadyAuthenticated { identity, entries };
    }

    /// Current in-memory entries, newest first. Empty until a backing
    /// store is ready.
    pub fn list(&self) -> Vec<Entry> {
        let inner = self.lock();
        match &inner.state {
            JournalState::ReadyAuthenticated { entries, .. } => entries.clone(),
            JournalState::ReadyGuest { buffer } => buffer.entries().to_vec(),
            JournalState::Uninitialized | JournalState::LoadingAuthenticated { .. } => Vec::new(),
        }
    }

    /// Discriminant of the current state.
    pub fn mode(&self) -> JournalMode {
        let inner = self.lock();
        match &inner.state {
            JournalState::Uninitialized => JournalMode::Uninitialized,
            JournalState::LoadingAuthenticated { .. } => JournalMode::LoadingAuthenticated,
            JournalState::ReadyAuthenticated { .. } => JournalMode::ReadyAuthenticated,
            JournalState::ReadyGuest { .. } => JournalMode::ReadyGuest,
        }
    }

    /// Snapshot for the presentation boundary.
    pub fn view(&self) -> JournalView {
        JournalView {
            entries: self.list(),
            is_loading: self.mode() == JournalMode::LoadingAuthenticated,
            is_saving: self.saving.load(Ordering::SeqCst),
        }
    }

    /// Creates one entry from user-submitted content.
    ///
    /// Rejects blank content and overlapping submissions. Authenticated
    /// mode persists through the durable store and re-queries the full
    /// list; guest mode synthesizes an entry locally and cannot fail.
    pub fn create(&self, content: &str) -> Result<(), JournalError> {
        let Some(content) = normalize_content(content) else {
            return Err(JournalError::EmptyContent);
        };

        if self.saving.swap(true, Ordering::SeqCst) {
            return Err(JournalError::SaveInFlight);
        }
        let _guard = SaveGuard(&self.saving);

        let (identity, epoch) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            match &mut inner.state {
                JournalState::ReadyGuest { buffer } => {
                    buffer.prepend(Entry::guest(content));
                    return Ok(());
                }
                JournalState::ReadyAuthenticated { identity, .. } => {
                    (identity.clone(), inner.epoch)
                }
                JournalState::Uninitialized | JournalState::LoadingAuthenticated { .. } => {
                    return Err(JournalError::NotReady);
                }
            }
        };

        self.store.insert(&content, &identity).map_err(|err| {
            error!("event=entry_create module=journal status=error error={err}");
            JournalError::Store(err)
        })?;
        self.refresh_authenticated(&identity, epoch)
    }

    /// Deletes one entry by id.
    ///
    /// Authenticated mode scopes the delete by both id and identity, then
    /// re-queries the full list. Guest mode removes from the buffer; an
    /// unknown id is a no-op either way.
    pub fn delete(&self, id: EntryId) -> Result<(), JournalError> {
        let (identity, epoch) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            match &mut inner.state {
                JournalState::ReadyGuest { buffer } => {
                    buffer.remove(id);
                    return Ok(());
                }
                JournalState::ReadyAuthenticated { identity, .. } => {
                    (identity.clone(), inner.epoch)
                }
                JournalState::Uninitialized | JournalState::LoadingAuthenticated { .. } => {
                    return Err(JournalError::NotReady);
                }
            }
        };

        self.store.delete(id, &identity).map_err(|err| {
            error!("event=entry_delete module=journal status=error error={err}");
            JournalError::Store(err)
        })?;
        self.refresh_authenticated(&identity, epoch)
    }

    /// Re-queries the authenticated list after a mutation issued under
    /// `epoch`. A response arriving after a newer session transition is
    /// discarded.
    fn refresh_authenticated(&self, identity: &Identity, epoch: u64) -> Result<(), JournalError> {
        let loaded = self.store.select_for_owner(identity);

        let mut inner = self.lock();
        if inner.epoch != epoch {
            info!("event=entries_load module=journal status=discarded reason=stale_epoch");
            return Ok(());
        }
        let rows = loaded.map_err(|err| {
            error!("event=entries_load module=journal status=error error={err}");
            JournalError::Store(err)
        })?;
        if let JournalState::ReadyAuthenticated {
            identity: current,
            entries,
        } = &mut inner.state
        {
            if current == identity {
                info!(
                    "event=entries_load module=journal status=ok count={}",
                    rows.len()
                );
                *entries = rows;
            }
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the last consistent state
        // in place; recover instead of wedging every later operation.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SaveGuard<'a>(&'a AtomicBool);

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

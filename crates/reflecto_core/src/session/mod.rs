//! Session identity observation and transition notifications.
//!
//! # Responsibility
//! - Define the oracle contract the journal observes identity through.
//! - Provide the in-process hub used by the application shell and tests.
//!
//! # Invariants
//! - The core only observes session state; sign-in/sign-out mutate the hub
//!   from outside.
//! - Listeners fire only on actual identity transitions, never on repeated
//!   assignment of the same identity.
//! - Listeners are invoked without any hub lock held.

use crate::model::entry::Identity;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Callback receiving the identity present after a transition.
pub type SessionListener = Box<dyn Fn(Option<Identity>) + Send + Sync>;

/// Source of truth for the current authenticated identity.
pub trait SessionOracle {
    /// Point query for the identity active right now.
    fn current_identity(&self) -> Option<Identity>;

    /// Registers a transition listener. The registration stays active until
    /// the returned subscription is cancelled or dropped.
    fn subscribe(&self, listener: SessionListener) -> SessionSubscription;
}

/// Cancellable listener registration.
///
/// Dropping the subscription deregisters the listener, so a subscriber can
/// never outlive its interest in transitions.
pub struct SessionSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SessionSubscription {
    fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Deregisters the listener immediately.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

#[derive(Default)]
struct HubState {
    identity: Option<Identity>,
    listeners: BTreeMap<u64, Arc<SessionListener>>,
    next_token: u64,
}

/// In-process session oracle with explicit sign-in/sign-out transitions.
#[derive(Default)]
pub struct SessionHub {
    state: Arc<Mutex<HubState>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions to an authenticated identity and notifies listeners.
    /// Re-asserting the identity that is already active is a no-op.
    pub fn sign_in(&self, identity: Identity) {
        self.transition(Some(identity));
    }

    /// Transitions to no identity and notifies listeners. Signing out while
    /// already signed out is a no-op.
    pub fn sign_out(&self) {
        self.transition(None);
    }

    /// Number of active listener registrations.
    pub fn listener_count(&self) -> usize {
        lock_state(&self.state).listeners.len()
    }

    fn transition(&self, identity: Option<Identity>) {
        let (next, listeners) = {
            let mut state = lock_state(&self.state);
            if state.identity == identity {
                return;
            }
            state.identity = identity.clone();
            let listeners: Vec<_> = state.listeners.values().cloned().collect();
            (identity, listeners)
        };

        for listener in listeners {
            listener(next.clone());
        }
    }
}

impl SessionOracle for SessionHub {
    fn current_identity(&self) -> Option<Identity> {
        lock_state(&self.state).identity.clone()
    }

    fn subscribe(&self, listener: SessionListener) -> SessionSubscription {
        let token = {
            let mut state = lock_state(&self.state);
            let token = state.next_token;
            state.next_token += 1;
            state.listeners.insert(token, Arc::new(listener));
            token
        };

        let weak: Weak<Mutex<HubState>> = Arc::downgrade(&self.state);
        SessionSubscription::new(move || {
            if let Some(state) = weak.upgrade() {
                lock_state(&state).listeners.remove(&token);
            }
        })
    }
}

fn lock_state(state: &Mutex<HubState>) -> std::sync::MutexGuard<'_, HubState> {
    // Listener panics must not wedge the hub for every later transition.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::{SessionHub, SessionOracle};
    use crate::model::entry::Identity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn identity(token: &str) -> Identity {
        Identity::new(token).expect("test identity should be non-blank")
    }

    #[test]
    fn sign_in_and_sign_out_notify_listeners_with_new_identity() {
        let hub = SessionHub::new();
        let seen: Arc<Mutex<Vec<Option<Identity>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = hub.subscribe(Box::new(move |next| {
            sink.lock().unwrap().push(next);
        }));

        hub.sign_in(identity("user-a"));
        hub.sign_out();

        let observed = seen.lock().unwrap().clone();
        assert_eq!(observed, vec![Some(identity("user-a")), None]);
        drop(subscription);
    }

    #[test]
    fn repeated_identity_does_not_fire_transition() {
        let hub = SessionHub::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let _subscription = hub.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        hub.sign_in(identity("user-a"));
        hub.sign_in(identity("user-a"));
        hub.sign_out();
        hub.sign_out();

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_subscription_deregisters_listener() {
        let hub = SessionHub::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let subscription = hub.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hub.listener_count(), 1);

        drop(subscription);
        assert_eq!(hub.listener_count(), 0);

        hub.sign_in(identity("user-a"));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_is_equivalent_to_drop() {
        let hub = SessionHub::new();
        let subscription = hub.subscribe(Box::new(|_| {}));
        assert_eq!(hub.listener_count(), 1);

        subscription.cancel();
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn current_identity_reflects_latest_transition() {
        let hub = SessionHub::new();
        assert_eq!(hub.current_identity(), None);

        hub.sign_in(identity("user-b"));
        assert_eq!(hub.current_identity(), Some(identity("user-b")));

        hub.sign_out();
        assert_eq!(hub.current_identity(), None);
    }
}

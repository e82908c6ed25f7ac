//! # Liveness guard: the single gate for every state mutation.
//!
//! Holds the request state together with two pieces of bookkeeping:
//! - `live`: flips to `false` exactly once, at teardown;
//! - `binding`: number of the currently bound unit handle.
//!
//! ## Rules
//! - A dispatch is applied only if the guard is live **and** it carries the current
//!   binding number. Anything else is dropped silently and reported as `false`.
//! - The check and the mutation happen under one lock, so a delivery racing a
//!   teardown on another worker thread can never land after it.
//! - Snapshots are published through a `watch` channel; receivers keep the last
//!   value after teardown.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::state::{reduce, Event, RequestState, Status};

struct Slot<O> {
    live: bool,
    binding: u64,
    state: watch::Sender<RequestState<O>>,
}

/// Gatekeeper for one subscription's [`RequestState`].
pub(crate) struct Guard<O> {
    slot: Mutex<Slot<O>>,
}

impl<O> Guard<O> {
    pub fn new(initial: RequestState<O>) -> Arc<Self> {
        let (state, _rx) = watch::channel(initial);
        Arc::new(Self {
            slot: Mutex::new(Slot {
                live: true,
                binding: 0,
                state,
            }),
        })
    }

    /// Applies `event` if `binding` is current and the guard is live.
    pub fn dispatch(&self, binding: u64, event: Event<O>) -> bool {
        self.dispatch_with(binding, |_| event).is_some()
    }

    /// Like [`dispatch`](Self::dispatch), but builds the event from the current state
    /// under the same lock. Returns the resulting status when applied.
    pub fn dispatch_with<F>(&self, binding: u64, make: F) -> Option<Status>
    where
        F: FnOnce(&RequestState<O>) -> Event<O>,
    {
        let slot = self.slot.lock();
        if !slot.live || slot.binding != binding {
            return None;
        }
        let mut next = None;
        slot.state.send_modify(|state| {
            let event = make(state);
            *state = reduce(std::mem::take(state), event);
            next = Some(state.status);
        });
        next
    }

    /// Severs the current binding and returns the number of the next one.
    pub fn rebind(&self) -> u64 {
        let mut slot = self.slot.lock();
        slot.binding += 1;
        slot.binding
    }

    /// Flips liveness off. Returns `true` only for the call that flipped it.
    pub fn teardown(&self) -> bool {
        let mut slot = self.slot.lock();
        std::mem::replace(&mut slot.live, false)
    }

    pub fn is_live(&self) -> bool {
        self.slot.lock().live
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<O>> {
        self.slot.lock().state.subscribe()
    }
}

impl<O: Clone> Guard<O> {
    pub fn snapshot(&self) -> RequestState<O> {
        self.slot.lock().state.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitError;

    #[test]
    fn dispatch_requires_current_binding() {
        let guard = Guard::new(RequestState::idle());
        let first = guard.rebind();
        assert!(guard.dispatch(first, Event::Resolved(1)));

        let second = guard.rebind();
        assert!(!guard.dispatch(first, Event::Resolved(2)));
        assert_eq!(guard.snapshot().result, Some(1));

        assert!(guard.dispatch(second, Event::Resolved(3)));
        assert_eq!(guard.snapshot().result, Some(3));
    }

    #[test]
    fn late_delivery_after_teardown_is_ignored() {
        let guard = Guard::new(RequestState::idle());
        let binding = guard.rebind();
        guard.dispatch(binding, Event::Resolved("r1"));
        let rx = guard.subscribe();

        assert!(guard.teardown());
        assert!(!guard.teardown());
        assert!(!guard.is_live());

        assert!(!guard.dispatch(binding, Event::Resolved("late")));
        assert!(!guard.dispatch(binding, Event::Rejected(UnitError::UnitFault)));

        let last = rx.borrow().clone();
        assert_eq!(last.status, Status::Resolved);
        assert_eq!(last.result, Some("r1"));
        assert_eq!(guard.snapshot(), last);
    }

    #[test]
    fn dispatch_with_sees_state_under_lock() {
        let guard = Guard::new(RequestState::idle());
        let binding = guard.rebind();
        guard.dispatch(binding, Event::Resolved(5u32));

        let status = guard.dispatch_with(binding, |state| {
            assert_eq!(state.status, Status::Resolved);
            Event::Stale
        });
        assert_eq!(status, Some(Status::Stale));
        assert_eq!(guard.snapshot().result, Some(5));
    }
}

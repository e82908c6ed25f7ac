//! # Lifecycle events emitted by orchestrators and subscriber workers.
//!
//! The [`LifecycleKind`] enum classifies event types across three categories:
//! - **Unit events**: a background unit was spawned, failed to spawn, or was disposed
//! - **Request events**: a request was sent, a response or fault was delivered, or a
//!   delivery was dropped by the liveness guard
//! - **Subscriber events**: a subscriber panicked or overflowed its queue
//!
//! The [`LifecycleEvent`] struct carries additional metadata such as timestamps,
//! unit name, binding number and reasons.
//!
//! These are observability records. They are unrelated to the request reducer's
//! [`Event`](crate::Event), which drives state transitions.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use offload::{LifecycleEvent, LifecycleKind};
//!
//! let ev = LifecycleEvent::new(LifecycleKind::UnitFaulted)
//!     .with_unit("even-sum")
//!     .with_binding(3)
//!     .with_reason("unit fault");
//!
//! assert_eq!(ev.kind, LifecycleKind::UnitFaulted);
//! assert_eq!(ev.unit.as_deref(), Some("even-sum"));
//! assert_eq!(ev.binding, Some(3));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::state::Status;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    // === Unit events ===
    /// A background unit was created for a (new) recipe.
    ///
    /// Sets:
    /// - `unit`: computation name
    /// - `binding`: binding number of the new handle
    UnitSpawned,

    /// The recipe failed to produce a unit.
    ///
    /// Sets:
    /// - `binding`: binding number that has no handle
    /// - `reason`: spawn error message
    UnitSpawnFailed,

    /// A unit was released (recipe change or deactivation).
    ///
    /// Sets:
    /// - `unit`: computation name
    /// - `binding`: binding number of the released handle
    UnitDisposed,

    // === Request events ===
    /// A request was pushed to the unit.
    ///
    /// Sets:
    /// - `unit`, `binding`
    /// - `status`: status dispatched before sending (`Pending` or `Stale`)
    RequestSent,

    /// A response was delivered and the state resolved.
    ///
    /// Sets:
    /// - `unit`, `binding`
    ResponseDelivered,

    /// The computation panicked; the state was rejected.
    ///
    /// Sets:
    /// - `unit`, `binding`
    /// - `reason`: generic fault text
    UnitFaulted,

    /// A message could not be encoded/decoded; the state was rejected.
    ///
    /// Sets:
    /// - `unit`, `binding`
    /// - `reason`: generic fault text
    MessageFaulted,

    /// An outcome arrived after teardown or from a replaced handle and was ignored.
    ///
    /// Sets:
    /// - `unit`, `binding`
    /// - `reason`: label of the dropped outcome
    DeliveryDropped,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `unit`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `unit`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`LifecycleKind`]
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: LifecycleKind,
    /// Computation (or subscriber) name, if applicable.
    pub unit: Option<Arc<str>>,
    /// Binding number of the unit handle the event concerns.
    pub binding: Option<u64>,
    /// Request status associated with the event.
    pub status: Option<Status>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl LifecycleEvent {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: LifecycleKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            unit: None,
            binding: None,
            status: None,
            reason: None,
        }
    }

    /// Attaches a unit (or subscriber) name.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches a binding number.
    #[inline]
    pub fn with_binding(mut self, binding: u64) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Attaches a request status.
    #[inline]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    pub fn subscriber_overflow(subscriber: impl Into<Arc<str>>, reason: &'static str) -> Self {
        LifecycleEvent::new(LifecycleKind::SubscriberOverflow)
            .with_unit(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    pub fn subscriber_panicked(subscriber: impl Into<Arc<str>>, info: String) -> Self {
        LifecycleEvent::new(LifecycleKind::SubscriberPanicked)
            .with_unit(subscriber)
            .with_reason(info)
    }
}

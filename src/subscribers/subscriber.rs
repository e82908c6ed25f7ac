//! # Subscriber trait.
//!
//! Implement [`Subscribe`] to receive an orchestrator's lifecycle events in a
//! background task, attached with
//! [`OrchestratorBuilder::with_subscribers`](crate::OrchestratorBuilder::with_subscribers).
//!
//! Delivery is in publish order. Each subscriber has its own queue of
//! [`Config::subscriber_capacity`](crate::Config) events; when it is full, events are
//! dropped for that subscriber and `SubscriberOverflow` appears on
//! [`Orchestrator::lifecycle`](crate::Orchestrator::lifecycle). Subscriber reports
//! (overflow, panic) go to that stream only, never to other subscribers.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! use async_trait::async_trait;
//! use offload::{LifecycleEvent, LifecycleKind, Subscribe};
//!
//! #[derive(Default)]
//! struct FaultCounter(AtomicU64);
//!
//! #[async_trait]
//! impl Subscribe for FaultCounter {
//!     async fn on_event(&self, ev: &LifecycleEvent) {
//!         if matches!(ev.kind, LifecycleKind::UnitFaulted | LifecycleKind::MessageFaulted) {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &str {
//!         "fault-counter"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::LifecycleEvent;

/// Receiver of lifecycle events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    ///
    /// Runs on the subscriber's own task. A panic is caught and reported as
    /// `SubscriberPanicked`; the next event is delivered normally.
    async fn on_event(&self, event: &LifecycleEvent);

    /// Name used in overflow and panic reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

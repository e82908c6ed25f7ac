//! # Lifecycle bus.
//!
//! One [`Bus`] per orchestrator. Every event published on it goes two ways at once:
//!
//! ```text
//! Subscription / Listener ── publish(ev) ──┬──► broadcast ring ──► Orchestrator::lifecycle() receivers
//!                                          └──► SubscriberSet::emit ──► per-subscriber queues
//! ```
//!
//! Publishing is synchronous and never waits, so it is safe from `run`,
//! `deactivate` and `Drop`. Events published while nobody listens are lost.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::event::LifecycleEvent;
use crate::subscribers::{Subscribe, SubscriberSet};

#[derive(Clone)]
pub(crate) struct Bus {
    stream: broadcast::Sender<LifecycleEvent>,
    fanout: Option<Arc<SubscriberSet>>,
}

impl Bus {
    /// Creates a bus whose broadcast ring holds `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (stream, _rx) = broadcast::channel(capacity.max(1));
        Self {
            stream,
            fanout: None,
        }
    }

    /// Attaches subscribers, each behind a queue of `queue_capacity` events.
    ///
    /// Spawns one worker task per subscriber; must run within a tokio runtime
    /// unless `subs` is empty.
    pub fn with_subscribers(
        mut self,
        subs: Vec<Arc<dyn Subscribe>>,
        queue_capacity: usize,
    ) -> Self {
        if !subs.is_empty() {
            let set = SubscriberSet::spawn(subs, queue_capacity, self.stream.clone());
            self.fanout = Some(Arc::new(set));
        }
        self
    }

    pub fn publish(&self, ev: LifecycleEvent) {
        if let Some(set) = &self.fanout {
            set.emit(&ev);
        }
        let _ = self.stream.send(ev);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.stream.subscribe()
    }
}

//! # Per-subscriber queues and workers.
//!
//! ```text
//! Bus::publish(ev) ──► emit ──┬──► [queue] ──► worker ──► LogWriter::on_event
//!                             └──► [queue] ──► worker ──► custom::on_event
//!                                     │            │
//!                                   full         panic
//!                                     └──► SubscriberOverflow / SubscriberPanicked
//!                                          (lifecycle stream + warn! log)
//! ```
//!
//! - `emit` never waits; a full queue drops the event for that subscriber only.
//! - Workers exit once every bus handle is gone and their queue is drained.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

use crate::events::LifecycleEvent;
use crate::subscribers::Subscribe;
use crate::unit::panic_message;

struct Queue {
    name: Arc<str>,
    tx: mpsc::Sender<Arc<LifecycleEvent>>,
}

pub(crate) struct SubscriberSet {
    queues: Vec<Queue>,
    stream: broadcast::Sender<LifecycleEvent>,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Reports go to `stream`.
    pub fn spawn(
        subs: Vec<Arc<dyn Subscribe>>,
        capacity: usize,
        stream: broadcast::Sender<LifecycleEvent>,
    ) -> Self {
        let queues = subs
            .into_iter()
            .map(|sub| {
                let name: Arc<str> = Arc::from(sub.name());
                let (tx, rx) = mpsc::channel(capacity.max(1));
                tokio::spawn(drive(sub, Arc::clone(&name), rx, stream.clone()));
                Queue { name, tx }
            })
            .collect();
        Self { queues, stream }
    }

    pub fn emit(&self, ev: &LifecycleEvent) {
        let shared = Arc::new(ev.clone());
        for queue in &self.queues {
            let reason = match queue.tx.try_send(Arc::clone(&shared)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            warn!(subscriber = %queue.name, kind = ?ev.kind, reason, "lifecycle event dropped");
            let _ = self.stream.send(LifecycleEvent::subscriber_overflow(
                Arc::clone(&queue.name),
                reason,
            ));
        }
    }
}

async fn drive(
    sub: Arc<dyn Subscribe>,
    name: Arc<str>,
    mut rx: mpsc::Receiver<Arc<LifecycleEvent>>,
    stream: broadcast::Sender<LifecycleEvent>,
) {
    while let Some(ev) = rx.recv().await {
        let delivery = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
        if let Err(payload) = delivery {
            let reason = panic_message(payload.as_ref());
            warn!(subscriber = %name, reason = %reason, "subscriber panicked");
            let _ = stream.send(LifecycleEvent::subscriber_panicked(Arc::clone(&name), reason));
        }
    }
}

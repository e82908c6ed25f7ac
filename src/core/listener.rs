//! # Binding listener: the observers bound to one unit handle.
//!
//! One listener task runs per binding. It turns unit outcomes into reducer events
//! and routes them through the [`Guard`]:
//!
//! ```text
//! Signals::recv()
//!   ├─ Ok(data)          → Resolved(data)             → ResponseDelivered
//!   ├─ Err(UnitFault)    → Rejected("unit fault")     → UnitFaulted
//!   └─ Err(MessageFault) → Rejected("message fault")  → MessageFaulted
//!
//! guard refused (torn down / rebound) → DeliveryDropped, state untouched
//! ```
//!
//! ## Rules
//! - Exits on cancellation (teardown) or when the unit's signal stream closes.
//! - Cancellation is checked first on every iteration.
//! - Never retries; a rejected request stays rejected until the next activation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::core::guard::Guard;
use crate::error::UnitError;
use crate::events::{Bus, LifecycleEvent, LifecycleKind};
use crate::state::Event;
use crate::unit::Signals;

pub(crate) struct Listener<O> {
    pub guard: Arc<Guard<O>>,
    pub bus: Bus,
    pub unit: Arc<str>,
    pub binding: u64,
    pub signals: Signals<O>,
}

impl<O: DeserializeOwned> Listener<O> {
    pub async fn run(mut self, token: CancellationToken) {
        loop {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                outcome = self.signals.recv() => outcome,
            };
            match outcome {
                Some(outcome) => self.deliver(outcome),
                None => break,
            }
        }
    }

    fn deliver(&self, outcome: Result<O, UnitError>) {
        let (event, kind) = match outcome {
            Ok(data) => (Event::Resolved(data), LifecycleKind::ResponseDelivered),
            Err(e) => {
                let kind = match e {
                    UnitError::MessageFault => LifecycleKind::MessageFaulted,
                    _ => LifecycleKind::UnitFaulted,
                };
                (Event::Rejected(e), kind)
            }
        };
        let label = event.as_label();
        let reason = match &event {
            Event::Rejected(e) => Some(e.as_message()),
            _ => None,
        };

        let ev = if self.guard.dispatch(self.binding, event) {
            let ev = LifecycleEvent::new(kind);
            match reason {
                Some(reason) => ev.with_reason(reason),
                None => ev,
            }
        } else {
            trace!(unit = %self.unit, binding = self.binding, outcome = label, "delivery dropped");
            LifecycleEvent::new(LifecycleKind::DeliveryDropped).with_reason(label)
        };
        self.bus
            .publish(ev.with_unit(Arc::clone(&self.unit)).with_binding(self.binding));
    }
}

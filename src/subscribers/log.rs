//! # LogWriter: lifecycle events rendered through `tracing`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO offload: unit spawned unit="even-sum" binding=1
//! DEBUG offload: request sent unit="even-sum" binding=1 status="pending"
//! DEBUG offload: response delivered unit="even-sum" binding=1
//! WARN offload: unit faulted unit="even-sum" binding=1 reason="unit fault"
//! INFO offload: unit disposed unit="even-sum" binding=1
//! ```

use async_trait::async_trait;
use tracing::{debug, info, trace, warn};

use crate::events::{LifecycleEvent, LifecycleKind};
use crate::subscribers::Subscribe;

/// Lifecycle event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &LifecycleEvent) {
        let unit = e.unit.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");
        let binding = e.binding.unwrap_or(0);

        match e.kind {
            LifecycleKind::UnitSpawned => {
                info!(target: "offload", unit, binding, "unit spawned");
            }
            LifecycleKind::UnitSpawnFailed => {
                warn!(target: "offload", binding, reason, "unit spawn failed");
            }
            LifecycleKind::UnitDisposed => {
                info!(target: "offload", unit, binding, "unit disposed");
            }
            LifecycleKind::RequestSent => {
                let status = e.status.map(|s| s.as_label()).unwrap_or("-");
                debug!(target: "offload", unit, binding, status, "request sent");
            }
            LifecycleKind::ResponseDelivered => {
                debug!(target: "offload", unit, binding, "response delivered");
            }
            LifecycleKind::UnitFaulted => {
                warn!(target: "offload", unit, binding, reason, "unit faulted");
            }
            LifecycleKind::MessageFaulted => {
                warn!(target: "offload", unit, binding, reason, "message faulted");
            }
            LifecycleKind::DeliveryDropped => {
                trace!(target: "offload", unit, binding, reason, "delivery dropped");
            }
            LifecycleKind::SubscriberOverflow | LifecycleKind::SubscriberPanicked => {
                // Reported on the lifecycle stream by the subscriber set, never fanned out.
            }
        }
    }

    fn name(&self) -> &str {
        "LogWriter"
    }
}

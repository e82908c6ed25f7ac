//! # Unit host: the isolated execution context.
//!
//! Runs one [`Handler`] on a dedicated OS thread and delivers inbound messages
//! to it **sequentially**.
//!
//! ## Event flow
//! ```text
//! inbound.blocking_recv() ──► catch_unwind(handler.on_message)
//!                                 ├─ Ok(Ok(bytes)) → UnitSignal::Message(bytes)
//!                                 ├─ Ok(Err(_))    → UnitSignal::MessageFault
//!                                 └─ Err(panic)    → UnitSignal::Fault
//! ```
//!
//! ## Rules
//! - Messages sent before the thread starts are queued, not lost (queue-until-ready).
//! - A fault does not stop the host; the next message is served normally.
//! - Disposal cancels the host token: queued requests are skipped, and the response
//!   of a computation already running is discarded. That computation is never
//!   interrupted.
//! - The loop also exits when the inbound channel closes or the outbound side is gone.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::unit::{Handler, UnitSignal};

/// Channel ends held by the primary context for one spawned unit.
pub(crate) struct HostChannels {
    pub inbound: mpsc::UnboundedSender<Vec<u8>>,
    pub outbound: mpsc::UnboundedReceiver<UnitSignal>,
    /// Cancelled on disposal.
    pub disposed: CancellationToken,
}

/// Spawns a unit thread running `handler`.
pub(crate) fn spawn(handler: Arc<dyn Handler>, cfg: &Config) -> io::Result<HostChannels> {
    let (in_tx, in_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<UnitSignal>();
    let disposed = CancellationToken::new();

    let mut builder = thread::Builder::new().name(cfg.thread_name.clone());
    if let Some(size) = cfg.stack_size() {
        builder = builder.stack_size(size);
    }
    let token = disposed.clone();
    builder.spawn(move || serve(handler, in_rx, out_tx, token))?;

    Ok(HostChannels {
        inbound: in_tx,
        outbound: out_rx,
        disposed,
    })
}

fn serve(
    handler: Arc<dyn Handler>,
    mut inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    outbound: mpsc::UnboundedSender<UnitSignal>,
    disposed: CancellationToken,
) {
    while let Some(request) = inbound.blocking_recv() {
        if disposed.is_cancelled() {
            break;
        }
        let signal = match panic::catch_unwind(AssertUnwindSafe(|| handler.on_message(&request))) {
            Ok(Ok(response)) => UnitSignal::Message(response),
            Ok(Err(e)) => {
                debug!(unit = handler.name(), error = %e, "request could not be decoded");
                UnitSignal::MessageFault
            }
            Err(payload) => {
                warn!(
                    unit = handler.name(),
                    reason = %panic_message(payload.as_ref()),
                    "computation panicked"
                );
                UnitSignal::Fault
            }
        };
        if disposed.is_cancelled() {
            debug!(unit = handler.name(), "response discarded after disposal");
            break;
        }
        if outbound.send(signal).is_err() {
            break;
        }
    }
    debug!(unit = handler.name(), "unit host exiting");
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

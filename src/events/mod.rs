//! Lifecycle events: types and broadcast bus.
//!
//! ## Contents
//! - [`LifecycleKind`], [`LifecycleEvent`] event classification and payload metadata
//! - `Bus` broadcast stream plus direct fan-out to subscriber queues
//!
//! ## Quick reference
//! - **Publishers**: the subscription (spawn/dispose/send), binding listeners
//!   (delivered/faulted/dropped), subscriber workers (overflow/panic, stream only).
//! - **Consumers**: attached subscribers and any receiver obtained from
//!   `Orchestrator::lifecycle()`.

mod bus;
mod event;

pub(crate) use bus::Bus;
pub use event::{LifecycleEvent, LifecycleKind};

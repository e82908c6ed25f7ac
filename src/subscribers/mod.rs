//! # Lifecycle subscribers.
//!
//! - [`Subscribe`] trait for custom handlers
//! - `SubscriberSet` non-blocking fan-out with per-subscriber queues
//! - `LogWriter` built-in `tracing` renderer (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub(crate) use subscriber_set::SubscriberSet;

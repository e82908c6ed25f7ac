//! # Runtime configuration.
//!
//! Provides [`Config`] centralized settings for orchestrators and the units they spawn.
//!
//! Config is used in two ways:
//! 1. **Orchestrator creation**: `Orchestrator::builder(config)`
//! 2. **Unit spawning**: `UnitHandle::spawn(handler, &config)` / `Recipe::from_compute`
//!
//! ## Sentinel values
//! - `stack_size = 0` → platform default stack size for unit threads
//! - `bus_capacity = 0`, `subscriber_capacity = 0` → clamped to 1

/// Global configuration for orchestrators and background units.
///
/// ## Field semantics
/// - `bus_capacity`: Lifecycle event ring buffer size for `Orchestrator::lifecycle` receivers (min 1)
/// - `subscriber_capacity`: Queue length of each subscriber (min 1)
/// - `thread_name`: Name given to each unit's OS thread (visible in debuggers/profilers)
/// - `stack_size`: Unit thread stack size in bytes (`0` = platform default)
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the lifecycle event broadcast channel.
    ///
    /// Receivers that lag behind more than `bus_capacity` messages skip older
    /// items. Minimum value is 1.
    pub bus_capacity: usize,

    /// Per-subscriber queue length.
    ///
    /// When a subscriber's queue is full, new events are dropped for that
    /// subscriber only and a `SubscriberOverflow` event is published.
    pub subscriber_capacity: usize,

    /// Name for background unit threads.
    pub thread_name: String,

    /// Stack size for background unit threads.
    ///
    /// - `0` = platform default
    /// - `n > 0` = `n` bytes
    ///
    /// Deeply recursive computations may need more than the default.
    pub stack_size: usize,
}

impl Config {
    /// Returns the unit thread stack size as an `Option`.
    ///
    /// - `None` → platform default
    /// - `Some(n)` → explicit size in bytes
    #[inline]
    pub fn stack_size(&self) -> Option<usize> {
        if self.stack_size == 0 {
            None
        } else {
            Some(self.stack_size)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a subscriber queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn subscriber_capacity_clamped(&self) -> usize {
        self.subscriber_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `subscriber_capacity = 1024`
    /// - `thread_name = "offload-unit"`
    /// - `stack_size = 0` (platform default)
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            subscriber_capacity: 1024,
            thread_name: "offload-unit".to_string(),
            stack_size: 0,
        }
    }
}

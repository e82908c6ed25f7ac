//! # Orchestrator: runs a computation off the primary context and tracks its state.
//!
//! The [`Orchestrator`] owns one `Subscription` and the lifecycle `Bus` (which in
//! turn feeds any attached subscribers). Callers re-activate it with a recipe and an input;
//! it decides whether to recreate the unit, whether to issue a request, and hands
//! back the current [`RequestState`] snapshot.
//!
//! ## High-level architecture
//! ```text
//! caller (re-render / poll)
//!   └─► Orchestrator::run(&recipe, &input) ──► Subscription::activate
//!                                                 ├─► Recipe::create ─► UnitHandle ─► unit thread
//!                                                 ├─► Listener task (per binding)
//!                                                 │     └─► Guard::dispatch(Resolved/Rejected)
//!                                                 └─► Guard::dispatch(Pending/Stale) + send
//!   ◄── RequestState snapshot (by value)
//!
//! Lifecycle events:
//!   Subscription / Listener ── publish ──► Bus ──┬──► lifecycle() receivers
//!                                                └──► subscriber queues
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use offload::{ComputeFn, Config, Orchestrator, Recipe, Status};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cfg = Config::default();
//!     let recipe = Recipe::from_compute(
//!         ComputeFn::arc("even-sum", |limit: u64| (0..limit).filter(|i| i % 2 == 0).sum::<u64>()),
//!         &cfg,
//!     );
//!     let mut orch = Orchestrator::new(cfg);
//!
//!     let input = Arc::new(10u64);
//!     let first = orch.run(&recipe, &input);
//!     assert_eq!(first.status, Status::Pending);
//!
//!     let mut rx = orch.watch();
//!     let done = rx.wait_for(|s| s.status == Status::Resolved).await.unwrap().clone();
//!     assert_eq!(done.result, Some(20));
//! }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::warn;

use crate::config::Config;
use crate::core::{recipe::Recipe, subscription::Subscription};
use crate::events::{Bus, LifecycleEvent};
use crate::state::RequestState;
use crate::subscribers::Subscribe;

/// Drives one subscription: unit lifecycle, request dispatch, and state snapshots.
///
/// Must be created and activated within a tokio runtime; it spawns one listener
/// task per bound unit and, when subscribers are configured, one worker per subscriber.
///
/// Dropping the orchestrator deactivates it.
pub struct Orchestrator<I, O> {
    subscription: Subscription<I, O>,
    bus: Bus,
}

impl<I, O> Orchestrator<I, O> {
    /// Returns a builder for an orchestrator with subscribers or a seeded state.
    pub fn builder(cfg: Config) -> OrchestratorBuilder<I, O> {
        OrchestratorBuilder::new(cfg)
    }

    /// Creates an orchestrator with no subscribers and an idle initial state.
    pub fn new(cfg: Config) -> Self {
        Self::builder(cfg).build()
    }

    /// Tears the subscription down.
    ///
    /// Severs observers, releases the unit, and flips liveness off. Any response
    /// that arrives afterward is dropped; the last snapshot stays as it was.
    /// Subsequent [`run`](Self::run) calls are no-ops. Idempotent.
    pub fn deactivate(&mut self) {
        self.subscription.deactivate();
    }

    /// True until [`deactivate`](Self::deactivate) (or drop).
    pub fn is_live(&self) -> bool {
        self.subscription.guard().is_live()
    }

    /// Receiver that observes every state transition.
    pub fn watch(&self) -> watch::Receiver<RequestState<O>> {
        self.subscription.guard().subscribe()
    }

    /// Receiver for lifecycle events published after this call.
    pub fn lifecycle(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.bus.subscribe()
    }
}

impl<I, O: Clone> Orchestrator<I, O> {
    /// Current request state, by value.
    pub fn snapshot(&self) -> RequestState<O> {
        self.subscription.guard().snapshot()
    }
}

impl<I, O> Orchestrator<I, O>
where
    I: Serialize + Send + Sync + 'static,
    O: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Activates the subscription with `recipe` and `input` and returns the state.
    ///
    /// - A recipe not [`same`](Recipe::same) as the last one recreates the unit and
    ///   re-sends the input.
    /// - An input not pointer-equal (`Arc::ptr_eq`) to the last one issues a new
    ///   request: `Stale` if the state is resolved, `Pending` otherwise.
    /// - Otherwise nothing happens besides returning the snapshot.
    ///
    /// Unit faults never surface here as errors; they show up as
    /// [`Status::Rejected`](crate::Status::Rejected) in the returned state.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime when a new unit is bound.
    pub fn run(&mut self, recipe: &Recipe<I, O>, input: &Arc<I>) -> RequestState<O> {
        self.subscription.activate(recipe, input);
        self.snapshot()
    }
}

impl<I, O> Drop for Orchestrator<I, O> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder<I, O> {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    initial: RequestState<O>,
    _input: PhantomData<fn(I)>,
}

impl<I, O> OrchestratorBuilder<I, O> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            initial: RequestState::idle(),
            _input: PhantomData,
        }
    }

    /// Sets lifecycle subscribers.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Seeds the state returned before the first response arrives.
    ///
    /// A seed whose `result`/`error` disagree with its `status` is replaced by
    /// [`RequestState::normalized`] at build time.
    pub fn with_initial_state(mut self, initial: RequestState<O>) -> Self {
        self.initial = initial;
        self
    }

    /// Builds the orchestrator.
    ///
    /// Spawns the subscriber workers when subscribers are set, so it must then
    /// run within a tokio runtime.
    pub fn build(self) -> Orchestrator<I, O> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped())
            .with_subscribers(self.subscribers, self.cfg.subscriber_capacity_clamped());

        let initial = if self.initial.is_consistent() {
            self.initial
        } else {
            warn!(
                status = self.initial.status.as_label(),
                "inconsistent initial state, falling back to idle"
            );
            self.initial.normalized()
        };

        Orchestrator {
            subscription: Subscription::new(initial, bus.clone()),
            bus,
        }
    }
}

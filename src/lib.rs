//! # offload
//!
//! **offload** runs a long, CPU-bound computation on an isolated background unit
//! and exposes its progress to the primary (subscription-owning) context through a
//! small request state machine.
//!
//! The caller never manages threads, message formats, or races between
//! overlapping requests: it re-activates an [`Orchestrator`] with a [`Recipe`] and
//! an input, and reads back a [`RequestState`] snapshot.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller ──run(&recipe, &input)──► Orchestrator ──► RequestState { status, result, error }
//!                                        │
//!                ┌───────────────────────┴────────────────────────┐
//!                ▼                                                ▼
//!   ┌───────────────────────────┐                   ┌──────────────────────────┐
//!   │ Subscription              │                   │ Bus (broadcast)          │
//!   │ - Guard (liveness+binding)│──lifecycle evts──►│  └─► SubscriberSet       │
//!   │ - UnitHandle (one live)   │                   │       └─► LogWriter, ... │
//!   │ - last input              │                   └──────────────────────────┘
//!   └──────┬──────────▲─────────┘
//!          │ send     │ Listener: Resolved / Rejected
//!          ▼          │
//!   ┌───────────────────────────┐
//!   │ unit thread (host)        │
//!   │  Entry ─► Compute::compute│
//!   └───────────────────────────┘
//! ```
//!
//! ### Request lifecycle
//! ```text
//! Idle ──input──► Pending ──response──► Resolved ──new input──► Stale ──response──► Resolved
//!                    │                                            │
//!                    └────────────fault──────► Rejected ◄──fault──┘
//!                                                 └──new input──► Pending
//! ```
//!
//! - `Stale` keeps the last resolved value visible while a new request runs.
//! - `Rejected` clears the result and holds a generic [`UnitError`] until the next request.
//! - After [`Orchestrator::deactivate`] no late response can change the state.
//!
//! ## Features
//! | Area              | Description                                                     | Key types                                  |
//! |-------------------|-----------------------------------------------------------------|--------------------------------------------|
//! | **Orchestration** | Unit lifecycle, request dispatch, late-delivery guard.          | [`Orchestrator`], [`Recipe`]               |
//! | **State machine** | Pure reducer over a five-valued status.                         | [`reduce`], [`Event`], [`RequestState`]    |
//! | **Units**         | Computations on isolated threads behind an explicit handle.     | [`Compute`], [`ComputeFn`], [`UnitHandle`] |
//! | **Observability** | Lifecycle events and pluggable subscribers.                     | [`LifecycleEvent`], [`Subscribe`]          |
//! | **Errors**        | Generic unit/message faults surfaced through state.             | [`UnitError`]                              |
//! | **Configuration** | Unit thread and bus settings.                                   | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber rendering lifecycle events via `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use offload::{ComputeFn, Config, Orchestrator, Recipe, Status};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cfg = Config::default();
//!     let recipe = Recipe::from_compute(ComputeFn::arc("len", |s: String| s.len()), &cfg);
//!     let mut orch = Orchestrator::new(cfg);
//!
//!     let state = orch.run(&recipe, &Arc::new("hello".to_string()));
//!     assert_eq!(state.status, Status::Pending);
//!
//!     let mut rx = orch.watch();
//!     let state = rx.wait_for(|s| s.status == Status::Resolved).await.unwrap().clone();
//!     assert_eq!(state.result, Some(5));
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod state;
mod subscribers;
mod unit;

// ---- Public re-exports ----

pub use config::Config;
pub use self::core::{Orchestrator, OrchestratorBuilder, Recipe};
pub use error::{ProtocolError, UnitError};
pub use events::{LifecycleEvent, LifecycleKind};
pub use state::{reduce, Event, RequestState, Status};
pub use subscribers::Subscribe;
pub use unit::{Compute, ComputeFn, ComputeRef, Entry, Handler, Signals, UnitHandle, UnitSignal};

// Optional: expose a built-in `tracing` subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

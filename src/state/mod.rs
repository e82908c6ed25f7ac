//! Request state machine: status, snapshot, and the pure reducer.
//!
//! ## Contents
//! - [`Status`] five-valued request lifecycle position
//! - [`RequestState`] snapshot exposed to callers (`status`, `result`, `error`)
//! - [`Event`] transitions produced by the orchestrator
//! - [`reduce`] `(state, event) -> state`, no side effects
//!
//! ## Quick wiring
//! ```text
//! Orchestrator ──► Event ──► reduce(prev, event) ──► RequestState (snapshot)
//! ```

mod reduce;
mod request;
mod status;

pub use reduce::{reduce, Event};
pub use request::RequestState;
pub use status::Status;

//! # Pure request reducer.
//!
//! Maps `(current state, event) -> next state` with no side effects and no transport
//! knowledge. The transition table is independent of the current status:
//!
//! ```text
//! Event         │ status    result          error
//! ──────────────┼──────────────────────────────────
//! Pending       │ pending   keep previous   absent
//! Stale         │ stale     keep previous   absent
//! Resolved(d)   │ resolved  d               absent
//! Rejected(e)   │ rejected  absent          e
//! ```
//!
//! Choosing between `Pending` and `Stale` is the orchestrator's job, not the reducer's.

use crate::error::UnitError;

use super::{RequestState, Status};

/// State transition produced by the orchestrator.
///
/// The set is closed: every variant is handled by [`reduce`], so there is no
/// "unknown event" path at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<T> {
    /// A request was issued with no resolved value to keep showing.
    Pending,
    /// A request was issued while a resolved value exists; keep showing it.
    Stale,
    /// The unit answered.
    Resolved(T),
    /// The unit (or the channel) faulted.
    Rejected(UnitError),
}

impl<T> Event<T> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Event::Pending => "pending",
            Event::Stale => "stale",
            Event::Resolved(_) => "resolved",
            Event::Rejected(_) => "rejected",
        }
    }
}

/// Applies `event` to `state` and returns the next state.
pub fn reduce<T>(state: RequestState<T>, event: Event<T>) -> RequestState<T> {
    match event {
        Event::Pending => RequestState {
            status: Status::Pending,
            result: state.result,
            error: None,
        },
        Event::Stale => RequestState {
            status: Status::Stale,
            result: state.result,
            error: None,
        },
        Event::Resolved(data) => RequestState {
            status: Status::Resolved,
            result: Some(data),
            error: None,
        },
        Event::Rejected(error) => RequestState {
            status: Status::Rejected,
            result: None,
            error: Some(error),
        },
    }
}

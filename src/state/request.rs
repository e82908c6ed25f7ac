//! # Request state snapshot.

use crate::error::UnitError;

use super::Status;

/// Snapshot of one subscription's request lifecycle.
///
/// ### Invariants
/// - `result` is cleared only on [`Status::Rejected`]; it survives `Pending`/`Stale`
///   so the last good value stays renderable while a new request runs.
/// - `error` is present only on [`Status::Rejected`].
///
/// Callers receive this by value; it is never shared with the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    /// Current lifecycle position.
    pub status: Status,
    /// Last resolved value, if any.
    pub result: Option<T>,
    /// Fault that rejected the latest request.
    pub error: Option<UnitError>,
}

impl<T> RequestState<T> {
    /// Idle state with no result and no error.
    pub fn idle() -> Self {
        Self {
            status: Status::Idle,
            result: None,
            error: None,
        }
    }

    /// Idle state seeded with a known value (e.g. restored from a cache).
    pub fn with_result(result: T) -> Self {
        Self {
            status: Status::Idle,
            result: Some(result),
            error: None,
        }
    }

    /// True if `status` and the presence of `result`/`error` agree.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            Status::Rejected => self.result.is_none() && self.error.is_some(),
            Status::Resolved => self.result.is_some() && self.error.is_none(),
            Status::Idle | Status::Pending | Status::Stale => self.error.is_none(),
        }
    }
}

impl<T> RequestState<T> {
    /// Returns `self` if consistent, otherwise an idle state keeping only the result.
    ///
    /// A rejected state's result is dropped as well, since rejection clears it.
    pub fn normalized(self) -> Self {
        if self.is_consistent() {
            return self;
        }
        let result = match self.status {
            Status::Rejected => None,
            _ => self.result,
        };
        Self {
            status: Status::Idle,
            result,
            error: None,
        }
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

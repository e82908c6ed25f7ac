//! # Request lifecycle status.

/// Where a request sits in its lifecycle.
///
/// Exactly one status is current at any time:
/// ```text
/// Idle ──► Pending ──► Resolved ──► Stale ──► Resolved ...
///             │                      │
///             └──────► Rejected ◄────┘ ──► Pending ...
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// No request has been issued yet.
    #[default]
    Idle,
    /// A request is in flight and no resolved value exists for it.
    Pending,
    /// A request is in flight while a previously resolved value is retained.
    Stale,
    /// The latest delivered response resolved successfully.
    Resolved,
    /// The unit faulted; terminal until the next request.
    Rejected,
}

impl Status {
    /// All statuses, in declaration order.
    pub const ALL: [Status; 5] = [
        Status::Idle,
        Status::Pending,
        Status::Stale,
        Status::Resolved,
        Status::Rejected,
    ];

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Pending => "pending",
            Status::Stale => "stale",
            Status::Resolved => "resolved",
            Status::Rejected => "rejected",
        }
    }
}

//! Error types surfaced by background units and the message protocol.
//!
//! This module defines two error enums:
//!
//! - [`UnitError`]: what a caller observes in [`RequestState::error`](crate::RequestState).
//! - [`ProtocolError`]: internal encode/decode failures of the message codec.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! The causes behind a unit or message fault are intentionally not carried in
//! [`UnitError`]; the host logs them where they happen.

use thiserror::Error;

/// # Errors observed by the caller of an orchestrator.
///
/// These are runtime faults of a background unit. They never propagate into the
/// caller's control flow; the orchestrator converts them into a `Rejected` state.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// The computation panicked inside the unit (host-level fault).
    #[error("unit fault")]
    UnitFault,

    /// A message crossing the channel could not be encoded or decoded.
    #[error("message fault")]
    MessageFault,

    /// The host refused to start the unit's execution context.
    #[error("failed to spawn unit: {error}")]
    Spawn {
        /// The underlying OS error message.
        error: String,
    },
}

impl UnitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use offload::UnitError;
    ///
    /// assert_eq!(UnitError::UnitFault.as_label(), "unit_fault");
    /// assert_eq!(UnitError::MessageFault.as_label(), "message_fault");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitError::UnitFault => "unit_fault",
            UnitError::MessageFault => "message_fault",
            UnitError::Spawn { .. } => "unit_spawn_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            UnitError::UnitFault => "unit fault".to_string(),
            UnitError::MessageFault => "message fault".to_string(),
            UnitError::Spawn { error } => format!("spawn: {error}"),
        }
    }
}

/// # Codec failures of the request/response protocol.
///
/// Internal to the crate: each variant collapses into [`UnitError::MessageFault`]
/// at the orchestrator boundary.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Payload could not be serialized.
    #[error("encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Bytes could not be deserialized into the expected payload type.
    #[error("decode failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

impl ProtocolError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProtocolError::Encode(_) => "protocol_encode",
            ProtocolError::Decode(_) => "protocol_decode",
        }
    }
}

impl From<ProtocolError> for UnitError {
    fn from(_: ProtocolError) -> Self {
        UnitError::MessageFault
    }
}

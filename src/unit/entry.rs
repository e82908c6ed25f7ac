//! # Unit entry: the inbound-message handler.
//!
//! [`Entry`] adapts a [`Compute`] to the byte-level [`Handler`] contract the host
//! expects: one inbound message in, exactly one outbound message out.
//!
//! ## Rules
//! - Stateless between messages.
//! - Decode failures are returned as [`ProtocolError`] (the host reports a message fault).
//! - Panics from the computation are **not** caught here; they unwind into the host.
//! - A host runs exactly one handler, fixed when the unit is spawned.

use std::sync::Arc;

use crate::error::ProtocolError;
use crate::unit::{protocol, Compute};

/// Byte-level message handler installed on a unit host.
///
/// Type-erased so a host can run any computation; the typed view lives on
/// [`UnitHandle`](crate::UnitHandle).
pub trait Handler: Send + Sync + 'static {
    /// Name of the wrapped computation.
    fn name(&self) -> &str;

    /// Handles one request envelope and returns the encoded response envelope.
    fn on_message(&self, request: &[u8]) -> Result<Vec<u8>, ProtocolError>;
}

/// Wraps a [`Compute`] so it can run inside a unit host.
pub struct Entry<C> {
    compute: Arc<C>,
}

impl<C: Compute> Entry<C> {
    /// Creates an entry for `compute`.
    pub fn new(compute: Arc<C>) -> Self {
        Self { compute }
    }

    /// Creates the entry and returns it as a host-ready handler.
    pub fn handler(compute: Arc<C>) -> Arc<dyn Handler> {
        Arc::new(Self::new(compute))
    }
}

impl<C: Compute> Handler for Entry<C> {
    fn name(&self) -> &str {
        self.compute.name()
    }

    fn on_message(&self, request: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let input: C::Input = protocol::decode(request)?;
        let output = self.compute.compute(input);
        protocol::encode(&output)
    }
}

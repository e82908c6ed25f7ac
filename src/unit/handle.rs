//! # Unit handle: the explicit resource for one live background unit.
//!
//! [`UnitHandle`] replaces an ambient "install a callback on the host" slot with an
//! owned object:
//! - [`UnitHandle::send`] pushes one request,
//! - [`UnitHandle::observe`] hands out the response/fault stream ([`Signals`]),
//! - [`UnitHandle::dispose`] releases the unit.
//!
//! ## Typing
//! `I`/`O` are a typed view over a byte channel. Nothing checks at runtime that
//! they match the handler's computation; a mismatch surfaces as
//! [`UnitError::MessageFault`]. Payload shape is the caller's responsibility.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::UnitError;
use crate::unit::{host, protocol, Compute, Entry, Handler};

/// Raw signal emitted by a unit host.
#[derive(Debug)]
pub enum UnitSignal {
    /// Encoded response envelope.
    Message(Vec<u8>),
    /// The computation panicked.
    Fault,
    /// An inbound request could not be decoded.
    MessageFault,
}

/// Owned handle to one live background unit.
///
/// Exclusively owned by one subscription. Dropping the handle disposes the unit.
pub struct UnitHandle<I, O> {
    name: Arc<str>,
    inbound: Option<mpsc::UnboundedSender<Vec<u8>>>,
    signals: Option<mpsc::UnboundedReceiver<UnitSignal>>,
    disposed: CancellationToken,
    _io: PhantomData<fn(I) -> O>,
}

impl<I, O> UnitHandle<I, O> {
    /// Spawns a unit running `handler`.
    ///
    /// Returns [`UnitError::Spawn`] if the OS refuses to start the unit thread.
    pub fn spawn(handler: Arc<dyn Handler>, cfg: &Config) -> Result<Self, UnitError> {
        let name: Arc<str> = Arc::from(handler.name());
        let channels = host::spawn(handler, cfg).map_err(|e| UnitError::Spawn {
            error: e.to_string(),
        })?;

        Ok(Self {
            name,
            inbound: Some(channels.inbound),
            signals: Some(channels.outbound),
            disposed: channels.disposed,
            _io: PhantomData,
        })
    }

    /// Spawns a unit running `compute` through its [`Entry`].
    pub fn from_compute<C>(compute: Arc<C>, cfg: &Config) -> Result<Self, UnitError>
    where
        C: Compute<Input = I, Output = O>,
    {
        Self::spawn(Entry::handler(compute), cfg)
    }

    /// Name of the computation running in this unit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Takes the signal stream.
    ///
    /// Returns `None` if it was already taken: a unit has exactly one observer.
    pub fn observe(&mut self) -> Option<Signals<O>> {
        self.signals.take().map(|rx| Signals {
            rx,
            _out: PhantomData,
        })
    }

    /// Releases the unit.
    ///
    /// Requests still queued are never computed. A computation already running
    /// finishes, its response is discarded, and the host exits.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.disposed.cancel();
        self.inbound.take();
        self.signals.take();
    }
}

impl<I, O> UnitHandle<I, O>
where
    I: Serialize,
{
    /// Sends one request.
    ///
    /// Never blocks. Requests are delivered to the computation in send order.
    ///
    /// ### Errors
    /// - [`UnitError::MessageFault`] if `input` cannot be encoded.
    /// - [`UnitError::UnitFault`] if the unit is disposed or its host has exited.
    pub fn send(&self, input: &I) -> Result<(), UnitError> {
        let inbound = self.inbound.as_ref().ok_or(UnitError::UnitFault)?;
        let bytes = protocol::encode(input)?;
        inbound.send(bytes).map_err(|_| UnitError::UnitFault)
    }
}

impl<I, O> Drop for UnitHandle<I, O> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Typed stream of outcomes from one unit.
pub struct Signals<O> {
    rx: mpsc::UnboundedReceiver<UnitSignal>,
    _out: PhantomData<fn() -> O>,
}

impl<O: DeserializeOwned> Signals<O> {
    /// Waits for the next outcome.
    ///
    /// Returns `None` once the unit has exited and every pending signal was read.
    pub async fn recv(&mut self) -> Option<Result<O, UnitError>> {
        let signal = self.rx.recv().await?;
        Some(Self::decode(signal))
    }

    fn decode(signal: UnitSignal) -> Result<O, UnitError> {
        match signal {
            UnitSignal::Message(bytes) => protocol::decode(&bytes).map_err(|e| {
                tracing::debug!(error = %e, "response could not be decoded");
                UnitError::from(e)
            }),
            UnitSignal::Fault => Err(UnitError::UnitFault),
            UnitSignal::MessageFault => Err(UnitError::MessageFault),
        }
    }
}

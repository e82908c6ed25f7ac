//! Background units: computations, their entry handler, and the isolated host.
//!
//! This module provides the unit-side half of the system:
//! - [`Compute`] - trait for a pure `Input -> Output` transformation
//! - [`ComputeFn`] - closure-backed computation, [`ComputeRef`] its shared handle
//! - [`Entry`] - the single inbound-message handler installed on a unit
//! - [`UnitHandle`] - explicit resource for one live unit (`send`, `observe`, `dispose`)
//!
//! ## Architecture
//! ```text
//! primary context                         unit thread (one per handle)
//! ───────────────                         ────────────────────────────
//! UnitHandle::send(&I)
//!   └─► encode {payload} ──[inbound]──►   host loop (sequential)
//!                                           └─► Entry::on_message(bytes)
//!                                                 ├─► decode {payload: I}
//!                                                 ├─► Compute::compute(I)
//!                                                 └─► encode {payload: O}
//! Signals::recv()  ◄──────[outbound]──    UnitSignal::{Message, Fault, MessageFault}
//!   └─► Ok(O) / Err(UnitError)
//! ```

mod compute;
mod entry;
mod handle;
mod host;
mod protocol;

pub use compute::{Compute, ComputeFn, ComputeRef};
pub use entry::{Entry, Handler};
pub use handle::{Signals, UnitHandle, UnitSignal};

pub(crate) use host::panic_message;

//! Orchestration core: subscription scope and unit lifecycle.
//!
//! The only public API from this module is [`Orchestrator`] (with its builder) and
//! [`Recipe`].
//!
//! Internal modules:
//! - [`orchestrator`]: public facade, builder, subscriber forwarding;
//! - [`subscription`]: bind/rebind/release units, request dispatch;
//! - [`listener`]: per-binding observer task turning unit outcomes into events;
//! - [`guard`]: liveness flag + binding number gating every state mutation;
//! - [`recipe`]: identity-compared unit factory.

mod guard;
mod listener;
mod orchestrator;
mod recipe;
mod subscription;

pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use recipe::Recipe;

//! # Subscription: the lifetime scope bound to one orchestrator call site.
//!
//! Owns the current unit binding, the last input sent, and the [`Guard`] carrying
//! the liveness flag.
//!
//! ## Activation
//! ```text
//! activate(recipe, input)
//!   ├─► torn down?            → no-op
//!   ├─► recipe identity new?  → release old binding → bind (spawn + listener)
//!   │                           (forget last input: the new unit needs it again)
//!   └─► input identity new?   → dispatch Pending (status != Resolved) or Stale
//!                               → send input
//! ```
//!
//! ## Teardown
//! ```text
//! guard.rebind() / guard.teardown()   (sever: old observers can no longer dispatch)
//!   └─► cancel listener → dispose handle → UnitDisposed
//! ```
//!
//! ## Rules
//! - At most one live unit per subscription.
//! - Liveness flips once; there is no reactivation after teardown.
//! - A computation already running is never interrupted; its response is discarded.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::{guard::Guard, listener::Listener, recipe::Recipe};
use crate::error::UnitError;
use crate::events::{Bus, LifecycleEvent, LifecycleKind};
use crate::state::{Event, RequestState, Status};
use crate::unit::UnitHandle;

/// Unit handle bound to a subscription plus the token stopping its listener.
struct LiveUnit<I, O> {
    handle: UnitHandle<I, O>,
    cancel: CancellationToken,
}

/// Result of calling a recipe, remembered together with its identity.
struct Binding<I, O> {
    recipe: Recipe<I, O>,
    id: u64,
    unit: Result<LiveUnit<I, O>, UnitError>,
}

pub(crate) struct Subscription<I, O> {
    guard: Arc<Guard<O>>,
    bus: Bus,
    binding: Option<Binding<I, O>>,
    last_input: Option<Arc<I>>,
}

impl<I, O> Subscription<I, O> {
    pub fn new(initial: RequestState<O>, bus: Bus) -> Self {
        Self {
            guard: Guard::new(initial),
            bus,
            binding: None,
            last_input: None,
        }
    }

    pub fn guard(&self) -> &Arc<Guard<O>> {
        &self.guard
    }

    /// Tears the subscription down. Idempotent.
    pub fn deactivate(&mut self) {
        if self.guard.teardown() {
            self.release();
            self.last_input = None;
        }
    }

    /// Releases the current binding, if any. Callers sever it in the guard first.
    fn release(&mut self) {
        let Some(binding) = self.binding.take() else {
            return;
        };
        if let Ok(live) = binding.unit {
            live.cancel.cancel();
            let unit = Arc::<str>::from(live.handle.name());
            live.handle.dispose();
            self.bus.publish(
                LifecycleEvent::new(LifecycleKind::UnitDisposed)
                    .with_unit(unit)
                    .with_binding(binding.id),
            );
        }
    }
}

impl<I, O> Subscription<I, O>
where
    I: Serialize + Send + Sync + 'static,
    O: DeserializeOwned + Send + Sync + 'static,
{
    pub fn activate(&mut self, recipe: &Recipe<I, O>, input: &Arc<I>) {
        if !self.guard.is_live() {
            debug!("activation after teardown ignored");
            return;
        }

        let recipe_changed = self
            .binding
            .as_ref()
            .map_or(true, |b| !b.recipe.same(recipe));
        if recipe_changed {
            self.bind(recipe);
            self.last_input = None;
        }

        let input_changed = self
            .last_input
            .as_ref()
            .map_or(true, |prev| !Arc::ptr_eq(prev, input));
        if input_changed {
            self.request(input);
            self.last_input = Some(Arc::clone(input));
        }
    }

    fn bind(&mut self, recipe: &Recipe<I, O>) {
        let id = self.guard.rebind();
        self.release();

        let unit = recipe.create().map(|mut handle| {
            let cancel = CancellationToken::new();
            let name: Arc<str> = Arc::from(handle.name());
            if let Some(signals) = handle.observe() {
                let listener = Listener {
                    guard: Arc::clone(&self.guard),
                    bus: self.bus.clone(),
                    unit: Arc::clone(&name),
                    binding: id,
                    signals,
                };
                tokio::spawn(listener.run(cancel.clone()));
            }
            self.bus.publish(
                LifecycleEvent::new(LifecycleKind::UnitSpawned)
                    .with_unit(name)
                    .with_binding(id),
            );
            LiveUnit { handle, cancel }
        });

        if let Err(e) = &unit {
            self.bus.publish(
                LifecycleEvent::new(LifecycleKind::UnitSpawnFailed)
                    .with_binding(id)
                    .with_reason(e.as_message()),
            );
        }

        self.binding = Some(Binding {
            recipe: recipe.clone(),
            id,
            unit,
        });
    }

    fn request(&mut self, input: &Arc<I>) {
        let Some(binding) = &self.binding else {
            return;
        };
        let id = binding.id;

        let status = self.guard.dispatch_with(id, |state| {
            if state.status == Status::Resolved {
                Event::Stale
            } else {
                Event::Pending
            }
        });

        let sent = match &binding.unit {
            Ok(live) => live.handle.send(input).map(|()| live.handle.name()),
            Err(e) => Err(e.clone()),
        };
        match sent {
            Ok(unit) => {
                let mut ev = LifecycleEvent::new(LifecycleKind::RequestSent)
                    .with_unit(unit)
                    .with_binding(id);
                if let Some(status) = status {
                    ev = ev.with_status(status);
                }
                self.bus.publish(ev);
            }
            Err(e) => {
                debug!(binding = id, error = %e, "request could not be sent");
                let kind = match e {
                    UnitError::MessageFault => LifecycleKind::MessageFaulted,
                    _ => LifecycleKind::UnitFaulted,
                };
                self.bus.publish(
                    LifecycleEvent::new(kind)
                        .with_binding(id)
                        .with_reason(e.as_message()),
                );
                self.guard.dispatch(id, Event::Rejected(e));
            }
        }
    }
}

//! # Unit creation recipe.
//!
//! A [`Recipe`] is the zero-argument factory an orchestrator calls to obtain a
//! fresh [`UnitHandle`]. Its **identity** decides whether a re-activation reuses
//! the current unit or tears it down and creates a new one:
//!
//! ```text
//! run(&recipe_a, ..)  ──► spawn unit #1
//! run(&recipe_a, ..)  ──► reuse unit #1            (same Arc)
//! run(&recipe_a2, ..) ──► dispose #1, spawn #2     (clone of recipe_a is still "same")
//! run(&recipe_b, ..)  ──► dispose #2, spawn #3     (different Recipe::new call)
//! ```
//!
//! Keep one `Recipe` value alive across re-activations unless a genuine recreation
//! is intended. Cloning preserves identity.

use std::sync::Arc;

use crate::config::Config;
use crate::error::UnitError;
use crate::unit::{Compute, UnitHandle};

type Factory<I, O> = dyn Fn() -> Result<UnitHandle<I, O>, UnitError> + Send + Sync;

/// Identity-compared factory for background units.
pub struct Recipe<I, O> {
    factory: Arc<Factory<I, O>>,
}

impl<I, O> Clone for Recipe<I, O> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<I: 'static, O: 'static> Recipe<I, O> {
    /// Wraps an arbitrary factory.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<UnitHandle<I, O>, UnitError> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Recipe that spawns `compute` on a dedicated unit thread configured by `cfg`.
    ///
    /// ## Example
    /// ```rust
    /// use offload::{ComputeFn, Config, Recipe};
    ///
    /// let recipe = Recipe::from_compute(ComputeFn::arc("double", |n: u32| n * 2), &Config::default());
    /// assert!(recipe.same(&recipe.clone()));
    /// ```
    pub fn from_compute<C>(compute: Arc<C>, cfg: &Config) -> Self
    where
        C: Compute<Input = I, Output = O>,
    {
        let cfg = cfg.clone();
        Self::new(move || UnitHandle::from_compute(Arc::clone(&compute), &cfg))
    }
}

impl<I, O> Recipe<I, O> {
    /// True if both values come from the same construction.
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.factory, &other.factory)
    }

    pub(crate) fn create(&self) -> Result<UnitHandle<I, O>, UnitError> {
        (self.factory)()
    }
}

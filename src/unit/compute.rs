//! # Computation abstraction and closure-backed implementation.
//!
//! A [`Compute`] is the caller-supplied pure transformation run inside a
//! background unit. It must be deterministic in its input and keep no state
//! between calls; the unit may be recreated at any time.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

/// # Pure `Input -> Output` transformation.
///
/// Runs synchronously on the unit's own thread, so blocking or CPU-heavy work is fine.
/// A panic is not caught by the computation's wrapper; the host reports it as a
/// unit fault.
///
/// # Example
/// ```
/// use offload::Compute;
///
/// struct Square;
///
/// impl Compute for Square {
///     type Input = u64;
///     type Output = u64;
///
///     fn name(&self) -> &str { "square" }
///
///     fn compute(&self, input: u64) -> u64 {
///         input * input
///     }
/// }
/// ```
pub trait Compute: Send + Sync + 'static {
    /// Request payload, decoded inside the unit.
    type Input: DeserializeOwned + Send + 'static;
    /// Response payload, encoded inside the unit.
    type Output: Serialize + Send + 'static;

    /// Returns a stable, human-readable name (used in logs and lifecycle events).
    fn name(&self) -> &str;

    /// Computes the response for one request.
    fn compute(&self, input: Self::Input) -> Self::Output;
}

/// Shared handle to a computation.
pub type ComputeRef<C> = Arc<C>;

/// Closure-backed computation.
///
/// ## Example
/// ```rust
/// use offload::{Compute, ComputeFn};
///
/// let double = ComputeFn::arc("double", |n: u32| n * 2);
/// assert_eq!(double.name(), "double");
/// assert_eq!(double.compute(21), 42);
/// ```
pub struct ComputeFn<F, I, O> {
    name: Cow<'static, str>,
    f: F,
    _io: PhantomData<fn(I) -> O>,
}

impl<F, I, O> ComputeFn<F, I, O>
where
    F: Fn(I) -> O,
{
    /// Creates a new closure-backed computation.
    ///
    /// Prefer [`ComputeFn::arc`] when you immediately need a [`ComputeRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _io: PhantomData,
        }
    }

    /// Creates the computation and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> ComputeRef<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, I, O> Compute for ComputeFn<F, I, O>
where
    F: Fn(I) -> O + Send + Sync + 'static, // Fn, not FnMut
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, input: I) -> O {
        (self.f)(input)
    }
}

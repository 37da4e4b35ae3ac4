//! `Resume<A, R, H>`: a continuation handle with a statically known signature.
//!
//! `A` is the argument handed to the target and `R` is the value the run
//! produces. The handle encoding `H` is either [`Continuation`] or
//! [`TrackedContinuation`]. Nothing here inspects payloads; the generic
//! parameters pick the matching `Transfer` conversions at compile time.

use std::marker::PhantomData;

use crate::exec::continuation::Continuation;
use crate::exec::tracked::TrackedContinuation;
use crate::exec::trampoline::Trampoline;
use crate::transfer::{Transfer, TransferValue};

/// A continuation handle encoding that can be driven.
pub trait Handle {
    /// Returns `true` if invoking the handle is permitted.
    fn is_valid(&self) -> bool;

    /// Transfer control with a type-erased payload and drive to the end.
    fn invoke_erased(&mut self, trampoline: &Trampoline, value: TransferValue) -> TransferValue;
}

impl Handle for Continuation {
    fn is_valid(&self) -> bool {
        Continuation::is_valid(self)
    }

    fn invoke_erased(&mut self, trampoline: &Trampoline, value: TransferValue) -> TransferValue {
        self.invoke_on(trampoline, value)
    }
}

impl Handle for TrackedContinuation {
    fn is_valid(&self) -> bool {
        TrackedContinuation::is_valid(self)
    }

    fn invoke_erased(&mut self, trampoline: &Trampoline, value: TransferValue) -> TransferValue {
        self.invoke_on(trampoline, value)
    }
}

/// A typed continuation handle: `invoke(A) -> R`.
pub struct Resume<A, R, H = Continuation> {
    handle: H,
    signature: PhantomData<fn(A) -> R>,
}

impl<A: Transfer, R: Transfer, H: Handle> Resume<A, R, H> {
    /// Wrap a handle whose target consumes `A` and produces `R`.
    ///
    /// The caller asserts the signature. Handles obtained from
    /// [`crate::coroutine::Coroutine::detach`] carry the coroutine's own
    /// signature.
    #[must_use]
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            signature: PhantomData,
        }
    }

    /// Returns `true` if invoking the handle is permitted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// Invoke on a default trampoline.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the handle is invalid.
    pub fn invoke(&mut self, arg: A) -> R {
        self.invoke_on(&Trampoline::new(), arg)
    }

    /// Invoke on the given trampoline.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the handle is invalid.
    pub fn invoke_on(&mut self, trampoline: &Trampoline, arg: A) -> R {
        R::from_transfer(self.handle.invoke_erased(trampoline, arg.into_transfer()))
    }

    /// The underlying handle.
    #[must_use]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Unwrap into the underlying handle.
    #[must_use]
    pub fn into_inner(self) -> H {
        self.handle
    }
}

impl<R: Transfer, H: Handle> Resume<(), R, H> {
    /// Invoke a handle whose target consumes nothing.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the handle is invalid.
    pub fn resume(&mut self) -> R {
        self.invoke(())
    }
}

impl<A, R, H: std::fmt::Debug> std::fmt::Debug for Resume<A, R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resume")
            .field("signature", &std::any::type_name::<fn(A) -> R>())
            .field("handle", &self.handle)
            .finish()
    }
}

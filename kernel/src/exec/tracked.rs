//! `TrackedContinuation`: the self-describing continuation handle.
//!
//! Invoking a tracked handle does not start at its target. It starts at a
//! private detour unit which
//!
//! 1. records who is calling ("return address") and dispatches onward to the
//!    named target, then
//! 2. when control is handed back to it, rebinds the named target to whoever
//!    handed control back and forwards the value to the recorded caller.
//!
//! The binding lives inside the detour, not in the handle's memory, so the
//! handle can be moved anywhere (into a struct, a collection, another
//! coroutine's body) and still be resumed validly. A coroutine body can also
//! transfer through it symmetrically; the detour does its own bookkeeping, so
//! the body has nothing to re-derive when control comes back.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{fatal, UsageViolation};
use crate::exec::continuation::Continuation;
use crate::exec::trampoline::Trampoline;
use crate::exec::unit::{ExecutionUnit, Incoming, Outgoing, Target, UnitRef};
use crate::transfer::TransferValue;

#[derive(Debug, Default)]
struct DetourState {
    /// Where the next outbound dispatch goes.
    target: Continuation,
    /// Set while a dispatch is out: where to forward the value coming back.
    return_to: Option<Target>,
}

#[derive(Debug, Default)]
struct Detour {
    state: RefCell<DetourState>,
}

impl ExecutionUnit for Detour {
    fn step(&self, incoming: Incoming) -> Outgoing {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            fatal(UsageViolation::Reentered)
        };
        let Incoming { value, origin } = incoming;

        if let Some(return_to) = state.return_to.take() {
            // Inbound: whoever handed control back is the new binding.
            tracing::debug!(caller_is_driver = return_to.is_driver(), "detour inbound");
            state.target.rebind(origin);
            return Outgoing {
                value,
                next: return_to,
            };
        }

        let next = state.target.release();
        tracing::debug!(target_is_driver = next.is_driver(), "detour outbound");
        // The driver never hands control back through us, so there is nothing
        // to wait for in that case.
        if !next.is_driver() {
            state.return_to = Some(origin);
        }
        Outgoing { value, next }
    }
}

/// A movable continuation handle that tracks its own binding.
#[derive(Debug)]
pub struct TrackedContinuation {
    detour: Rc<Detour>,
}

impl TrackedContinuation {
    /// Adopt a raw handle. The raw handle's target moves into the detour.
    #[must_use]
    pub fn new(handle: Continuation) -> Self {
        Self {
            detour: Rc::new(Detour {
                state: RefCell::new(DetourState {
                    target: handle,
                    return_to: None,
                }),
            }),
        }
    }

    /// Returns `true` if the handle names a target and no transfer is out.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.detour
            .state
            .try_borrow()
            .is_ok_and(|s| s.target.is_valid() && s.return_to.is_none())
    }

    /// Returns `true` while a transfer through this handle has not come back.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        !self
            .detour
            .state
            .try_borrow()
            .is_ok_and(|s| s.return_to.is_none())
    }

    /// Returns `true` if the current binding names `unit`.
    #[must_use]
    pub fn names(&self, unit: &UnitRef) -> bool {
        self.detour
            .state
            .try_borrow()
            .is_ok_and(|s| s.target.names(unit))
    }

    /// The detour unit. Transferring control here dispatches to the binding.
    pub(crate) fn unit(&self) -> UnitRef {
        UnitRef::new(&self.detour)
    }

    /// Transfer control through the handle on a default trampoline.
    ///
    /// # Panics
    ///
    /// See [`TrackedContinuation::invoke_on`].
    pub fn invoke(&mut self, value: TransferValue) -> TransferValue {
        self.invoke_on(&Trampoline::new(), value)
    }

    /// Transfer control through the handle and drive the trampoline to the end.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if a transfer through the handle is already out
    /// or the handle is invalid.
    pub fn invoke_on(&mut self, trampoline: &Trampoline, value: TransferValue) -> TransferValue {
        self.ensure_idle();
        trampoline.run(Target::Unit(self.unit()), value).value
    }

    /// Move the binding back out into a raw handle.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if a transfer through the handle is still out.
    #[must_use]
    pub fn into_continuation(self) -> Continuation {
        if self.is_in_flight() {
            fatal(UsageViolation::DetourInFlight);
        }
        let mut state = self.detour.state.borrow_mut();
        state.target.take()
    }

    #[track_caller]
    pub(crate) fn ensure_idle(&self) {
        if self.is_in_flight() {
            fatal(UsageViolation::DetourInFlight);
        }
        if !self.is_valid() {
            fatal(UsageViolation::InvalidContinuation);
        }
    }
}

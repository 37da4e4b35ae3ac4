//! `Continuation`: the raw, move-only continuation handle.
//!
//! A handle is either valid (it names a target: a unit or the driver) or
//! invalid (consumed and not yet rebound). Releasing or invoking a handle
//! consumes its target; the owner re-derives it afterwards with
//! [`Continuation::rebind`]. Coroutines use this encoding for their self and
//! caller handles.
//!
//! The type is deliberately not `Clone`: the right to transfer control to a
//! target is held by exactly one handle at a time.

use crate::error::{fatal, UsageViolation};
use crate::exec::trampoline::Trampoline;
use crate::exec::unit::{Target, UnitRef};
use crate::transfer::TransferValue;

/// A single-target, consume-on-use continuation handle.
#[derive(Debug, Default)]
pub struct Continuation {
    target: Option<Target>,
}

impl Continuation {
    /// A valid handle naming `target`.
    #[must_use]
    pub fn new(target: Target) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// An invalid handle.
    #[must_use]
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Returns `true` unless the handle has been consumed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.target.is_some()
    }

    /// The named target, without consuming it.
    #[must_use]
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Returns `true` if the handle is valid and names `unit`.
    #[must_use]
    pub fn names(&self, unit: &UnitRef) -> bool {
        self.target.as_ref().is_some_and(|t| t.names(unit))
    }

    /// Consume the handle, returning its target. The handle becomes invalid.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the handle is already invalid.
    #[track_caller]
    pub fn release(&mut self) -> Target {
        self.target
            .take()
            .unwrap_or_else(|| fatal(UsageViolation::InvalidContinuation))
    }

    /// Point the handle at `target`, making it valid.
    pub fn rebind(&mut self, target: Target) {
        self.target = Some(target);
    }

    /// Move-assignment: move this handle's target into a new handle.
    ///
    /// `self` becomes invalid; an invalid source produces an invalid result.
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Transfer control to the target with `value` on a default trampoline.
    ///
    /// See [`Continuation::invoke_on`].
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the handle is invalid or names the driver.
    pub fn invoke(&mut self, value: TransferValue) -> TransferValue {
        self.invoke_on(&Trampoline::new(), value)
    }

    /// Transfer control to the target and drive the trampoline to the end.
    ///
    /// The target is consumed for the duration of the run and the handle is
    /// then rebound to whichever unit ran last.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the handle is invalid or names the driver,
    /// plus anything the trampoline itself rejects.
    pub fn invoke_on(&mut self, trampoline: &Trampoline, value: TransferValue) -> TransferValue {
        let start = self.release();
        let landing = trampoline.run(start, value);
        self.rebind(landing.last);
        landing.value
    }
}

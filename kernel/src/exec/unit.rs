//! The execution-unit abstraction and the references that name units.
//!
//! An execution unit performs one step: it receives an incoming
//! (value, origin) pair and produces an outgoing (value, next target) pair.
//! It never calls the next unit itself; the trampoline does.

use std::rc::{Rc, Weak};

use crate::transfer::TransferValue;

/// A step of work that can hand control elsewhere.
///
/// Units use interior mutability for their own state. A unit must not step
/// any other unit from inside `step`; it returns the next target instead.
pub trait ExecutionUnit {
    /// Execute one step.
    fn step(&self, incoming: Incoming) -> Outgoing;
}

/// A non-owning reference to an execution unit.
///
/// Units are owned by whatever embeds them (a coroutine handle, a tracked
/// continuation). The trampoline and every continuation only hold these weak
/// references, so no ownership cycle forms between coroutines that name each
/// other.
///
/// Not `Clone`: a reference handed out by the engine is the right to transfer
/// control to that unit, and there is exactly one of it.
pub struct UnitRef(Weak<dyn ExecutionUnit>);

impl UnitRef {
    /// Reference a unit owned by `unit`.
    #[must_use]
    pub fn new<U: ExecutionUnit + 'static>(unit: &Rc<U>) -> Self {
        let weak: Weak<U> = Rc::downgrade(unit);
        Self(weak)
    }

    /// A second reference to the same unit, for engine bookkeeping only.
    pub(crate) fn duplicate(&self) -> Self {
        Self(Weak::clone(&self.0))
    }

    /// Returns `true` if both references name the same unit.
    #[must_use]
    pub fn same_unit(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }

    /// Returns `true` while the unit's owner is alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }

    pub(crate) fn upgrade(&self) -> Option<Rc<dyn ExecutionUnit>> {
        self.0.upgrade()
    }
}

impl std::fmt::Debug for UnitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UnitRef({:p})", self.0.as_ptr().cast::<()>())
    }
}

/// Where control goes next.
#[derive(Debug)]
pub enum Target {
    /// Return to whoever is driving the trampoline (the null target).
    Driver,
    /// Step this unit next.
    Unit(UnitRef),
}

impl Target {
    /// Returns `true` for the driver (null) target.
    #[must_use]
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver)
    }

    /// The named unit, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&UnitRef> {
        match self {
            Self::Driver => None,
            Self::Unit(unit) => Some(unit),
        }
    }

    /// Returns `true` if this target is `unit`.
    #[must_use]
    pub fn names(&self, unit: &UnitRef) -> bool {
        matches!(self, Self::Unit(named) if named.same_unit(unit))
    }

    /// Returns `true` if both targets name the same destination.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Driver, Self::Driver) => true,
            (Self::Unit(a), Self::Unit(b)) => a.same_unit(b),
            _ => false,
        }
    }
}

/// Input of one step.
#[derive(Debug)]
pub struct Incoming {
    /// The transferred payload.
    pub value: TransferValue,
    /// The unit that ran last, or `Driver` on the first step of a run.
    pub origin: Target,
}

/// Output of one step.
#[derive(Debug)]
pub struct Outgoing {
    /// The payload handed to `next`.
    pub value: TransferValue,
    /// The unit to step next, or `Driver` to end the run.
    pub next: Target,
}

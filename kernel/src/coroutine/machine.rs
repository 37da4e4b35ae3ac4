//! The coroutine execution unit: suspend point, caller binding, initial
//! value, live locals, and the step that runs one body arm.

use std::cell::{RefCell, RefMut};

use crate::coroutine::body::{Action, Awaiting, Body, Resumption, Suspend};
use crate::coroutine::locals::LiveLocals;
use crate::coroutine::suspend::SuspendPoint;
use crate::error::{fatal, UsageViolation};
use crate::exec::{Continuation, ExecutionUnit, Incoming, Outgoing, Target, UnitRef};
use crate::transfer::Transfer;

/// Access to a coroutine's self-handle from a body that transfers to it.
pub(crate) trait SelfHandle {
    /// Consume the self-handle for a transfer.
    fn release_self(&self) -> Target;

    /// Re-derive the self-handle when control comes back.
    fn rebind_self(&self, target: Target);
}

pub(crate) struct Machine<B: Body> {
    body: B,
    point: SuspendPoint,
    caller: Continuation,
    initial: Option<B::Input>,
    locals: LiveLocals,
    awaiting: Option<Awaiting>,
    /// While detached, the detour every fresh entry must come through.
    detour: Option<UnitRef>,
}

impl<B: Body> Machine<B> {
    fn new(body: B) -> Self {
        Self {
            body,
            point: SuspendPoint::START,
            caller: Continuation::invalid(),
            initial: None,
            locals: LiveLocals::new(),
            awaiting: None,
            detour: None,
        }
    }

    pub(crate) fn point(&self) -> SuspendPoint {
        self.point
    }

    pub(crate) fn body(&self) -> &B {
        &self.body
    }

    pub(crate) fn locals(&self) -> &LiveLocals {
        &self.locals
    }

    fn step(&mut self, incoming: Incoming) -> Outgoing {
        if self.point.is_done() {
            fatal(UsageViolation::ResumedFinished);
        }
        let Incoming { value, origin } = incoming;

        // Coming back from a transfer leaves the caller binding alone, and
        // only the unit transferred to may come back.
        match self.awaiting.take() {
            Some(awaiting) if !origin.names(awaiting.expected()) => {
                fatal(UsageViolation::ForeignContinuation)
            }
            Some(Awaiting::Coroutine { driven, .. }) => driven.rebind_self(origin),
            Some(Awaiting::Tracked { .. }) => {}
            None => {
                if self.detour.as_ref().is_some_and(|d| !origin.names(d)) {
                    fatal(UsageViolation::ForeignContinuation);
                }
                self.caller.rebind(origin);
            }
        }

        let received = if self.point.is_start() {
            self.initial = Some(B::Input::from_transfer(value));
            None
        } else {
            Some(value)
        };

        let mut co = Resumption {
            point: self.point,
            received,
            initial: &self.initial,
            locals: &mut self.locals,
        };
        let suspend: Suspend<B> = self.body.resume(&mut co);
        let point = suspend.point;
        self.point = point;

        match suspend.action {
            Action::Finish(value) => {
                self.locals.release_all();
                Outgoing {
                    value,
                    next: self.caller.release(),
                }
            }
            Action::Yield(value) => {
                self.locals.retain(B::live_at(point));
                Outgoing {
                    value,
                    next: self.caller.release(),
                }
            }
            Action::Transfer {
                value,
                next,
                awaiting,
            } => {
                self.locals.retain(B::live_at(point));
                self.awaiting = Some(awaiting);
                Outgoing { value, next }
            }
        }
    }
}

impl<B: Body> Drop for Machine<B> {
    fn drop(&mut self) {
        if self.point.is_start() || self.point.is_done() {
            return;
        }
        self.body.abandon(self.point, &mut self.locals);
        let released = self.locals.release_all();
        tracing::debug!(point = self.point.index(), released, "coroutine abandoned");
    }
}

/// The shared state behind a [`crate::coroutine::Coroutine`] handle.
pub(crate) struct Shared<B: Body> {
    cont: RefCell<Continuation>,
    machine: RefCell<Machine<B>>,
}

impl<B: Body> Shared<B> {
    pub(crate) fn new(body: B) -> Self {
        Self {
            cont: RefCell::new(Continuation::invalid()),
            machine: RefCell::new(Machine::new(body)),
        }
    }

    /// The self-handle.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the handle is already borrowed (reached from
    /// inside its own step).
    #[track_caller]
    pub(crate) fn cont(&self) -> RefMut<'_, Continuation> {
        self.cont
            .try_borrow_mut()
            .unwrap_or_else(|_| fatal(UsageViolation::Reentered))
    }

    /// Restrict fresh entries to `detour` while detached; `None` lifts it.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the coroutine is mid-step.
    #[track_caller]
    pub(crate) fn enter_only_through(&self, detour: Option<UnitRef>) {
        let Ok(mut machine) = self.machine.try_borrow_mut() else {
            fatal(UsageViolation::Reentered)
        };
        machine.detour = detour;
    }

    /// `None` while the coroutine is mid-step.
    pub(crate) fn machine(&self) -> Option<std::cell::Ref<'_, Machine<B>>> {
        self.machine.try_borrow().ok()
    }
}

impl<B: Body> ExecutionUnit for Shared<B> {
    fn step(&self, incoming: Incoming) -> Outgoing {
        // Every legitimate entry consumed the self-handle first.
        if self.cont().is_valid() {
            fatal(UsageViolation::ForeignContinuation);
        }
        let Ok(mut machine) = self.machine.try_borrow_mut() else {
            fatal(UsageViolation::Reentered)
        };
        machine.step(incoming)
    }
}

impl<B: Body> SelfHandle for Shared<B> {
    fn release_self(&self) -> Target {
        self.cont().release()
    }

    fn rebind_self(&self, target: Target) {
        self.cont().rebind(target);
    }
}

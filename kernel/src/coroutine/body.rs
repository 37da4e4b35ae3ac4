//! The `Body` trait and the per-resume context a body works through.
//!
//! A body is an explicit state machine. Each resume calls
//! [`Body::resume`] with a [`Resumption`] positioned at the current suspend
//! point; the body matches on [`Resumption::point`], does its work, and ends
//! the arm with exactly one of
//!
//! - [`Resumption::yield_value`] / [`Resumption::suspend`]: record a new
//!   suspend point and hand a value back to the caller,
//! - [`Resumption::transfer`] / [`Resumption::transfer_with`] /
//!   [`Resumption::transfer_via`]: record a new suspend point and hand control
//!   directly to another coroutine (symmetric transfer),
//! - [`Resumption::finish`]: hand the final value back and become done.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::coroutine::entry::Coroutine;
use crate::coroutine::locals::{LiveLocals, LiveSet};
use crate::coroutine::machine::SelfHandle;
use crate::coroutine::suspend::SuspendPoint;
use crate::error::{fatal, UsageViolation};
use crate::exec::{Resume, Target, TrackedContinuation, UnitRef};
use crate::transfer::{Transfer, TransferValue};

/// A coroutine body.
///
/// `Input` is what the coroutine consumes (`()` for "nothing"), `Output` what
/// it produces (`()` for "nothing").
pub trait Body: Sized + 'static {
    type Input: Transfer;
    type Output: Transfer;

    /// Run the arm for `co.point()` up to the next suspension.
    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self>;

    /// Live-local slots that survive suspension at `point`.
    ///
    /// Slots outside the set are dropped as the body suspends there.
    fn live_at(_point: SuspendPoint) -> LiveSet {
        LiveSet::ALL
    }

    /// Called when the coroutine is dropped while suspended mid-body, before
    /// its live locals are released.
    fn abandon(&mut self, _point: SuspendPoint, _locals: &mut LiveLocals) {}
}

/// Who control must come back from after a transfer, and what to re-derive
/// when it does.
pub(crate) enum Awaiting {
    /// A coroutine whose self-handle was consumed by the transfer.
    Coroutine {
        driven: Rc<dyn SelfHandle>,
        unit: UnitRef,
    },
    /// A tracked continuation; its detour already rebinds itself.
    Tracked { detour: UnitRef },
}

impl Awaiting {
    /// The only unit allowed to hand control back.
    pub(crate) fn expected(&self) -> &UnitRef {
        match self {
            Self::Coroutine { unit, .. } => unit,
            Self::Tracked { detour } => detour,
        }
    }
}

pub(crate) enum Action {
    Yield(TransferValue),
    Finish(TransferValue),
    Transfer {
        value: TransferValue,
        next: Target,
        awaiting: Awaiting,
    },
}

/// How a resume ended. Built only through [`Resumption`].
#[must_use = "a body arm must return its suspension"]
pub struct Suspend<B> {
    pub(crate) point: SuspendPoint,
    pub(crate) action: Action,
    marker: PhantomData<fn() -> B>,
}

impl<B> Suspend<B> {
    fn new(point: SuspendPoint, action: Action) -> Self {
        Self {
            point,
            action,
            marker: PhantomData,
        }
    }

    /// The suspend point the coroutine will be left at.
    #[must_use]
    pub fn point(&self) -> SuspendPoint {
        self.point
    }
}

impl<B> std::fmt::Debug for Suspend<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match &self.action {
            Action::Yield(_) => "yield",
            Action::Finish(_) => "finish",
            Action::Transfer { .. } => "transfer",
        };
        f.debug_struct("Suspend")
            .field("point", &self.point)
            .field("action", &action)
            .finish()
    }
}

/// The typed view of one resume, handed to [`Body::resume`].
pub struct Resumption<'a, B: Body> {
    pub(crate) point: SuspendPoint,
    pub(crate) received: Option<TransferValue>,
    pub(crate) initial: &'a Option<B::Input>,
    pub(crate) locals: &'a mut LiveLocals,
}

impl<B: Body> Resumption<'_, B> {
    /// The suspend point being resumed.
    #[must_use]
    pub fn point(&self) -> SuspendPoint {
        self.point
    }

    /// The argument of the very first resume.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if read before the first resume captured it
    /// (which cannot happen from inside a body).
    #[must_use]
    #[track_caller]
    pub fn initial_value(&self) -> &B::Input {
        self.initial
            .as_ref()
            .unwrap_or_else(|| fatal(UsageViolation::MissingInitialValue))
    }

    /// The argument this resume was called with.
    ///
    /// At `START` the argument is the initial value instead; read it with
    /// [`Resumption::initial_value`].
    ///
    /// # Panics
    ///
    /// Fatal usage violation at `START`, or if the value was already taken.
    #[track_caller]
    pub fn resumed_with(&mut self) -> B::Input {
        B::Input::from_transfer(self.take_received())
    }

    /// The value `other` handed back after [`Resumption::transfer`] or
    /// [`Resumption::transfer_with`] to it.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if no value is pending, or it has the wrong kind.
    #[track_caller]
    pub fn returned_from<C: Body>(&mut self, _other: &Coroutine<C>) -> C::Output {
        C::Output::from_transfer(self.take_received())
    }

    /// The value handed back after [`Resumption::transfer_via`] through `via`.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if no value is pending, or it has the wrong kind.
    #[track_caller]
    pub fn returned_via<A, R: Transfer>(
        &mut self,
        _via: &Resume<A, R, TrackedContinuation>,
    ) -> R {
        R::from_transfer(self.take_received())
    }

    /// This coroutine's live-locals table.
    #[must_use]
    pub fn locals(&self) -> &LiveLocals {
        self.locals
    }

    pub fn locals_mut(&mut self) -> &mut LiveLocals {
        self.locals
    }

    /// Suspend at `point` and hand `value` to the caller.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if `point` is `0` or the `DONE` sentinel.
    #[track_caller]
    pub fn yield_value(&mut self, point: u32, value: B::Output) -> Suspend<B> {
        Suspend::new(
            SuspendPoint::resume_at(point),
            Action::Yield(value.into_transfer()),
        )
    }

    /// Become done and hand the final `value` to the caller.
    pub fn finish(&mut self, value: B::Output) -> Suspend<B> {
        Suspend::new(SuspendPoint::DONE, Action::Finish(value.into_transfer()))
    }

    /// Suspend at `point` and hand control to `other` with `arg`.
    ///
    /// When `other` yields or finishes, this coroutine resumes at `point`; its
    /// value is read with [`Resumption::returned_from`].
    ///
    /// # Panics
    ///
    /// Fatal usage violation if `point` is reserved, or if `other` cannot be
    /// resumed (done, detached, or already waiting on a transfer).
    #[track_caller]
    pub fn transfer_with<C: Body>(
        &mut self,
        point: u32,
        other: &Coroutine<C>,
        arg: C::Input,
    ) -> Suspend<B> {
        let point = SuspendPoint::resume_at(point);
        if other.done() {
            fatal(UsageViolation::ResumedFinished);
        }
        let driven = other.self_handle();
        let next = driven.release_self();
        Suspend::new(
            point,
            Action::Transfer {
                value: arg.into_transfer(),
                next,
                awaiting: Awaiting::Coroutine {
                    driven,
                    unit: other.unit(),
                },
            },
        )
    }

    /// [`Resumption::transfer_with`] for a coroutine that consumes nothing.
    ///
    /// # Panics
    ///
    /// See [`Resumption::transfer_with`].
    #[track_caller]
    pub fn transfer<C: Body<Input = ()>>(&mut self, point: u32, other: &Coroutine<C>) -> Suspend<B> {
        self.transfer_with(point, other, ())
    }

    /// Suspend at `point` and hand control through a tracked continuation.
    ///
    /// The handle keeps its own binding up to date, so it stays valid after
    /// control comes back. The value is read with [`Resumption::returned_via`].
    ///
    /// # Panics
    ///
    /// Fatal usage violation if `point` is reserved, or if `via` is invalid
    /// or already mid-transfer.
    #[track_caller]
    pub fn transfer_via<A: Transfer, R: Transfer>(
        &mut self,
        point: u32,
        via: &Resume<A, R, TrackedContinuation>,
        arg: A,
    ) -> Suspend<B> {
        let point = SuspendPoint::resume_at(point);
        via.handle().ensure_idle();
        let detour = via.handle().unit();
        Suspend::new(
            point,
            Action::Transfer {
                value: arg.into_transfer(),
                next: Target::Unit(detour.duplicate()),
                awaiting: Awaiting::Tracked { detour },
            },
        )
    }

    /// Abort on a suspend point the body has no arm for.
    ///
    /// # Panics
    ///
    /// Always (fatal usage violation).
    #[track_caller]
    pub fn unknown_point(&self) -> ! {
        fatal(UsageViolation::UnknownSuspendPoint {
            point: self.point.index(),
        })
    }

    #[track_caller]
    fn take_received(&mut self) -> TransferValue {
        self.received
            .take()
            .unwrap_or_else(|| fatal(UsageViolation::MissingResumeValue))
    }
}

impl<B: Body<Output = ()>> Resumption<'_, B> {
    /// Suspend at `point` without producing a value.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if `point` is `0` or the `DONE` sentinel.
    #[track_caller]
    pub fn suspend(&mut self, point: u32) -> Suspend<B> {
        self.yield_value(point, ())
    }
}

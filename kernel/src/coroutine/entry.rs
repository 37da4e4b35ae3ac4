//! `Coroutine<B>`: the typed handle callers hold.

use std::rc::Rc;

use crate::coroutine::body::Body;
use crate::coroutine::machine::{SelfHandle, Shared};
use crate::coroutine::suspend::SuspendPoint;
use crate::error::{fatal, UsageViolation};
use crate::exec::{Continuation, Resume, Target, TrackedContinuation, Trampoline, UnitRef};
use crate::transfer::Transfer;

/// A coroutine running body `B`.
///
/// Cloning yields another handle to the same coroutine. The coroutine is
/// dropped (and abandoned, if suspended mid-body) with its last handle.
pub struct Coroutine<B: Body> {
    shared: Rc<Shared<B>>,
}

impl<B: Body> Coroutine<B> {
    /// A coroutine at suspend point `START` whose self-handle names itself.
    #[must_use]
    pub fn new(body: B) -> Self {
        let shared = Rc::new(Shared::new(body));
        shared
            .cont()
            .rebind(Target::Unit(UnitRef::new(&shared)));
        Self { shared }
    }

    /// Returns `true` once the body has finished.
    ///
    /// Reports `false` while the coroutine is mid-step.
    #[must_use]
    pub fn done(&self) -> bool {
        self.shared
            .machine()
            .is_some_and(|m| m.point().is_done())
    }

    /// The current suspend point.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if called while the coroutine is mid-step.
    #[must_use]
    #[track_caller]
    pub fn suspend_point(&self) -> SuspendPoint {
        let Some(machine) = self.shared.machine() else {
            fatal(UsageViolation::Reentered)
        };
        machine.point()
    }

    /// Returns `true` if the self-handle is valid (not detached, not consumed
    /// by a pending transfer).
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        !self.done() && self.shared.cont().is_valid()
    }

    /// Reference to the coroutine's execution unit.
    ///
    /// Crate-private: outside the engine the only way to transfer control to
    /// a coroutine is the single handle it hands out.
    pub(crate) fn unit(&self) -> UnitRef {
        UnitRef::new(&self.shared)
    }

    /// Inspect the body between resumes.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if called while the coroutine is mid-step.
    #[track_caller]
    pub fn with_body<T>(&self, f: impl FnOnce(&B) -> T) -> T {
        let Some(machine) = self.shared.machine() else {
            fatal(UsageViolation::Reentered)
        };
        f(machine.body())
    }

    /// Number of live locals currently stored.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if called while the coroutine is mid-step.
    #[must_use]
    #[track_caller]
    pub fn live_locals(&self) -> usize {
        let Some(machine) = self.shared.machine() else {
            fatal(UsageViolation::Reentered)
        };
        machine.locals().live_count()
    }

    /// Resume with `arg` on a default trampoline.
    ///
    /// # Panics
    ///
    /// See [`Coroutine::resume_with_on`].
    pub fn resume_with(&self, arg: B::Input) -> B::Output {
        self.resume_with_on(&Trampoline::new(), arg)
    }

    /// Resume with `arg` and drive `trampoline` until control returns here.
    ///
    /// On the first resume `arg` becomes the initial value.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the coroutine is done, its self-handle is
    /// detached or consumed by a pending transfer, or anything in the run
    /// violates usage.
    pub fn resume_with_on(&self, trampoline: &Trampoline, arg: B::Input) -> B::Output {
        if self.done() {
            fatal(UsageViolation::ResumedFinished);
        }
        let start = self.shared.cont().release();
        let landing = trampoline.run(start, arg.into_transfer());
        self.shared.cont().rebind(landing.last);
        B::Output::from_transfer(landing.value)
    }

    /// Move the self-handle into a tracked, typed continuation.
    ///
    /// Until [`Coroutine::reattach`], the coroutine is resumed only through
    /// the returned handle, which can be stored anywhere (including another
    /// coroutine's body).
    ///
    /// # Panics
    ///
    /// Fatal usage violation if the self-handle is not currently valid.
    #[must_use]
    #[track_caller]
    pub fn detach(&self) -> Resume<B::Input, B::Output, TrackedContinuation> {
        let handle = self.shared.cont().take();
        if !handle.is_valid() {
            fatal(UsageViolation::InvalidContinuation);
        }
        let tracked = TrackedContinuation::new(handle);
        self.shared.enter_only_through(Some(tracked.unit()));
        Resume::new(tracked)
    }

    /// Move a handle produced by [`Coroutine::detach`] back in.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if a transfer through the handle is still out,
    /// or the handle does not name this coroutine.
    #[track_caller]
    pub fn reattach(&self, resume: Resume<B::Input, B::Output, TrackedContinuation>) {
        let handle: Continuation = resume.into_inner().into_continuation();
        if !handle.names(&self.unit()) {
            fatal(UsageViolation::ForeignContinuation);
        }
        self.shared.enter_only_through(None);
        *self.shared.cont() = handle;
    }

    pub(crate) fn self_handle(&self) -> Rc<dyn SelfHandle> {
        Rc::clone(&self.shared) as Rc<dyn SelfHandle>
    }
}

impl<B: Body<Input = ()>> Coroutine<B> {
    /// Resume a coroutine that consumes nothing.
    ///
    /// # Panics
    ///
    /// See [`Coroutine::resume_with_on`].
    pub fn resume(&self) -> B::Output {
        self.resume_with(())
    }

    /// [`Coroutine::resume`] on the given trampoline.
    ///
    /// # Panics
    ///
    /// See [`Coroutine::resume_with_on`].
    pub fn resume_on(&self, trampoline: &Trampoline) -> B::Output {
        self.resume_with_on(trampoline, ())
    }
}

impl<B: Body> Clone for Coroutine<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<B: Body> std::fmt::Debug for Coroutine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let point = self.shared.machine().map(|m| m.point());
        f.debug_struct("Coroutine")
            .field("body", &std::any::type_name::<B>())
            .field("point", &point)
            .finish()
    }
}

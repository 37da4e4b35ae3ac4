//! `counter`: a generator that reports each value to an observer.

use std::cell::RefCell;
use std::rc::Rc;

use baton_kernel::coroutine::{Body, Coroutine, LiveSet, Local, Resumption, Suspend, SuspendPoint};

use crate::contract::Scenario;
use crate::error::HarnessError;
use crate::policy::RunPolicyV1;
use crate::transcript::{TranscriptBuilder, TranscriptV1};

const CURRENT: Local<i64> = Local::new(0);

/// Emits `start`, `start + step`, ... one value per resume. Finishes instead
/// of emitting once the next value would overflow `i64`.
pub struct Counter {
    start: i64,
    step: i64,
    observer: Rc<dyn Fn(i64)>,
}

impl Counter {
    #[must_use]
    pub fn new(start: i64, step: i64, observer: impl Fn(i64) + 'static) -> Self {
        Self {
            start,
            step,
            observer: Rc::new(observer),
        }
    }
}

impl Body for Counter {
    type Input = ();
    type Output = ();

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        let current = match co.point().index() {
            0 => self.start,
            1 => match co.locals().get(CURRENT).checked_add(self.step) {
                Some(next) => next,
                None => return co.finish(()),
            },
            _ => co.unknown_point(),
        };
        co.locals_mut().put(CURRENT, current);
        (self.observer)(current);
        co.suspend(1)
    }

    fn live_at(_point: SuspendPoint) -> LiveSet {
        LiveSet::NONE.with(CURRENT)
    }
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter")
            .field("start", &self.start)
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

/// Four resumes of `Counter::new(1, 3, ..)`.
#[derive(Debug)]
pub struct CounterScenario {
    pub start: i64,
    pub step: i64,
    pub invocations: usize,
}

impl Default for CounterScenario {
    fn default() -> Self {
        Self {
            start: 1,
            step: 3,
            invocations: 4,
        }
    }
}

impl Scenario for CounterScenario {
    fn scenario_id(&self) -> &'static str {
        "counter"
    }

    fn run(&self, policy: &RunPolicyV1) -> Result<TranscriptV1, HarnessError> {
        policy.validate()?;
        let trampoline = policy.trampoline();
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&emitted);
        let co = Coroutine::new(Counter::new(self.start, self.step, move |v| {
            sink.borrow_mut().push(v);
        }));

        let mut transcript = TranscriptBuilder::new(self.scenario_id(), policy);
        for _ in 0..self.invocations {
            if co.done() {
                break;
            }
            co.resume_on(&trampoline);
            transcript.emit_all(emitted.borrow_mut().drain(..));
            transcript.invoke(None, None, co.done());
        }
        Ok(transcript.finish(co.done()))
    }
}

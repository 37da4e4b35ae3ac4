//! `range`: yields `start .. end - 1` and finishes with `end - 1`.

use baton_kernel::coroutine::{Body, Coroutine, LiveSet, Local, Resumption, Suspend, SuspendPoint};

use crate::contract::Scenario;
use crate::error::HarnessError;
use crate::policy::RunPolicyV1;
use crate::transcript::{TranscriptBuilder, TranscriptV1};

const NEXT: Local<i64> = Local::new(0);

/// Produces `end - start` values, the last one as its final value.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    start: i64,
    end: i64,
}

impl Range {
    /// # Panics
    ///
    /// Panics if `start..end` is empty.
    #[must_use]
    pub fn new(start: i64, end: i64) -> Self {
        assert!(start < end, "range {start}..{end} is empty");
        Self { start, end }
    }

    /// [`Range::new`] for caller-supplied bounds.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidScenario`] if `start..end` is empty.
    pub fn try_new(start: i64, end: i64) -> Result<Self, HarnessError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(HarnessError::InvalidScenario {
                detail: format!("range {start}..{end} is empty"),
            })
        }
    }

    // `start < end`, so neither `end - 1` nor `i + 1` can overflow.
    fn advance(self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        let i = *co.locals().get(NEXT);
        if i < self.end - 1 {
            co.locals_mut().put(NEXT, i + 1);
            co.yield_value(1, i)
        } else {
            co.finish(self.end - 1)
        }
    }
}

impl Body for Range {
    type Input = ();
    type Output = i64;

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        match co.point().index() {
            0 => {
                co.locals_mut().put(NEXT, self.start);
                self.advance(co)
            }
            1 => self.advance(co),
            _ => co.unknown_point(),
        }
    }

    fn live_at(_point: SuspendPoint) -> LiveSet {
        LiveSet::NONE.with(NEXT)
    }
}

/// Resumes `Range::new(10, 14)` until it is done.
#[derive(Debug)]
pub struct RangeScenario {
    pub start: i64,
    pub end: i64,
}

impl Default for RangeScenario {
    fn default() -> Self {
        Self { start: 10, end: 14 }
    }
}

impl Scenario for RangeScenario {
    fn scenario_id(&self) -> &'static str {
        "range"
    }

    fn run(&self, policy: &RunPolicyV1) -> Result<TranscriptV1, HarnessError> {
        policy.validate()?;
        let trampoline = policy.trampoline();
        let co = Coroutine::new(Range::try_new(self.start, self.end)?);
        let mut transcript = TranscriptBuilder::new(self.scenario_id(), policy);
        while !co.done() {
            let value = co.resume_on(&trampoline);
            transcript.invoke(None, Some(value), co.done());
        }
        Ok(transcript.finish(co.done()))
    }
}

//! `multiply`: pulls one value from each of two ranges by symmetric transfer
//! and yields their product.

use baton_kernel::coroutine::{Body, Coroutine, LiveSet, Local, Resumption, Suspend, SuspendPoint};

use crate::contract::Scenario;
use crate::error::HarnessError;
use crate::policy::RunPolicyV1;
use crate::scenarios::range::Range;
use crate::transcript::{TranscriptBuilder, TranscriptV1};

const LHS: Local<i64> = Local::new(0);

/// Finishes with the product that exhausted either range. Products saturate
/// at the `i64` bounds.
#[derive(Debug)]
pub struct Multiply {
    lhs: Coroutine<Range>,
    rhs: Coroutine<Range>,
}

impl Multiply {
    #[must_use]
    pub fn new(lhs: Coroutine<Range>, rhs: Coroutine<Range>) -> Self {
        Self { lhs, rhs }
    }
}

impl Body for Multiply {
    type Input = ();
    type Output = i64;

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        match co.point().index() {
            0 | 3 => co.transfer(1, &self.lhs),
            1 => {
                let lhs = co.returned_from(&self.lhs);
                co.locals_mut().put(LHS, lhs);
                co.transfer(2, &self.rhs)
            }
            2 => {
                let rhs = co.returned_from(&self.rhs);
                let product = co.locals_mut().take(LHS).saturating_mul(rhs);
                if self.lhs.done() || self.rhs.done() {
                    co.finish(product)
                } else {
                    co.yield_value(3, product)
                }
            }
            _ => co.unknown_point(),
        }
    }

    fn live_at(point: SuspendPoint) -> LiveSet {
        if point.index() == 2 {
            LiveSet::NONE.with(LHS)
        } else {
            LiveSet::NONE
        }
    }
}

/// `Multiply` over `Range(0, 4)` and `Range(2, 10)`, resumed until done.
#[derive(Debug)]
pub struct MultiplyScenario {
    pub lhs: (i64, i64),
    pub rhs: (i64, i64),
}

impl Default for MultiplyScenario {
    fn default() -> Self {
        Self {
            lhs: (0, 4),
            rhs: (2, 10),
        }
    }
}

impl Scenario for MultiplyScenario {
    fn scenario_id(&self) -> &'static str {
        "multiply"
    }

    fn run(&self, policy: &RunPolicyV1) -> Result<TranscriptV1, HarnessError> {
        policy.validate()?;
        let trampoline = policy.trampoline();
        let lhs = Coroutine::new(Range::try_new(self.lhs.0, self.lhs.1)?);
        let rhs = Coroutine::new(Range::try_new(self.rhs.0, self.rhs.1)?);
        let co = Coroutine::new(Multiply::new(lhs.clone(), rhs.clone()));

        let mut transcript = TranscriptBuilder::new(self.scenario_id(), policy);
        while !co.done() {
            let product = co.resume_on(&trampoline);
            transcript.invoke(None, Some(product), co.done());
        }
        tracing::debug!(
            lhs_done = lhs.done(),
            rhs_done = rhs.done(),
            "multiply finished"
        );
        Ok(transcript.finish(co.done()))
    }
}

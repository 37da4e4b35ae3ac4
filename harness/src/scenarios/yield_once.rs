//! `yield_once`: suspends once, then finishes.

use baton_kernel::coroutine::{Body, Coroutine, Resumption, Suspend};

use crate::contract::Scenario;
use crate::error::HarnessError;
use crate::policy::RunPolicyV1;
use crate::transcript::{TranscriptBuilder, TranscriptV1};

/// Neither consumes nor produces a value.
#[derive(Debug, Default)]
pub struct YieldOnce;

impl Body for YieldOnce {
    type Input = ();
    type Output = ();

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        match co.point().index() {
            0 => co.suspend(1),
            1 => co.finish(()),
            _ => co.unknown_point(),
        }
    }
}

/// Resumes a [`YieldOnce`] twice.
#[derive(Debug, Default)]
pub struct YieldOnceScenario;

impl Scenario for YieldOnceScenario {
    fn scenario_id(&self) -> &'static str {
        "yield_once"
    }

    fn run(&self, policy: &RunPolicyV1) -> Result<TranscriptV1, HarnessError> {
        policy.validate()?;
        let trampoline = policy.trampoline();
        let co = Coroutine::new(YieldOnce);
        let mut transcript = TranscriptBuilder::new(self.scenario_id(), policy);
        for _ in 0..2 {
            co.resume_on(&trampoline);
            transcript.invoke(None, None, co.done());
        }
        Ok(transcript.finish(co.done()))
    }
}

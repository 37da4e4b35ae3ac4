//! `echo`: hands every argument straight back.

use baton_kernel::coroutine::{Body, Coroutine, Resumption, Suspend};

use crate::contract::Scenario;
use crate::error::HarnessError;
use crate::policy::RunPolicyV1;
use crate::transcript::{TranscriptBuilder, TranscriptV1};

/// Consumes and produces an integer. The first argument is the initial
/// value and is also the first result. Never finishes.
#[derive(Debug, Default)]
pub struct Echo;

impl Body for Echo {
    type Input = i64;
    type Output = i64;

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        let value = match co.point().index() {
            0 => *co.initial_value(),
            1 => co.resumed_with(),
            _ => co.unknown_point(),
        };
        co.yield_value(1, value)
    }
}

/// Resumes an [`Echo`] with `0..4`.
#[derive(Debug)]
pub struct EchoScenario {
    pub invocations: i64,
}

impl Default for EchoScenario {
    fn default() -> Self {
        Self { invocations: 4 }
    }
}

impl Scenario for EchoScenario {
    fn scenario_id(&self) -> &'static str {
        "echo"
    }

    fn run(&self, policy: &RunPolicyV1) -> Result<TranscriptV1, HarnessError> {
        policy.validate()?;
        let trampoline = policy.trampoline();
        let co = Coroutine::new(Echo);
        let mut transcript = TranscriptBuilder::new(self.scenario_id(), policy);
        for arg in 0..self.invocations {
            let result = co.resume_with_on(&trampoline, arg);
            transcript.invoke(Some(arg), Some(result), co.done());
        }
        Ok(transcript.finish(co.done()))
    }
}

//! `relay_chain`: a chain of coroutines, each transferring to the next.
//!
//! Every link adds one to the value it was started with and hands it to the
//! next link. The last link finishes with the value, and each link then
//! finishes with whatever came back. A chain of N links takes `2N - 1`
//! trampoline steps and constant native stack.

use baton_kernel::coroutine::{Body, Coroutine, Resumption, Suspend};

use crate::contract::Scenario;
use crate::error::HarnessError;
use crate::policy::RunPolicyV1;
use crate::transcript::{TranscriptBuilder, TranscriptV1};

/// One link.
#[derive(Debug)]
pub struct Relay {
    next: Option<Coroutine<Relay>>,
}

impl Body for Relay {
    type Input = i64;
    type Output = i64;

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        match co.point().index() {
            0 => {
                let value = *co.initial_value();
                match &self.next {
                    Some(next) => co.transfer_with(1, next, value + 1),
                    None => co.finish(value),
                }
            }
            1 => {
                let Some(next) = &self.next else {
                    co.unknown_point()
                };
                let value = co.returned_from(next);
                co.finish(value)
            }
            _ => co.unknown_point(),
        }
    }
}

/// Build a chain of `depth` links. Index 0 is the head.
///
/// Keep the returned vector alive for the whole run and drop it as a unit:
/// every link is owned by the vector as well as by its predecessor, so
/// dropping it front to back never recurses through the chain.
#[must_use]
pub fn build_chain(depth: usize) -> Vec<Coroutine<Relay>> {
    let mut links: Vec<Coroutine<Relay>> = Vec::with_capacity(depth);
    for _ in 0..depth {
        let next = links.last().cloned();
        links.push(Coroutine::new(Relay { next }));
    }
    links.reverse();
    links
}

/// Resumes the head of a `chain_depth`-link chain once with `0`.
#[derive(Debug, Default)]
pub struct RelayScenario;

impl Scenario for RelayScenario {
    fn scenario_id(&self) -> &'static str {
        "relay_chain"
    }

    fn run(&self, policy: &RunPolicyV1) -> Result<TranscriptV1, HarnessError> {
        policy.validate()?;
        let trampoline = policy.trampoline();
        let chain = build_chain(policy.chain_depth);
        let mut transcript = TranscriptBuilder::new(self.scenario_id(), policy);
        let done = match chain.first() {
            Some(head) => {
                let result = head.resume_with_on(&trampoline, 0);
                transcript.invoke(Some(0), Some(result), head.done());
                head.done()
            }
            None => false,
        };
        drop(chain);
        Ok(transcript.finish(done))
    }
}

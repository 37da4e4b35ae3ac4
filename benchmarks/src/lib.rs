//! Shared helpers for baton benchmark suites.

use baton_harness::policy::RunPolicyV1;
use baton_harness::scenarios::{build_chain, scenario_by_id};
use baton_harness::transcript::TranscriptV1;
use baton_kernel::coroutine::{Body, Coroutine, Resumption, Suspend};
use baton_kernel::exec::Trampoline;

/// Hands back its argument plus one, forever.
#[derive(Debug, Default)]
pub struct Pong;

impl Body for Pong {
    type Input = i64;
    type Output = i64;

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        let value = match co.point().index() {
            0 => *co.initial_value(),
            1 => co.resumed_with(),
            _ => co.unknown_point(),
        };
        co.yield_value(1, value + 1)
    }
}

/// Transfers to its partner until the count reaches `rounds`, then finishes
/// with the count. Every round trip is two trampoline steps.
#[derive(Debug)]
pub struct Ping {
    partner: Coroutine<Pong>,
    rounds: i64,
}

impl Body for Ping {
    type Input = ();
    type Output = i64;

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        let value = match co.point().index() {
            0 => 0,
            1 => co.returned_from(&self.partner),
            _ => co.unknown_point(),
        };
        if value >= self.rounds {
            co.finish(value)
        } else {
            co.transfer_with(1, &self.partner, value)
        }
    }
}

/// Run `rounds` symmetric round trips on `trampoline`. Returns the final count.
#[must_use]
pub fn ping_pong(rounds: i64, trampoline: &Trampoline) -> i64 {
    let co = Coroutine::new(Ping {
        partner: Coroutine::new(Pong),
        rounds,
    });
    co.resume_on(trampoline)
}

/// Build a relay chain of `depth` links and run it once from `0`.
///
/// # Panics
///
/// Panics if `depth` is zero.
#[must_use]
pub fn relay(depth: usize, trampoline: &Trampoline) -> i64 {
    let chain = build_chain(depth);
    let head = chain.first().expect("relay depth must be at least 1");
    head.resume_with_on(trampoline, 0)
}

/// Run a built-in scenario under the default policy.
///
/// # Panics
///
/// Panics if the id is unknown or the run fails. Benchmark runs are expected
/// to succeed.
#[must_use]
pub fn run_default(id: &str) -> TranscriptV1 {
    scenario_by_id(id)
        .expect("known scenario")
        .run(&RunPolicyV1::default())
        .expect("scenario run should succeed in benchmarks")
}

/// Every built-in scenario id, in registry order.
#[must_use]
pub fn scenario_ids() -> Vec<&'static str> {
    baton_harness::scenarios::all()
        .iter()
        .map(|s| s.scenario_id())
        .collect()
}

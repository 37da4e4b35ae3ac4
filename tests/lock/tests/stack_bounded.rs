//! Stack-boundedness: long chains of symmetric transfers run in constant
//! native stack depth.
//!
//! Every run happens on a thread whose stack could not hold one native frame
//! per transfer.

use baton_harness::policy::RunPolicyV1;
use baton_harness::scenarios::build_chain;
use baton_kernel::coroutine::{Body, Coroutine, Resumption, Suspend};
use lock_tests::helpers::{run_scenario, run_with_stack, SMALL_STACK_BYTES};

#[test]
fn ten_thousand_link_relay_on_small_stack() {
    let (result, all_done) = run_with_stack(SMALL_STACK_BYTES, || {
        let chain = build_chain(10_000);
        let result = chain[0].resume_with(0);
        let all_done = chain.iter().all(Coroutine::done);
        (result, all_done)
    });
    assert_eq!(result, 9_999);
    assert!(all_done);
}

#[test]
fn relay_scenario_default_depth_on_small_stack() {
    let transcript = run_with_stack(SMALL_STACK_BYTES, || {
        run_scenario("relay_chain", &RunPolicyV1::default())
    });
    assert_eq!(transcript.results(), vec![9_999]);
    assert!(transcript.final_done);
}

/// Two coroutines that hand control back and forth `rounds` times before
/// the first one yields to the driver.
struct PingPong {
    partner: Coroutine<Pong>,
    rounds: i64,
}

struct Pong;

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

impl Body for PingPong {
    type Input = ();
    type Output = i64;

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        let partner = &self.partner;
        let value = match co.point().index() {
            0 => 0,
            1 => co.returned_from(partner),
            _ => co.unknown_point(),
        };
        if value >= self.rounds {
            co.finish(value)
        } else {
            co.transfer_with(1, partner, value)
        }
    }
}

#[test]
fn hundred_thousand_round_trips_on_small_stack() {
    let result = run_with_stack(SMALL_STACK_BYTES, || {
        let co = Coroutine::new(PingPong {
            partner: Coroutine::new(Pong),
            rounds: 100_000,
        });
        let result = co.resume();
        assert!(co.done());
        result
    });
    assert_eq!(result, 100_000);
}

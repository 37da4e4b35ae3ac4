//! Terminal monotonicity and single-yield lock tests.
//!
//! `done()` is false until exactly one more invocation than the number of
//! yields, stays true afterwards, and any further invocation is fatal for
//! every signature variant.

use baton_harness::scenarios::{Echo, Range, YieldOnce};
use baton_kernel::coroutine::{Body, Coroutine, Resumption, Suspend};

#[test]
fn yield_once_goes_start_one_done() {
    let co = Coroutine::new(YieldOnce);
    assert!(co.suspend_point().is_start());
    co.resume();
    assert_eq!(co.suspend_point().index(), 1);
    assert!(!co.done());
    co.resume();
    assert!(co.suspend_point().is_done());
    assert!(co.done());
    assert!(co.done(), "done is sticky");
}

#[test]
#[should_panic(expected = "resumed a finished coroutine")]
fn yield_once_third_invocation_is_fatal() {
    let co = Coroutine::new(YieldOnce);
    co.resume();
    co.resume();
    co.resume();
}

#[test]
fn range_done_after_yields_plus_one() {
    let co = Coroutine::new(Range::new(10, 14));
    let mut yields = 0;
    loop {
        let _ = co.resume();
        if co.done() {
            break;
        }
        yields += 1;
    }
    assert_eq!(yields, 3);
    assert!(co.done());
}

#[test]
#[should_panic(expected = "resumed a finished coroutine")]
fn range_fifth_invocation_is_fatal() {
    let co = Coroutine::new(Range::new(10, 14));
    for _ in 0..5 {
        let _ = co.resume();
    }
}

/// Consumes a value and finishes with its double.
struct DoubleOnce;

impl Body for DoubleOnce {
    type Input = i64;
    type Output = i64;

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        let value = *co.initial_value();
        co.finish(value * 2)
    }
}

/// Consumes a value, produces nothing, finishes after one yield.
struct SinkOnce;

impl Body for SinkOnce {
    type Input = i64;
    type Output = ();

    fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
        match co.point().index() {
            0 => co.suspend(1),
            1 => {
                let _ = co.resumed_with();
                co.finish(())
            }
            _ => co.unknown_point(),
        }
    }
}

#[test]
#[should_panic(expected = "resumed a finished coroutine")]
fn consuming_producer_is_fatal_after_finish() {
    let co = Coroutine::new(DoubleOnce);
    assert_eq!(co.resume_with(21), 42);
    assert!(co.done());
    let _ = co.resume_with(1);
}

#[test]
#[should_panic(expected = "resumed a finished coroutine")]
fn consumer_is_fatal_after_finish() {
    let co = Coroutine::new(SinkOnce);
    co.resume_with(1);
    co.resume_with(2);
    assert!(co.done());
    co.resume_with(3);
}

#[test]
fn echo_never_finishes() {
    let co = Coroutine::new(Echo);
    for i in 0..100 {
        assert_eq!(co.resume_with(i), i);
        assert!(!co.done());
    }
}

//! Usage violations are fatal: each one panics with its documented message.

use std::cell::RefCell;
use std::rc::Rc;

use baton_harness::scenarios::Range;
use baton_kernel::coroutine::{Body, Coroutine, LiveSet, Local, Resumption, Suspend, SuspendPoint};
use baton_kernel::exec::{
    Continuation, ExecutionUnit, Incoming, Outgoing, Resume, Target, TrackedContinuation,
    Trampoline, UnitRef,
};
use baton_kernel::transfer::TransferValue;

/// Hands every value straight back to the driver.
struct Identity;

impl ExecutionUnit for Identity {
    fn step(&self, incoming: Incoming) -> Outgoing {
        Outgoing {
            value: incoming.value,
            next: Target::Driver,
        }
    }
}

#[test]
#[should_panic(expected = "invoked an invalid continuation")]
fn invoking_a_consumed_handle() {
    let unit = Rc::new(Identity);
    let mut k = Continuation::new(Target::Unit(UnitRef::new(&unit)));
    let mut moved = k.take();
    let _ = moved.invoke(TransferValue::Empty);
    let _ = k.invoke(TransferValue::Empty);
}

#[test]
#[should_panic(expected = "trampoline started at the null target")]
fn driving_from_the_null_target() {
    let _ = Trampoline::new().run(Target::Driver, TransferValue::Empty);
}

#[test]
#[should_panic(expected = "continuation names a dropped execution unit")]
fn invoking_a_dangling_handle() {
    let unit = Rc::new(Identity);
    let mut k = Continuation::new(Target::Unit(UnitRef::new(&unit)));
    drop(unit);
    let _ = k.invoke(TransferValue::Empty);
}

#[test]
#[should_panic(expected = "transfer value mismatch: expected float, found integer")]
fn mistyped_resume_handle() {
    let unit = Rc::new(Identity);
    let mut k: Resume<i64, f64> =
        Resume::new(Continuation::new(Target::Unit(UnitRef::new(&unit))));
    let _ = k.invoke(3);
}

#[test]
#[should_panic(expected = "invoked an invalid continuation")]
fn resuming_self_from_inside_the_body() {
    type SelfSlot = Rc<RefCell<Option<Coroutine<Recurse>>>>;
    struct Recurse {
        me: SelfSlot,
    }
    impl Body for Recurse {
        type Input = ();
        type Output = ();
        fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
            let me = self.me.borrow().clone();
            if let Some(me) = me {
                me.resume();
            }
            co.finish(())
        }
    }
    let slot: SelfSlot = Rc::new(RefCell::new(None));
    let co = Coroutine::new(Recurse {
        me: Rc::clone(&slot),
    });
    *slot.borrow_mut() = Some(co.clone());
    co.resume();
}

#[test]
#[should_panic(expected = "resumed a finished coroutine")]
fn transferring_to_a_finished_coroutine() {
    struct Pull {
        from: Coroutine<Range>,
    }
    impl Body for Pull {
        type Input = ();
        type Output = i64;
        fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
            match co.point().index() {
                0 | 2 => co.transfer(1, &self.from),
                1 => {
                    let v = co.returned_from(&self.from);
                    co.yield_value(2, v)
                }
                _ => co.unknown_point(),
            }
        }
    }
    let from = Coroutine::new(Range::new(0, 1));
    let pull = Coroutine::new(Pull { from });
    assert_eq!(pull.resume(), 0);
    let _ = pull.resume();
}

#[test]
#[should_panic(expected = "live local 1 is not stored")]
fn reading_a_released_local() {
    const KEPT: Local<i64> = Local::new(1);
    struct Forgetful;
    impl Body for Forgetful {
        type Input = ();
        type Output = i64;
        fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
            match co.point().index() {
                0 => {
                    co.locals_mut().put(KEPT, 5);
                    co.yield_value(1, 0)
                }
                1 => {
                    let v = *co.locals().get(KEPT);
                    co.finish(v)
                }
                _ => co.unknown_point(),
            }
        }
        fn live_at(_point: SuspendPoint) -> LiveSet {
            LiveSet::NONE
        }
    }
    let co = Coroutine::new(Forgetful);
    let _ = co.resume();
    let _ = co.resume();
}

#[test]
#[should_panic(expected = "no resume value is pending")]
fn reading_the_resume_value_twice() {
    struct Greedy;
    impl Body for Greedy {
        type Input = i64;
        type Output = i64;
        fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
            match co.point().index() {
                0 => co.yield_value(1, 0),
                1 => {
                    let a = co.resumed_with();
                    let b = co.resumed_with();
                    co.yield_value(1, a + b)
                }
                _ => co.unknown_point(),
            }
        }
    }
    let co = Coroutine::new(Greedy);
    let _ = co.resume_with(1);
    let _ = co.resume_with(2);
}

#[test]
#[should_panic(expected = "tracked continuation is mid-transfer")]
fn invoking_a_tracked_handle_mid_transfer() {
    type Slot = Rc<RefCell<Option<Resume<(), (), TrackedContinuation>>>>;

    /// Transfers through the handle in the slot.
    struct Caller {
        slot: Slot,
    }
    impl Body for Caller {
        type Input = ();
        type Output = ();
        fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
            let slot = self.slot.borrow();
            let Some(k) = slot.as_ref() else {
                co.unknown_point()
            };
            co.transfer_via(1, k, ())
        }
    }

    /// Runs behind the handle and tries to invoke it again.
    struct Behind {
        slot: Slot,
    }
    impl Body for Behind {
        type Input = ();
        type Output = ();
        fn resume(&mut self, co: &mut Resumption<'_, Self>) -> Suspend<Self> {
            if let Some(mut k) = self.slot.borrow_mut().take() {
                k.resume();
            }
            co.finish(())
        }
    }

    let slot: Slot = Rc::new(RefCell::new(None));
    let target = Coroutine::new(Behind {
        slot: Rc::clone(&slot),
    });
    *slot.borrow_mut() = Some(target.detach());
    let caller = Coroutine::new(Caller { slot });
    caller.resume();
}

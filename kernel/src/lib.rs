//! Baton Kernel: a symmetric coroutine engine.
//!
//! Coroutines hand control directly to one another through continuation
//! handles. Every hand-off is returned to a single trampoline loop instead of
//! being called, so an arbitrarily long chain of transfers runs in constant
//! native stack depth.
//!
//! # API Surface
//!
//! - [`coroutine::Coroutine`] -- typed entry points (`resume`, `resume_with`, `done`)
//! - [`coroutine::Body`] -- the explicit state machine a user writes
//! - [`exec::Continuation`] / [`exec::TrackedContinuation`] -- the two handle encodings
//! - [`exec::Trampoline`] -- the constant-stack driver
//!
//! # Module Dependency Direction
//!
//! `transfer` ← `exec` ← `coroutine`
//!
//! One-way only. No cycles. `error` is shared by all three.
//!
//! # Fatal usage violations
//!
//! The engine has no recoverable error path. Resuming a finished coroutine,
//! invoking an invalid continuation, and the other cases enumerated by
//! [`error::UsageViolation`] are logic errors in the caller or the body: they
//! are logged and raised as a panic. Bodies must not let panics escape across a
//! suspend point; a coroutine whose body panicked is left unusable.
//!
//! # Threading
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and cooperative.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod coroutine;
pub mod error;
pub mod exec;
pub mod transfer;

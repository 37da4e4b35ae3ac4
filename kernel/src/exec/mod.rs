//! Execution units, the trampoline that drives them, and the continuation
//! handles that name them.
//!
//! # Dependency direction
//!
//! `unit` ← `trampoline` ← `continuation` ← `tracked` ← `resume`

pub mod continuation;
pub mod resume;
pub mod tracked;
pub mod trampoline;
pub mod unit;

pub use continuation::Continuation;
pub use resume::{Handle, Resume};
pub use tracked::TrackedContinuation;
pub use trampoline::{Landing, Trampoline, TrampolineConfig};
pub use unit::{ExecutionUnit, Incoming, Outgoing, Target, UnitRef};

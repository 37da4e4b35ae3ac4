//! Coroutines: explicit state-machine bodies driven through the trampoline.
//!
//! A [`Coroutine`] owns a [`Body`], a suspend point, a self-handle naming
//! itself, a caller handle rebound on every entry, the initial value (captured
//! on the first resume), and a table of [`LiveLocals`].

pub mod body;
pub mod entry;
pub mod locals;
mod machine;
pub mod suspend;

pub use body::{Body, Resumption, Suspend};
pub use entry::Coroutine;
pub use locals::{LiveLocals, LiveSet, Local, MAX_LOCALS};
pub use suspend::SuspendPoint;

//! `SuspendPoint`: where a body re-enters.

use crate::error::{fatal, UsageViolation};

/// The resume position of a coroutine body.
///
/// `START` (0) before the first resume, `DONE` after the body finished,
/// otherwise the index of the arm the body resumes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuspendPoint(u32);

impl SuspendPoint {
    /// Initial point of every coroutine.
    pub const START: Self = Self(0);
    /// Terminal sentinel.
    pub const DONE: Self = Self(u32::MAX);

    /// A resume point chosen by a body.
    ///
    /// # Panics
    ///
    /// Fatal usage violation for `0` (means "not started" and would re-capture
    /// the initial value) and for the `DONE` sentinel.
    #[must_use]
    #[track_caller]
    pub fn resume_at(index: u32) -> Self {
        if index == Self::START.0 || index == Self::DONE.0 {
            fatal(UsageViolation::ReservedSuspendPoint { point: index });
        }
        Self(index)
    }

    /// The raw index (what a body matches on).
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_start(self) -> bool {
        self.0 == Self::START.0
    }

    #[must_use]
    pub const fn is_done(self) -> bool {
        self.0 == Self::DONE.0
    }
}

impl std::fmt::Display for SuspendPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_done() {
            f.write_str("done")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

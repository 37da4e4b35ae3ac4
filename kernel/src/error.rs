//! Usage violations: the engine's only failure category.
//!
//! Every variant is a logic error in a coroutine body or its caller (the
//! analogue of dereferencing past an iterator's end). None of them is
//! recoverable: [`fatal`] logs the violation and panics.

use crate::transfer::TransferKind;

/// A fatal precondition violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageViolation {
    /// A coroutine whose suspend point is `DONE` was resumed.
    ResumedFinished,
    /// An invalid (consumed, not yet rebound) continuation was invoked or released.
    InvalidContinuation,
    /// The trampoline was started at the driver (null) target.
    NullTrampolineStart,
    /// A continuation named an execution unit that has been dropped.
    DanglingTarget,
    /// An execution unit was stepped while it was already mid-step.
    Reentered,
    /// A transfer value was read with a different kind than it was written with.
    TransferMismatch {
        expected: &'static str,
        found: TransferKind,
    },
    /// An integer transfer value does not fit the reader's integer type.
    IntegerOutOfRange { expected: &'static str, value: i64 },
    /// A live local was read but never stored (or already released).
    LocalMissing { slot: u8 },
    /// A live local was read with a different type than it was stored with.
    LocalTypeMismatch { slot: u8 },
    /// A body was re-entered at a suspend point it does not handle.
    UnknownSuspendPoint { point: u32 },
    /// A body tried to suspend at point `0` or at the `DONE` sentinel.
    ReservedSuspendPoint { point: u32 },
    /// A body read the resume value twice, or read one that was never supplied.
    MissingResumeValue,
    /// A body read its initial value before it was captured.
    MissingInitialValue,
    /// The trampoline ran more steps than its configured budget.
    StepBudgetExceeded { budget: u64 },
    /// A continuation was handed back to a coroutine it does not name.
    ForeignContinuation,
    /// A tracked continuation was detached or invoked while a transfer through it was in flight.
    DetourInFlight,
}

impl std::fmt::Display for UsageViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResumedFinished => write!(f, "resumed a finished coroutine"),
            Self::InvalidContinuation => write!(f, "invoked an invalid continuation"),
            Self::NullTrampolineStart => write!(f, "trampoline started at the null target"),
            Self::DanglingTarget => write!(f, "continuation names a dropped execution unit"),
            Self::Reentered => write!(f, "execution unit re-entered while mid-step"),
            Self::TransferMismatch { expected, found } => {
                write!(f, "transfer value mismatch: expected {expected}, found {found}")
            }
            Self::IntegerOutOfRange { expected, value } => {
                write!(f, "transfer value {value} does not fit {expected}")
            }
            Self::LocalMissing { slot } => write!(f, "live local {slot} is not stored"),
            Self::LocalTypeMismatch { slot } => {
                write!(f, "live local {slot} read with the wrong type")
            }
            Self::UnknownSuspendPoint { point } => {
                write!(f, "body has no arm for suspend point {point}")
            }
            Self::ReservedSuspendPoint { point } => {
                write!(f, "suspend point {point} is reserved")
            }
            Self::MissingResumeValue => write!(f, "no resume value is pending"),
            Self::MissingInitialValue => write!(f, "initial value has not been captured"),
            Self::StepBudgetExceeded { budget } => {
                write!(f, "trampoline exceeded its step budget of {budget}")
            }
            Self::ForeignContinuation => {
                write!(f, "continuation does not name this coroutine")
            }
            Self::DetourInFlight => write!(f, "tracked continuation is mid-transfer"),
        }
    }
}

impl std::error::Error for UsageViolation {}

/// Abort on a usage violation.
///
/// # Panics
///
/// Always. The panic message is the violation's `Display` text.
#[cold]
#[track_caller]
pub fn fatal(violation: UsageViolation) -> ! {
    tracing::error!(%violation, "fatal coroutine usage violation");
    panic!("{violation}");
}

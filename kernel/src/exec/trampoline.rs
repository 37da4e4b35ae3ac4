//! The transfer trampoline: the only place that steps execution units.
//!
//! Every unit returns "where to go next" instead of calling it, and this loop
//! follows those answers. A chain of N transfers therefore costs N loop
//! iterations and one native stack frame, whatever N is.

use crate::error::{fatal, UsageViolation};
use crate::exec::unit::{Incoming, Outgoing, Target};
use crate::transfer::TransferValue;

/// Trampoline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrampolineConfig {
    /// Maximum number of steps in one run. `None` (the default) is unbounded.
    ///
    /// Exceeding the budget is a fatal usage violation: it turns a runaway
    /// chain of transfers into an immediate, diagnosable abort.
    pub step_budget: Option<u64>,
}

/// Result of one trampoline run.
#[derive(Debug)]
pub struct Landing {
    /// The value handed to the driver by the final step.
    pub value: TransferValue,
    /// The unit that ran last (so the caller can resume the right place next time).
    pub last: Target,
    /// Number of steps executed.
    pub steps: u64,
}

/// The constant-stack driver.
#[derive(Debug, Clone, Default)]
pub struct Trampoline {
    config: TrampolineConfig,
}

impl Trampoline {
    /// A trampoline with the default (unbounded) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A trampoline with an explicit configuration.
    #[must_use]
    pub fn with_config(config: TrampolineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &TrampolineConfig {
        &self.config
    }

    /// Step units starting at `start` until one hands control to the driver.
    ///
    /// The first step sees `Target::Driver` as its origin; every later step
    /// sees the unit that ran before it.
    ///
    /// # Panics
    ///
    /// Fatal usage violation if `start` is the driver (null) target, if a
    /// target's unit has been dropped, or if the step budget is exceeded.
    pub fn run(&self, start: Target, value: TransferValue) -> Landing {
        let Target::Unit(mut current) = start else {
            fatal(UsageViolation::NullTrampolineStart)
        };
        let mut value = value;
        let mut origin = Target::Driver;
        let mut steps: u64 = 0;

        loop {
            if let Some(budget) = self.config.step_budget {
                if steps >= budget {
                    fatal(UsageViolation::StepBudgetExceeded { budget });
                }
            }

            // Hold a strong reference for the duration of the step so the
            // unit cannot be freed underneath itself.
            let Some(unit) = current.upgrade() else {
                fatal(UsageViolation::DanglingTarget)
            };
            let Outgoing { value: next_value, next } = unit.step(Incoming { value, origin });
            drop(unit);
            steps += 1;
            value = next_value;

            match next {
                Target::Driver => {
                    tracing::trace!(steps, "trampoline landed");
                    return Landing {
                        value,
                        last: Target::Unit(current),
                        steps,
                    };
                }
                Target::Unit(next_unit) => {
                    origin = Target::Unit(std::mem::replace(&mut current, next_unit));
                }
            }
        }
    }
}

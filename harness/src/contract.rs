//! Scenario contract: the minimal trait a recorded scenario implements.
//!
//! A scenario owns its coroutines and its script of resumes. It may NOT
//! compute digests or touch the filesystem; that is the transcript layer's
//! job.

use crate::error::HarnessError;
use crate::policy::RunPolicyV1;
use crate::transcript::TranscriptV1;

/// A scripted run of one or more coroutines.
pub trait Scenario {
    /// Unique scenario identifier (e.g., `"multiply"`).
    fn scenario_id(&self) -> &'static str;

    /// Run the script under `policy` and return what was observed.
    ///
    /// Each call builds fresh coroutines, so repeated runs are independent.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidPolicy`] if `policy` does not validate.
    ///
    /// # Panics
    ///
    /// A usage violation inside the run (for example an exhausted step
    /// budget) is fatal and panics.
    fn run(&self, policy: &RunPolicyV1) -> Result<TranscriptV1, HarnessError>;
}

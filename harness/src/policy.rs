//! Run policy: the conditions a scenario is run under.
//!
//! The policy is part of every transcript (and so of its digest). Scenarios do
//! NOT choose their own policy; the caller passes one in.

use baton_kernel::exec::{Trampoline, TrampolineConfig};

use crate::canon::canonical_json_bytes;
use crate::digest::{canonical_hash, ContentHash, DOMAIN_POLICY};
use crate::error::HarnessError;

/// Default length of the relay chain.
pub const DEFAULT_CHAIN_DEPTH: usize = 10_000;

/// Policy for one scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPolicyV1 {
    /// Per-resume trampoline step budget. `None` is unbounded.
    pub step_budget: Option<u64>,
    /// Number of links in the `relay_chain` scenario.
    pub chain_depth: usize,
}

impl Default for RunPolicyV1 {
    fn default() -> Self {
        Self {
            step_budget: None,
            chain_depth: DEFAULT_CHAIN_DEPTH,
        }
    }
}

impl RunPolicyV1 {
    /// Reject policies no scenario can run under.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidPolicy`] for a zero step budget or a
    /// zero chain depth.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.step_budget == Some(0) {
            return Err(HarnessError::InvalidPolicy {
                detail: "step_budget must be at least 1".into(),
            });
        }
        if self.chain_depth == 0 {
            return Err(HarnessError::InvalidPolicy {
                detail: "chain_depth must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The trampoline every resume in the run uses.
    #[must_use]
    pub fn trampoline(&self) -> Trampoline {
        Trampoline::with_config(TrampolineConfig {
            step_budget: self.step_budget,
        })
    }

    /// The policy as a JSON value (recorded in transcripts).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "chain_depth": self.chain_depth,
            "schema_version": "run_policy.v1",
            "step_budget": self.step_budget,
        })
    }

    /// Digest of the policy's canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Canon`] if rendering fails.
    pub fn digest(&self) -> Result<ContentHash, HarnessError> {
        let bytes = canonical_json_bytes(&self.to_json())?;
        Ok(canonical_hash(DOMAIN_POLICY, &bytes))
    }
}

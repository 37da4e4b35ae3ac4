//! `TranscriptV1`: the ordered record of what a scenario observed.
//!
//! The transcript is authoritative for a run: two runs of the same scenario
//! under the same policy must produce byte-identical canonical JSON, and
//! therefore the same digest.

use serde::{Deserialize, Serialize};

use crate::canon::canonical_json_bytes;
use crate::digest::{canonical_hash, ContentHash, DOMAIN_TRANSCRIPT};
use crate::error::HarnessError;
use crate::policy::RunPolicyV1;

/// Schema tag written into every transcript.
pub const TRANSCRIPT_SCHEMA_VERSION: &str = "transcript.v1";

/// One thing a scenario saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    /// An external resume of the scenario's driven coroutine.
    Invoke {
        /// Zero-based invocation index.
        index: u64,
        /// The argument, for coroutines that consume one.
        arg: Option<i64>,
        /// The produced value, for coroutines that produce one.
        result: Option<i64>,
        /// `done()` right after the resume returned.
        done: bool,
    },
    /// A value the coroutine emitted on the side (through its observer).
    Emit { value: i64 },
}

/// The full record of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptV1 {
    pub schema_version: String,
    pub scenario_id: String,
    pub policy: serde_json::Value,
    pub observations: Vec<Observation>,
    /// `done()` of the driven coroutine after the last observation.
    pub final_done: bool,
}

impl TranscriptV1 {
    /// Canonical JSON bytes of the transcript.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] if the transcript cannot be rendered.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, HarnessError> {
        let value = serde_json::to_value(self)?;
        Ok(canonical_json_bytes(&value)?)
    }

    /// Digest of [`TranscriptV1::canonical_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] if the transcript cannot be rendered.
    pub fn digest(&self) -> Result<ContentHash, HarnessError> {
        Ok(canonical_hash(DOMAIN_TRANSCRIPT, &self.canonical_bytes()?))
    }

    /// Results of every invocation, in order (skipping `None`).
    #[must_use]
    pub fn results(&self) -> Vec<i64> {
        self.observations
            .iter()
            .filter_map(|o| match o {
                Observation::Invoke { result, .. } => *result,
                Observation::Emit { .. } => None,
            })
            .collect()
    }

    /// Every emitted value, in order.
    #[must_use]
    pub fn emitted(&self) -> Vec<i64> {
        self.observations
            .iter()
            .filter_map(|o| match o {
                Observation::Emit { value } => Some(*value),
                Observation::Invoke { .. } => None,
            })
            .collect()
    }
}

/// Accumulates observations during a run.
#[derive(Debug)]
pub struct TranscriptBuilder {
    scenario_id: String,
    policy: serde_json::Value,
    observations: Vec<Observation>,
    invocations: u64,
}

impl TranscriptBuilder {
    #[must_use]
    pub fn new(scenario_id: &str, policy: &RunPolicyV1) -> Self {
        Self {
            scenario_id: scenario_id.to_string(),
            policy: policy.to_json(),
            observations: Vec::new(),
            invocations: 0,
        }
    }

    /// Record one external resume.
    pub fn invoke(&mut self, arg: Option<i64>, result: Option<i64>, done: bool) {
        self.observations.push(Observation::Invoke {
            index: self.invocations,
            arg,
            result,
            done,
        });
        self.invocations += 1;
    }

    /// Record values emitted since the last call.
    pub fn emit_all(&mut self, values: impl IntoIterator<Item = i64>) {
        self.observations
            .extend(values.into_iter().map(|value| Observation::Emit { value }));
    }

    #[must_use]
    pub fn finish(self, final_done: bool) -> TranscriptV1 {
        TranscriptV1 {
            schema_version: TRANSCRIPT_SCHEMA_VERSION.to_string(),
            scenario_id: self.scenario_id,
            policy: self.policy,
            observations: self.observations,
            final_done,
        }
    }
}

//! Recoverable harness errors.
//!
//! The kernel has no recoverable failures; everything here is about running
//! scenarios and persisting their transcripts.

use crate::canon::CanonError;

/// Error running a scenario or reading/writing its transcript.
#[derive(Debug)]
pub enum HarnessError {
    /// No scenario with this id is registered.
    UnknownScenario { id: String },
    /// A run policy failed validation.
    InvalidPolicy { detail: String },
    /// A scenario was configured with parameters its bodies cannot run.
    InvalidScenario { detail: String },
    /// Canonical JSON rendering failed.
    Canon(CanonError),
    /// I/O error reading or writing a transcript directory.
    Io { detail: String },
    /// A transcript file is not valid JSON for `TranscriptV1`.
    Json { detail: String },
    /// The stored digest does not match the transcript bytes.
    DigestMismatch { stored: String, recomputed: String },
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownScenario { id } => write!(f, "unknown scenario: {id}"),
            Self::InvalidPolicy { detail } => write!(f, "invalid run policy: {detail}"),
            Self::InvalidScenario { detail } => write!(f, "invalid scenario: {detail}"),
            Self::Canon(e) => write!(f, "canonical JSON error: {e}"),
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::Json { detail } => write!(f, "transcript JSON error: {detail}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Canon(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CanonError> for HarnessError {
    fn from(e: CanonError) -> Self {
        Self::Canon(e)
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            detail: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            detail: e.to_string(),
        }
    }
}

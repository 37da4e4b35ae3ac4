//! Transcript persistence: write/read a transcript directory.
//!
//! ```text
//! <dir>/
//!   transcript.json          canonical JSON of the TranscriptV1
//!   transcript_digest.txt    ASCII digest string ("sha256:...")
//! ```
//!
//! Reading fails closed: a missing file, a digest that does not match the
//! bytes on disk, or bytes that are not the canonical rendering are errors.

use std::path::Path;

use crate::digest::{canonical_hash, ContentHash, DOMAIN_TRANSCRIPT};
use crate::error::HarnessError;
use crate::transcript::TranscriptV1;

pub const TRANSCRIPT_FILENAME: &str = "transcript.json";
pub const DIGEST_FILENAME: &str = "transcript_digest.txt";

/// Write `transcript` into `dir` (created if missing). Returns its digest.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] on write failure, or a rendering error.
pub fn write_transcript_dir(
    dir: &Path,
    transcript: &TranscriptV1,
) -> Result<ContentHash, HarnessError> {
    let bytes = transcript.canonical_bytes()?;
    let digest = canonical_hash(DOMAIN_TRANSCRIPT, &bytes);
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(TRANSCRIPT_FILENAME), &bytes)?;
    std::fs::write(dir.join(DIGEST_FILENAME), digest.as_str())?;
    tracing::debug!(dir = %dir.display(), digest = %digest, "transcript written");
    Ok(digest)
}

/// Read and verify a transcript directory.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if a file is missing or unreadable,
/// [`HarnessError::DigestMismatch`] if the stored digest does not match the
/// transcript bytes, and [`HarnessError::Json`] if the bytes do not parse or
/// are not in canonical form.
pub fn read_transcript_dir(dir: &Path) -> Result<TranscriptV1, HarnessError> {
    let bytes = std::fs::read(dir.join(TRANSCRIPT_FILENAME))?;
    let stored = std::fs::read_to_string(dir.join(DIGEST_FILENAME))?;
    let stored = stored.trim();

    let recomputed = canonical_hash(DOMAIN_TRANSCRIPT, &bytes);
    if ContentHash::parse(stored).as_ref() != Some(&recomputed) {
        return Err(HarnessError::DigestMismatch {
            stored: stored.to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }

    let transcript: TranscriptV1 = serde_json::from_slice(&bytes)?;
    if transcript.canonical_bytes()? != bytes {
        return Err(HarnessError::Json {
            detail: format!("{TRANSCRIPT_FILENAME} is not in canonical form"),
        });
    }
    Ok(transcript)
}

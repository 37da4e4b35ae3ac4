//! Transcript directories: write, read back, and fail closed on tampering.

use baton_harness::error::HarnessError;
use baton_harness::policy::RunPolicyV1;
use baton_harness::scenarios::all;
use baton_harness::transcript_io::{
    read_transcript_dir, write_transcript_dir, DIGEST_FILENAME, TRANSCRIPT_FILENAME,
};

fn policy() -> RunPolicyV1 {
    RunPolicyV1 {
        chain_depth: 16,
        ..RunPolicyV1::default()
    }
}

#[test]
fn every_scenario_round_trips_through_a_directory() {
    let tmp = tempfile::tempdir().unwrap();
    for scenario in all() {
        let dir = tmp.path().join(scenario.scenario_id());
        let transcript = scenario.run(&policy()).unwrap();
        let digest = write_transcript_dir(&dir, &transcript).unwrap();
        let stored = std::fs::read_to_string(dir.join(DIGEST_FILENAME)).unwrap();
        assert_eq!(stored, digest.as_str());
        assert_eq!(read_transcript_dir(&dir).unwrap(), transcript);
    }
}

#[test]
fn rewritten_digest_file_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let transcript = all()[0].run(&policy()).unwrap();
    write_transcript_dir(tmp.path(), &transcript).unwrap();
    std::fs::write(
        tmp.path().join(DIGEST_FILENAME),
        "sha256:0000000000000000000000000000000000000000000000000000000000000000",
    )
    .unwrap();
    let err = read_transcript_dir(tmp.path()).unwrap_err();
    assert!(matches!(err, HarnessError::DigestMismatch { .. }), "{err}");
}

#[test]
fn missing_transcript_is_an_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let transcript = all()[0].run(&policy()).unwrap();
    write_transcript_dir(tmp.path(), &transcript).unwrap();
    std::fs::remove_file(tmp.path().join(TRANSCRIPT_FILENAME)).unwrap();
    assert!(matches!(
        read_transcript_dir(tmp.path()),
        Err(HarnessError::Io { .. })
    ));
}

#[test]
fn directory_path_is_not_hashed() {
    let tmp = tempfile::tempdir().unwrap();
    let transcript = all()[1].run(&policy()).unwrap();
    let a = write_transcript_dir(&tmp.path().join("a"), &transcript).unwrap();
    let b = write_transcript_dir(&tmp.path().join("nested").join("b"), &transcript).unwrap();
    assert_eq!(a, b);
}

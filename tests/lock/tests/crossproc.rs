//! Cross-process determinism: the `scenario_fixture` binary prints the same
//! transcript digest for every scenario regardless of working directory,
//! locale, or log filter.

use std::process::Command;

use baton_harness::scenarios::all;
use lock_tests::helpers::{fixture_binary, workspace_root};

fn run_variant(id: &str, work_dir: &std::path::Path, env_overrides: &[(&str, &str)]) -> String {
    let bin = fixture_binary("scenario_fixture");
    let mut command = Command::new(&bin);
    command
        .arg(id)
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LANG")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {} for {id}: {e}", bin.display())
    });
    assert!(
        output.status.success(),
        "scenario_fixture {id} exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let tmp = tempfile::tempdir().unwrap();

    for scenario in all() {
        let id = scenario.scenario_id();
        let baseline = run_variant(id, root, &[]);
        assert!(baseline.contains(&format!("scenario={id}\n")));
        assert!(baseline.contains("transcript_digest=sha256:"));

        let variants = [
            run_variant(id, tmp.path(), &[]),
            run_variant(id, root, &[("LC_ALL", "C"), ("LANG", "C")]),
            run_variant(id, root, &[("RUST_LOG", "trace")]),
        ];
        for (i, out) in variants.iter().enumerate() {
            assert_eq!(out, &baseline, "{id}: variant {i} diverged");
        }
    }
}

#[test]
fn fixture_digest_matches_in_process_run() {
    let scenario = all().into_iter().find(|s| s.scenario_id() == "multiply").unwrap();
    let transcript = scenario
        .run(&baton_harness::policy::RunPolicyV1::default())
        .unwrap();
    let out = run_variant("multiply", workspace_root(), &[]);
    let expected = format!(
        "scenario=multiply\nobservations=4\ntranscript_digest={}\nfinal_done=true\n",
        transcript.digest().unwrap()
    );
    assert_eq!(out, expected);
}

#[test]
fn unknown_scenario_fails() {
    let output = Command::new(fixture_binary("scenario_fixture"))
        .arg("no_such_scenario")
        .output()
        .expect("spawn scenario_fixture");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown scenario: no_such_scenario"));
}

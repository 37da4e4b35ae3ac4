//! Helpers shared by lock tests: small-stack threads, fixture binaries,
//! and scenario runs.

use std::path::{Path, PathBuf};

use baton_harness::policy::RunPolicyV1;
use baton_harness::scenarios::scenario_by_id;
use baton_harness::transcript::TranscriptV1;

/// Stack size for the stack-boundedness tests. Far too small for thousands
/// of nested native frames.
pub const SMALL_STACK_BYTES: usize = 256 * 1024;

/// Run `f` on a fresh thread with a `stack_bytes` stack and return its result.
///
/// A panic on the thread is re-raised on the caller with the same payload,
/// so `#[should_panic(expected = ...)]` still matches.
///
/// # Panics
///
/// If the thread cannot be spawned, or re-raises the thread's panic.
pub fn run_with_stack<T, F>(stack_bytes: usize, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let handle = std::thread::Builder::new()
        .name("small-stack".into())
        .stack_size(stack_bytes)
        .spawn(f)
        .expect("spawn small-stack thread");
    match handle.join() {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// Run a built-in scenario by id.
///
/// # Panics
///
/// If the id is unknown or the policy is invalid.
#[must_use]
pub fn run_scenario(id: &str, policy: &RunPolicyV1) -> TranscriptV1 {
    scenario_by_id(id)
        .expect("known scenario")
        .run(policy)
        .expect("scenario run")
}

/// The workspace root directory.
///
/// # Panics
///
/// If the manifest directory has no grandparent.
#[must_use]
pub fn workspace_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
}

/// Path of a binary built from this package, next to the test executable.
///
/// Not handling a Windows `.exe` suffix; Windows is not a target.
///
/// # Panics
///
/// If the test executable path cannot be resolved.
#[must_use]
pub fn fixture_binary(name: &str) -> PathBuf {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push(name);
    path
}

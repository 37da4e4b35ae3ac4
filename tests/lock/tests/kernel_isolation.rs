//! Kernel build-graph and layering locks.
//!
//! - The kernel depends on nothing but `tracing`.
//! - Kernel modules only depend one way: `transfer` <- `exec` <- `coroutine`.
//! - The kernel is single-threaded: no `Arc`, `Mutex`, or thread spawning
//!   outside test modules.
//! - Unit references are move-only, and a coroutine's unit never leaves the
//!   crate, so a coroutine can only be entered through its own handle.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use lock_tests::helpers::workspace_root;

/// Non-comment lines of every `.rs` file under `dir`, stopping at the
/// file's `#[cfg(test)]` module.
fn production_lines(dir: &Path) -> Vec<(String, usize, String)> {
    let mut out = Vec::new();
    walk(dir, &mut out);
    out
}

fn walk(dir: &Path, out: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            for (line_no, line) in content.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.starts_with("#[cfg(test)]") {
                    break;
                }
                if trimmed.starts_with("//") {
                    continue;
                }
                out.push((path.display().to_string(), line_no + 1, line.to_string()));
            }
        }
    }
}

fn assert_absent(dir: &Path, patterns: &[&str], what: &str) {
    let mut msg = String::new();
    for (file, line_no, line) in production_lines(dir) {
        for pattern in patterns {
            if line.contains(pattern) {
                let _ = writeln!(msg, "  {file}:{line_no}: {line}");
            }
        }
    }
    assert!(msg.is_empty(), "{what}:\n{msg}");
}

#[test]
fn kernel_depends_only_on_tracing() {
    let manifest = fs::read_to_string(workspace_root().join("kernel").join("Cargo.toml")).unwrap();
    let deps: Vec<&str> = manifest
        .split("[dependencies]")
        .nth(1)
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .take_while(|l| !l.starts_with('['))
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    assert_eq!(deps.len(), 1, "kernel dependencies: {deps:?}");
    assert!(deps[0].starts_with("tracing"), "{deps:?}");
}

#[test]
fn transfer_layer_does_not_reach_up() {
    let dir = workspace_root().join("kernel").join("src").join("transfer");
    assert_absent(&dir, &["crate::exec", "crate::coroutine"], "transfer depends upward");
}

#[test]
fn exec_layer_does_not_reach_up() {
    let dir = workspace_root().join("kernel").join("src").join("exec");
    assert_absent(&dir, &["crate::coroutine"], "exec depends on coroutine");
}

#[test]
fn kernel_is_single_threaded() {
    let dir = workspace_root().join("kernel").join("src");
    assert_absent(
        &dir,
        &["Arc<", "Mutex", "thread::spawn", "unsafe "],
        "kernel uses thread-shared state",
    );
}

/// The line declaring `decl` and the attribute lines directly above it.
fn declaration_head(content: &str, decl: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let Some(at) = lines.iter().position(|l| l.contains(decl)) else {
        panic!("{decl} not found");
    };
    let mut start = at;
    while start > 0 && lines[start - 1].trim_start().starts_with("#[") {
        start -= 1;
    }
    lines[start..=at].join("\n")
}

#[test]
fn unit_references_cannot_be_copied() {
    let unit_rs = fs::read_to_string(
        workspace_root()
            .join("kernel")
            .join("src")
            .join("exec")
            .join("unit.rs"),
    )
    .unwrap();
    for decl in ["pub struct UnitRef", "pub enum Target"] {
        let head = declaration_head(&unit_rs, decl);
        assert!(!head.contains("Clone"), "{decl} derives Clone:\n{head}");
    }
    assert!(!unit_rs.contains("Clone for UnitRef"));
    assert!(!unit_rs.contains("Clone for Target"));
    assert!(!unit_rs.contains("pub fn duplicate"));
}

#[test]
fn coroutine_units_are_not_publicly_nameable() {
    let src = workspace_root().join("kernel").join("src");
    for file in [
        src.join("coroutine").join("entry.rs"),
        src.join("exec").join("tracked.rs"),
    ] {
        let content = fs::read_to_string(&file).unwrap();
        assert!(
            !content.contains("pub fn unit("),
            "{} exposes its unit",
            file.display()
        );
    }
}

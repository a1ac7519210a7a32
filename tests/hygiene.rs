//! Hygiene: enforces coding standards at test time.
//!
//! Scans the production sources under `src/` for panicking or error-dropping
//! patterns. Each has a budget; the budget never grows.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`, excluding test modules and fixtures.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        let is_test = path_str.ends_with("_test.rs") || path_str.ends_with("test_helpers.rs");
        if is_test || path.extension().is_none_or(|e| e != "rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(pattern: &str) -> Vec<(String, usize)> {
    source_files()
        .into_iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then_some((file.path, count))
        })
        .collect()
}

fn assert_budget(pattern: &str, max: usize) {
    let hits = hits(pattern);
    let count: usize = hits.iter().map(|(_, c)| c).sum();
    let listing = hits
        .iter()
        .map(|(path, c)| format!("  {path}: {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(count <= max, "`{pattern}` budget exceeded: found {count}, max {max}.\n{listing}");
}

#[test]
fn sources_are_found() {
    assert!(source_files().iter().any(|f| f.path.ends_with("lib.rs")));
}

#[test]
fn unwrap_budget() {
    assert_budget(".unwrap()", 0);
}

#[test]
fn expect_budget() {
    assert_budget(".expect(", 0);
}

#[test]
fn panic_budget() {
    assert_budget("panic!(", 0);
    assert_budget("unreachable!(", 0);
    assert_budget("todo!(", 0);
    assert_budget("unimplemented!(", 0);
}

#[test]
fn silent_discard_budget() {
    assert_budget("let _ =", 0);
}

#[test]
fn dot_ok_budget() {
    // Header decoding, error-body probing, and optional env lookups.
    assert_budget(".ok()", 3);
}

//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code (timers belong to the host)
//! - The ticker core stays headless: no terminal or async runtime dependencies
//!
//! These tests are designed to catch violations early in the development cycle.

use std::path::{Path, PathBuf};

/// Root of the workspace this crate lives in
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Every `.rs` file under `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// The code part of a source line, with any `//` comment stripped
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

//! Integration Test: Headless Core
//!
//! **Policy**: `ticker-core` knows nothing about terminals or async runtimes.
//! Rendering surfaces depend on the core, never the other way around.

use std::fs;

use architectural_enforcement::{code_part, rust_files, workspace_root};

/// Crates that belong to surfaces, not the core
const SURFACE_CRATES: &[&str] = &["ratatui", "crossterm", "tokio", "futures", "ticker_tui"];

#[test]
fn test_core_manifest_has_no_surface_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("ticker/core/Cargo.toml"))
        .expect("ticker-core manifest");

    let violations: Vec<&str> = manifest
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| line.split('=').next())
        .map(|key| key.trim())
        .filter(|key| {
            SURFACE_CRATES
                .iter()
                .any(|name| *key == name.replace('_', "-") || key == name)
        })
        .collect();

    assert!(
        violations.is_empty(),
        "ticker-core must stay headless, found: {violations:?}"
    );
}

#[test]
fn test_core_sources_do_not_use_surface_crates() {
    let mut violations = Vec::new();

    for path in rust_files("ticker/core") {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in content.lines().enumerate() {
            let code = code_part(line);
            for name in SURFACE_CRATES {
                if code.contains(&format!("{name}::")) {
                    violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "ticker-core must stay headless:\n{}",
        violations.join("\n")
    );
}

//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. The ticker is
//! driven entirely by host timers and notifications.
//! **Exceptions**: Frame rate limiting in the TUI event loop

use std::fs;
use std::path::Path;

use architectural_enforcement::{code_part, rust_files};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ ACCEPTABLE sleep uses:");
        eprintln!("  - Frame rate limiting in the TUI event loop");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - Sleeping between ticker phases (use Host::set_timeout)");
        eprintln!("  - Sleep to 'wait' for a transition (use the transition notification)");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for path in rust_files("ticker/core/src") {
        check_file(&path, &mut violations, false);
    }
    for path in rust_files("tui/src") {
        check_file(&path, &mut violations, true);
    }

    violations
}

fn check_file(path: &Path, violations: &mut Vec<String>, allow_frame_limiting: bool) {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return,
    };

    let lines: Vec<&str> = content.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let code = code_part(line);
        if !(code.contains("::sleep(") || code.contains(".sleep(")) {
            continue;
        }

        // Frame pacing is only allowed in the app loop
        if allow_frame_limiting
            && path.ends_with("tui/src/app.rs")
            && is_frame_limiting_context(&lines, idx)
        {
            continue;
        }

        violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
    }
}

/// Check if sleep is used for frame rate limiting (acceptable in TUI)
fn is_frame_limiting_context(lines: &[&str], current_idx: usize) -> bool {
    let context_range = current_idx.saturating_sub(10)..std::cmp::min(current_idx + 5, lines.len());

    lines[context_range].iter().any(|line| {
        let line = line.to_lowercase();
        line.contains("frame") || line.contains("fps") || line.contains("tick_rate")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_limiting_detection() {
        let test_code = vec![
            "async fn run(&mut self) {",
            "    loop {",
            "        render();",
            "        // Frame tick",
            "        tokio::time::sleep(FRAME_INTERVAL).await;",
            "    }",
            "}",
        ];

        assert!(
            is_frame_limiting_context(&test_code, 4),
            "Should detect frame rate limiting"
        );
    }

    #[test]
    fn test_plain_sleep_is_not_frame_limiting() {
        let test_code = vec![
            "fn wait_for_phase() {",
            "    std::thread::sleep(Duration::from_millis(2000));",
            "}",
        ];

        assert!(!is_frame_limiting_context(&test_code, 1));
    }
}

// src/report.rs
// =============================================================================
// This module renders check results for human and machine consumption.
//
// Three outputs:
// - A fixed-width table for the terminal (default)
// - A pretty-printed JSON array (--json)
// - A line-delimited split of reachable/unreachable URLs, written to
//   <out-dir>/valid.txt and <out-dir>/invalid.txt on every run
//
// Rendering is kept separate from printing so tests can assert on the
// produced strings without capturing stdout.
// =============================================================================

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::checker::CheckResult;

const URL_COLUMN: usize = 60;

/// Renders results as a fixed-width table with one row per URL.
pub fn render_table(results: &[CheckResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<URL_COLUMN$} {:>6} {:<5} {:>8}  {}",
        "URL", "STATUS", "OK", "ATTEMPTS", "ERROR"
    );
    let _ = writeln!(out, "{}", "=".repeat(105));

    for result in results {
        let _ = writeln!(
            out,
            "{:<URL_COLUMN$} {:>6} {:<5} {:>8}  {}",
            truncate(&result.url, URL_COLUMN - 3),
            result.status,
            result.ok,
            result.attempts,
            result.error
        );
    }
    out
}

/// Renders results as a pretty-printed JSON array.
pub fn render_json(results: &[CheckResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("serializing results to json")
}

/// Writes the reachable/unreachable URL split under `out_dir`.
///
/// Undispatched results (empty URL, from a cancelled batch) are skipped,
/// since there is no URL to write.
pub fn write_split(results: &[CheckResult], out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut valid = String::new();
    let mut invalid = String::new();
    for result in results {
        if result.url.is_empty() {
            continue;
        }
        let target = if result.ok { &mut valid } else { &mut invalid };
        target.push_str(&result.url);
        target.push('\n');
    }

    let valid_path = out_dir.join("valid.txt");
    fs::write(&valid_path, valid)
        .with_context(|| format!("writing {}", valid_path.display()))?;
    let invalid_path = out_dir.join("invalid.txt");
    fs::write(&invalid_path, invalid)
        .with_context(|| format!("writing {}", invalid_path.display()))?;
    Ok(())
}

// Truncation is by characters, not bytes, so multi-byte URLs can't panic
// the renderer.
fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() <= max + 3 {
        return url.to_string();
    }
    let mut short: String = url.chars().take(max).collect();
    short.push_str("...");
    short
}

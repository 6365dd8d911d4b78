//! JSON output helpers.
//!
//! `--json` writes exactly one document to stdout: the run report on success
//! or an error object on failure.

use anyhow::{Context, Result};

use crate::domain::RunReport;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "...",
///   "exit_code": 3
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str, exit_code: u8) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
        "exit_code": exit_code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a completed run.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("JSON serialization failed")
}

pub mod check;
pub mod completions;
pub mod man_pages;
pub mod show;

use console::Style;
use reqsync_core::ComparisonReport;

pub const BIN_NAME: &str = "reqsync";

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_MISMATCH: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_FAILURE: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Human-readable mismatch diagnostic, one entry per line, sides labelled by path.
pub fn render_report(report: &ComparisonReport) -> String {
    let removed = Style::new().for_stderr().red();
    let added = Style::new().for_stderr().green();

    let mut lines = vec![format!(
        "{} and {} do not match ({} differing entries)",
        report.left,
        report.right,
        report.mismatch_count()
    )];
    if !report.only_in_left.is_empty() {
        lines.push(format!("  only in {}:", report.left));
        for spec in &report.only_in_left {
            lines.push(format!("    {}", removed.apply_to(format!("- {spec}"))));
        }
    }
    if !report.only_in_right.is_empty() {
        lines.push(format!("  only in {}:", report.right));
        for spec in &report.only_in_right {
            lines.push(format!("    {}", added.apply_to(format!("+ {spec}"))));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

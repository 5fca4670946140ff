use crate::report::AlignmentReport;

/// Format a report as pretty JSON.
pub fn format_json(report: &AlignmentReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

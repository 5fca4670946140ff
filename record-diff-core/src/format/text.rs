use crate::record::FieldValue;
use crate::report::{AlignmentReport, ReportRow, RowStatus};

/// Format a report as plain text, one line per row plus one per changed
/// field and one per reorder link.
///
/// Prefixes: `=` identical, `-` only on A, `+` only on B, `~` different,
/// `^` different and reordered, `>` reorder link.
pub fn format_text(report: &AlignmentReport) -> String {
    let mut lines = Vec::with_capacity(report.rows.len() + report.links.len());
    for row in &report.rows {
        push_row(&mut lines, row);
    }
    for link in &report.links {
        let name = report
            .rows
            .get(link.index_a)
            .map(|row| row.a.record.name.as_str())
            .unwrap_or_default();
        lines.push(format!(
            "> a[{}] -> b[{}] {name} (found from {})",
            link.index_a, link.index_b, link.origin
        ));
    }
    lines.join("\n")
}

fn push_row(lines: &mut Vec<String>, row: &ReportRow) {
    let name_a = &row.a.record.name;
    let name_b = &row.b.record.name;
    let label = if name_a.to_lowercase() == name_b.to_lowercase() {
        name_a.clone()
    } else {
        format!("{name_a} <> {name_b}")
    };

    match row.status() {
        RowStatus::Identical => lines.push(format!("= [{}] {label}", row.index)),
        RowStatus::MissingA => lines.push(format!("+ [{}] {label} (missing on A)", row.index)),
        RowStatus::MissingB => lines.push(format!("- [{}] {label} (missing on B)", row.index)),
        RowStatus::Different => lines.push(format!("~ [{}] {label}", row.index)),
        RowStatus::Moved => lines.push(format!("^ [{}] {label} (reordered)", row.index)),
    }

    for change in &row.changed_fields {
        let show = |value: &Option<FieldValue>| match value {
            Some(value) => format!("{value}"),
            None => "<absent>".to_string(),
        };
        lines.push(format!(
            "  {}: a={} b={}",
            change.field,
            show(&change.a),
            show(&change.b)
        ));
    }
}

/// Format a one-line summary of row counts.
pub fn format_summary(report: &AlignmentReport) -> String {
    let s = report.summary();
    format!(
        "rows={} identical={} different={} missing_a={} missing_b={} reorder_links={}",
        s.rows, s.identical, s.different, s.synthetic_a, s.synthetic_b, s.links
    )
}

use colored::Colorize;
use record_diff_core::{format_summary, format_text, AlignmentReport};

use crate::kind::ObjectKind;
use crate::plan::ProvisionPlan;
use crate::snapshot::DeviceInfo;

/// Render one kind's comparison for terminal output.
pub fn render_text(report: &AlignmentReport) -> String {
    let raw = format_text(report);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with('~') {
            line.yellow().to_string()
        } else if line.starts_with('^') {
            line.blue().to_string()
        } else if line.starts_with('>') {
            line.magenta().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Heading printed above each kind.
pub fn render_heading(kind: ObjectKind, report: &AlignmentReport) -> String {
    let order = if report.preserve_order {
        "device order"
    } else {
        "sorted by name"
    };
    format!("{} ({order})", kind.label()).bold().to_string()
}

/// Render summary counts for terminal output.
pub fn render_summary(kind: ObjectKind, report: &AlignmentReport) -> String {
    format!("{kind}: {}", format_summary(report)).cyan().to_string()
}

/// Identify the two devices being compared.
pub fn render_devices(a: &DeviceInfo, b: &DeviceInfo) -> String {
    format!(
        "A={} ({}, {}) B={} ({}, {})",
        a.display_name(),
        a.id,
        a.vendor,
        b.display_name(),
        b.id,
        b.vendor
    )
}

/// Render the provisioning plan, one line per action.
pub fn render_plan(plan: &ProvisionPlan) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "provision_plan actions={} supported={}",
        plan.len(),
        plan.supported()
    ));
    for action in &plan.actions {
        let line = match &action.reason {
            None => format!(
                "- CREATE {} {} on {} ({})",
                action.kind, action.name, action.device_id, action.target
            ),
            Some(reason) => format!(
                "- SKIP {} {} on {} ({}): {reason}",
                action.kind, action.name, action.device_id, action.target
            ),
        };
        out.push(line);
    }
    out.join("\n")
}

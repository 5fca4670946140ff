use std::fs;

use anyhow::{bail, Context, Result};
use netobj_compare::kind::ObjectKind;
use netobj_compare::plan::{plan_for_report, ProvisionPlan};
use netobj_compare::report::{
    render_devices, render_heading, render_plan, render_summary, render_text,
};
use netobj_compare::session::ComparisonSession;
use netobj_compare::snapshot::{load_snapshot, DeviceInfo, DeviceSnapshot};
use record_diff_core::{AlignmentReport, ReportSummary, Side};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{CompareArgs, OutputFormat};
use crate::path_guard;

#[derive(Debug, Serialize)]
struct CompareOutput<'a> {
    device_a: &'a DeviceInfo,
    device_b: &'a DeviceInfo,
    kinds: Vec<KindOutput<'a>>,
}

#[derive(Debug, Serialize)]
struct KindOutput<'a> {
    kind: ObjectKind,
    summary: ReportSummary,
    report: &'a AlignmentReport,
}

pub fn run_compare(args: CompareArgs) -> Result<()> {
    let left = load_snapshot(&args.left)
        .with_context(|| format!("failed to load {}", args.left.display()))?;
    let right = load_snapshot(&args.right)
        .with_context(|| format!("failed to load {}", args.right.display()))?;
    let (profile, source) = crate::resolve_profile(args.config.as_deref());
    info!(profile = %source, "comparison profile");

    let kinds = select_kinds(&args.kinds, &left, &right);
    if kinds.is_empty() {
        warn!("no object kinds present in both snapshots");
    }

    let mut session = ComparisonSession::new();
    for &kind in &kinds {
        for (side, snapshot) in [(Side::A, &left), (Side::B, &right)] {
            if let Some(collection) = snapshot.collection(kind, side) {
                session.submit(kind, collection);
            }
        }
    }

    let mut reports = Vec::with_capacity(kinds.len());
    let mut plan = ProvisionPlan::default();
    for kind in kinds {
        let report = session
            .compare(kind, &profile)
            .with_context(|| format!("failed to compare {kind}"))?;
        plan.extend(plan_for_report(kind, &report, &left.device, &right.device));
        reports.push((kind, report));
    }

    if let Some(plan_path) = &args.plan {
        path_guard::ensure_output_not_same(plan_path, &[&args.left, &args.right])?;
        let plan_json = serde_json::to_string_pretty(&plan)?;
        fs::write(plan_path, plan_json)
            .with_context(|| format!("failed to write plan file {}", plan_path.display()))?;
        info!(actions = plan.len(), path = %plan_path.display(), "provisioning plan written");
    }

    if args.quiet || args.summary {
        for (kind, report) in &reports {
            println!("{}", render_summary(*kind, report));
        }
    } else {
        match args.format {
            OutputFormat::Text => {
                println!("{}", render_devices(&left.device, &right.device));
                for (kind, report) in &reports {
                    println!();
                    println!("{}", render_heading(*kind, report));
                    if !report.is_empty() {
                        println!("{}", render_text(report));
                    }
                    println!("{}", render_summary(*kind, report));
                }
                if args.plan.is_some() {
                    println!();
                    println!("{}", render_plan(&plan));
                }
            }
            OutputFormat::Json => {
                let output = CompareOutput {
                    device_a: &left.device,
                    device_b: &right.device,
                    kinds: reports
                        .iter()
                        .map(|(kind, report)| KindOutput {
                            kind: *kind,
                            summary: report.summary(),
                            report,
                        })
                        .collect(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
    }

    if args.strict {
        let differing: Vec<String> = reports
            .iter()
            .filter(|(_, report)| report.has_differences())
            .map(|(kind, _)| kind.to_string())
            .collect();
        if !differing.is_empty() {
            bail!(
                "strict mode failed: differences in {}",
                differing.join(", ")
            );
        }
    }
    Ok(())
}

/// Kinds to compare: the requested ones in request order, or every kind
/// present in both snapshots.
fn select_kinds(
    requested: &[ObjectKind],
    left: &DeviceSnapshot,
    right: &DeviceSnapshot,
) -> Vec<ObjectKind> {
    if !requested.is_empty() {
        let mut kinds = Vec::with_capacity(requested.len());
        for kind in requested {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        return kinds;
    }

    let mut kinds = Vec::new();
    for kind in ObjectKind::ALL {
        match (left.objects.contains_key(&kind), right.objects.contains_key(&kind)) {
            (true, true) => kinds.push(kind),
            (true, false) => warn!(%kind, "skipping kind missing from {}", right.device.id),
            (false, true) => warn!(%kind, "skipping kind missing from {}", left.device.id),
            (false, false) => {}
        }
    }
    kinds
}

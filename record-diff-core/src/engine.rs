use tracing::{debug, debug_span};

use crate::align::align;
use crate::collection::Collection;
use crate::crossref::find_reorder_links;
use crate::detect::field_differences;
use crate::normalize::FieldRules;
use crate::report::{AlignmentReport, ReportRow};

/// Configures a comparison run.
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Keep device order (rule and policy lists) instead of sorting by name.
    pub preserve_order: bool,
    /// Per-field normalization table.
    pub rules: FieldRules,
}

/// Compare two collections with default options.
pub fn compare(a: &Collection, b: &Collection) -> AlignmentReport {
    compare_with_options(a, b, &CompareOptions::default())
}

/// Align two collections, flag differing rows and link reordered records.
///
/// A row is different when its two names differ (a positional pairing of
/// two distinct records) or when any field other than `name` differs.
pub fn compare_with_options(
    a: &Collection,
    b: &Collection,
    opts: &CompareOptions,
) -> AlignmentReport {
    let span = debug_span!(
        "compare",
        device_a = %a.provenance.device_id,
        device_b = %b.provenance.device_id
    );
    let _guard = span.enter();

    let alignment = align(&a.records, &b.records, opts.preserve_order);

    let mut changes = Vec::with_capacity(alignment.len());
    let mut flagged = Vec::new();
    for (index, (left, right)) in alignment.a.iter().zip(&alignment.b).enumerate() {
        let changed_fields = field_differences(&left.record, &right.record, &opts.rules);
        let different = left.record.key() != right.record.key() || !changed_fields.is_empty();
        if different {
            flagged.push(index);
        }
        changes.push((different, changed_fields));
    }

    let cross = find_reorder_links(&alignment.a, &alignment.b, &flagged);

    let rows: Vec<ReportRow> = alignment
        .a
        .into_iter()
        .zip(alignment.b)
        .zip(changes)
        .enumerate()
        .map(|(index, ((a, b), (different, changed_fields)))| ReportRow {
            index,
            a,
            b,
            different,
            changed_fields,
            moved_a: cross.moved_a.contains(&index),
            moved_b: cross.moved_b.contains(&index),
        })
        .collect();

    debug!(
        rows = rows.len(),
        flagged = flagged.len(),
        links = cross.links.len(),
        "comparison finished"
    );

    AlignmentReport {
        provenance_a: a.provenance.clone(),
        provenance_b: b.provenance.clone(),
        preserve_order: opts.preserve_order,
        rows,
        links: cross.links,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{compare, compare_with_options, CompareOptions};
    use crate::collection::{Collection, Provenance, Side};
    use crate::report::RowStatus;

    fn collection(side: Side, value: serde_json::Value) -> Collection {
        Collection::from_json(side, Provenance::new("fw", "paloalto"), value).expect("collection")
    }

    #[test]
    fn identical_inputs_report_no_differences() {
        let a = collection(Side::A, json!([{"name": "t1", "colour": "red"}]));
        let b = collection(Side::B, json!([{"name": "t1", "colour": "red"}]));
        let report = compare(&a, &b);

        assert!(!report.has_differences());
        assert_eq!(report.summary().identical, 1);
    }

    #[test]
    fn inputs_are_left_untouched() {
        let a = collection(Side::A, json!([{"name": "b"}, {"name": "a"}]));
        let b = collection(Side::B, json!([{"name": "c"}]));
        let before = (a.clone(), b.clone());

        let report = compare_with_options(
            &a,
            &b,
            &CompareOptions {
                preserve_order: true,
                ..CompareOptions::default()
            },
        );

        assert_eq!((a, b), before);
        assert_eq!(report.len(), 3);
        assert_eq!(report.rows[2].status(), RowStatus::MissingA);
    }
}

//! Per-record difference detection.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::normalize::{token_set, Comparison, FieldRules};
use crate::record::{FieldValue, Record, NAME_FIELD};

/// Why a field was reported as different.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Set-valued field with different members.
    SetMismatch,
    /// Present on both sides with unequal values.
    ValueMismatch,
    /// Present only on side B.
    MissingA,
    /// Present only on side A.
    MissingB,
}

/// One differing field of a matched record pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDifference {
    pub field: String,
    pub kind: DifferenceKind,
    pub a: Option<FieldValue>,
    pub b: Option<FieldValue>,
}

/// Return true if the two records differ in any field other than `name`.
pub fn differs(a: &Record, b: &Record, rules: &FieldRules) -> bool {
    !field_differences(a, b, rules).is_empty()
}

/// List every differing field of two records meant to be the same object.
///
/// All fields in the union of both records are checked.
pub fn field_differences(a: &Record, b: &Record, rules: &FieldRules) -> Vec<FieldDifference> {
    let fields: BTreeSet<&str> = a
        .fields
        .keys()
        .chain(b.fields.keys())
        .map(String::as_str)
        .filter(|field| *field != NAME_FIELD)
        .collect();

    let mut out = Vec::new();
    for field in fields {
        let left = a.get(field);
        let right = b.get(field);
        let kind = match rules.comparison(field) {
            Comparison::Set => compare_sets(field, left, right, rules),
            Comparison::Structural => compare_structural(left, right),
        };
        if let Some(kind) = kind {
            out.push(FieldDifference {
                field: field.to_string(),
                kind,
                a: left.cloned(),
                b: right.cloned(),
            });
        }
    }
    out
}

// An absent set-valued field counts as an empty set.
fn compare_sets(
    field: &str,
    left: Option<&FieldValue>,
    right: Option<&FieldValue>,
    rules: &FieldRules,
) -> Option<DifferenceKind> {
    let tokens = |value: Option<&FieldValue>| {
        value
            .map(|value| token_set(&rules.normalize(field, value)))
            .unwrap_or_default()
    };
    let left_tokens = tokens(left);
    let right_tokens = tokens(right);
    if left_tokens == right_tokens {
        return None;
    }

    debug!(
        field,
        left = ?left_tokens,
        right = ?right_tokens,
        "set-valued field differs"
    );
    Some(match (left, right) {
        (None, _) => DifferenceKind::MissingA,
        (_, None) => DifferenceKind::MissingB,
        _ => DifferenceKind::SetMismatch,
    })
}

fn compare_structural(
    left: Option<&FieldValue>,
    right: Option<&FieldValue>,
) -> Option<DifferenceKind> {
    match (left, right) {
        (Some(l), Some(r)) if structurally_equal(l, r) => None,
        (Some(_), Some(_)) => Some(DifferenceKind::ValueMismatch),
        (None, Some(_)) => Some(DifferenceKind::MissingA),
        (Some(_), None) => Some(DifferenceKind::MissingB),
        (None, None) => None,
    }
}

/// Recursive deep equality. Structured values need the same key count and
/// equal values under every key; arrays compare position by position.
pub fn structurally_equal(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Null, FieldValue::Null) => true,
        (FieldValue::Scalar(x), FieldValue::Scalar(y)) => x == y,
        (FieldValue::List(x), FieldValue::List(y)) => x == y,
        (FieldValue::Sequence(x), FieldValue::Sequence(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| structurally_equal(l, r))
        }
        (FieldValue::List(list), FieldValue::Sequence(seq))
        | (FieldValue::Sequence(seq), FieldValue::List(list)) => {
            list.len() == seq.len()
                && list
                    .iter()
                    .zip(seq)
                    .all(|(l, r)| matches!(r, FieldValue::Scalar(s) if s == l))
        }
        (FieldValue::Structured(x), FieldValue::Structured(y)) => {
            x.len() == y.len()
                && x.iter().all(|(key, value)| {
                    y.get(key)
                        .is_some_and(|other| structurally_equal(value, other))
                })
        }
        _ => false,
    }
}

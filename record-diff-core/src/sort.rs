use std::cmp::Ordering;

use crate::record::Record;

/// Locale-style name ordering.
///
/// Names are ordered by their case-folded form first, so `alpha`, `Beta` and
/// `gamma` sort alphabetically regardless of case. Names that fold to the same
/// text are then ordered case-sensitively with lower case first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a
        .cmp(folded_b)
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return x.cmp(&y),
        }
    }
    Ordering::Equal
}

/// Stable in-place sort of any items carrying a name.
pub fn sort_by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| compare_names(name(a), name(b)));
}

/// Return the records sorted by name. Only used for listings where order
/// carries no meaning; rule and policy lists keep their device order.
pub fn sort_records(records: &[Record]) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sort_by_name(&mut sorted, |record| record.name.as_str());
    sorted
}

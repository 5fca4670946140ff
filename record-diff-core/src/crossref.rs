use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::align::AlignedEntry;
use crate::collection::Side;

/// A record that sits at `index_a` on side A and at `index_b` on side B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReorderLink {
    pub index_a: usize,
    pub index_b: usize,
    /// The side whose scan found the pair first.
    pub origin: Side,
}

/// Links plus the per-row reorder markers for each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossReference {
    pub links: Vec<ReorderLink>,
    /// Rows whose A record has its true counterpart elsewhere.
    pub moved_a: BTreeSet<usize>,
    /// Rows whose B record has its true counterpart elsewhere.
    pub moved_b: BTreeSet<usize>,
}

/// Find same-named records at different positions among flagged rows.
///
/// For a flagged row `i`, the A record's name is searched on side B and the
/// B record's name on side A, skipping row `i` itself. Each distinct
/// `(index_a, index_b)` pair produces one link.
pub fn find_reorder_links(
    a: &[AlignedEntry],
    b: &[AlignedEntry],
    flagged: &[usize],
) -> CrossReference {
    let keys_a: Vec<String> = a.iter().map(|entry| entry.record.key()).collect();
    let keys_b: Vec<String> = b.iter().map(|entry| entry.record.key()).collect();

    let mut rows = flagged.to_vec();
    rows.sort_unstable();
    rows.dedup();

    let mut out = CrossReference::default();
    let mut seen = HashSet::new();
    for i in rows {
        let (Some(key_a), Some(key_b)) = (keys_a.get(i), keys_b.get(i)) else {
            continue;
        };

        if let Some(j) = position_elsewhere(&keys_b, i, key_a) {
            out.moved_b.insert(i);
            if seen.insert((i, j)) {
                out.links.push(ReorderLink {
                    index_a: i,
                    index_b: j,
                    origin: Side::A,
                });
            }
        }

        if let Some(j) = position_elsewhere(&keys_a, i, key_b) {
            out.moved_a.insert(i);
            if seen.insert((j, i)) {
                out.links.push(ReorderLink {
                    index_a: j,
                    index_b: i,
                    origin: Side::B,
                });
            }
        }
    }
    out
}

fn position_elsewhere(keys: &[String], skip: usize, key: &str) -> Option<usize> {
    keys.iter()
        .enumerate()
        .find(|(j, candidate)| *j != skip && candidate.as_str() == key)
        .map(|(j, _)| j)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{find_reorder_links, ReorderLink};
    use crate::align::align;
    use crate::collection::Side;
    use crate::record::Record;

    #[test]
    fn swapped_rules_link_both_ways_once() {
        let a = vec![Record::new("ruleX"), Record::new("ruleY")];
        let b = vec![Record::new("ruleY"), Record::new("ruleX")];
        let aligned = align(&a, &b, true);

        let cross = find_reorder_links(&aligned.a, &aligned.b, &[0, 1]);
        assert_eq!(
            cross.links,
            vec![
                ReorderLink {
                    index_a: 0,
                    index_b: 1,
                    origin: Side::A
                },
                ReorderLink {
                    index_a: 1,
                    index_b: 0,
                    origin: Side::B
                },
            ]
        );
        assert_eq!(cross.moved_a.len(), 2);
        assert_eq!(cross.moved_b.len(), 2);
    }

    #[test]
    fn name_match_ignores_case() {
        let a = vec![Record::new("Allow-Web"), Record::new("deny")];
        let b = vec![Record::new("DENY"), Record::new("allow-web")];
        let aligned = align(&a, &b, true);

        let cross = find_reorder_links(&aligned.a, &aligned.b, &[0]);
        assert_eq!(cross.links.len(), 2);
        assert_eq!(cross.links[0].index_b, 1);
    }

    #[test]
    fn unflagged_rows_are_not_scanned() {
        let a = vec![Record::new("x"), Record::new("y")];
        let b = vec![Record::new("y"), Record::new("x")];
        let aligned = align(&a, &b, true);

        let cross = find_reorder_links(&aligned.a, &aligned.b, &[]);
        assert!(cross.links.is_empty());
        assert!(cross.moved_a.is_empty() && cross.moved_b.is_empty());
    }
}

//! Dual-list alignment.
//!
//! [`align`] makes both sides carry every name seen on either side, exactly
//! once, at matching positions. Inputs are never modified: a first pass
//! indexes each side by case-folded name, a second pass emits fresh output.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::collection::Side;
use crate::record::Record;
use crate::sort::sort_by_name;

/// One side of an aligned row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedEntry {
    pub record: Record,
    /// True when the record was copied from the other side because this
    /// side did not have it.
    pub synthetic: bool,
    /// Position in the original input; `None` for synthetic entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
}

impl AlignedEntry {
    fn real(entry: &Indexed<'_>) -> Self {
        Self {
            record: entry.record.clone(),
            synthetic: false,
            source_index: Some(entry.index),
        }
    }

    fn synthetic(entry: &Indexed<'_>) -> Self {
        Self {
            record: entry.record.clone(),
            synthetic: true,
            source_index: None,
        }
    }
}

/// Two equal-length aligned sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Alignment {
    pub a: Vec<AlignedEntry>,
    pub b: Vec<AlignedEntry>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Records of one side, synthetic entries included.
    pub fn records(&self, side: Side) -> Vec<Record> {
        let entries = match side {
            Side::A => &self.a,
            Side::B => &self.b,
        };
        entries.iter().map(|entry| entry.record.clone()).collect()
    }

    fn push(&mut self, a: AlignedEntry, b: AlignedEntry) {
        self.a.push(a);
        self.b.push(b);
    }
}

/// Align two record lists.
///
/// With `preserve_order == false` rows follow name order (see
/// [`crate::sort::compare_names`]) and every row pairs equal names. With
/// `preserve_order == true` each side keeps its own record order; names
/// missing on one side are mirrored in place, and the remaining records are
/// paired by position, so a reordering shows up as rows whose names differ.
pub fn align(a: &[Record], b: &[Record], preserve_order: bool) -> Alignment {
    let left = NameIndex::build(a, Side::A);
    let right = NameIndex::build(b, Side::B);

    let alignment = if preserve_order {
        align_positional(&left, &right)
    } else {
        align_by_name(&left, &right)
    };

    debug!(
        left = a.len(),
        right = b.len(),
        rows = alignment.len(),
        preserve_order,
        "aligned collections"
    );
    alignment
}

struct Indexed<'a> {
    index: usize,
    key: String,
    record: &'a Record,
}

struct NameIndex<'a> {
    entries: Vec<Indexed<'a>>,
    by_key: HashMap<String, usize>,
}

impl<'a> NameIndex<'a> {
    /// First occurrence of a name wins; later duplicates are dropped.
    fn build(records: &'a [Record], side: Side) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        let mut by_key = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let key = record.key();
            if by_key.contains_key(&key) {
                warn!(
                    side = %side,
                    name = %record.name,
                    index,
                    "duplicate record name; keeping first occurrence"
                );
                continue;
            }
            by_key.insert(key.clone(), entries.len());
            entries.push(Indexed { index, key, record });
        }
        Self { entries, by_key }
    }

    fn get(&self, key: &str) -> Option<&Indexed<'a>> {
        self.by_key.get(key).map(|&pos| &self.entries[pos])
    }

    fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }
}

fn align_by_name(left: &NameIndex<'_>, right: &NameIndex<'_>) -> Alignment {
    let mut seen = HashSet::new();
    let mut union: Vec<&Indexed<'_>> = Vec::new();
    for entry in left.entries.iter().chain(right.entries.iter()) {
        if seen.insert(entry.key.as_str()) {
            union.push(entry);
        }
    }
    sort_by_name(&mut union, |entry| entry.record.name.as_str());

    let mut out = Alignment::default();
    for entry in union {
        match (left.get(&entry.key), right.get(&entry.key)) {
            (Some(l), Some(r)) => out.push(AlignedEntry::real(l), AlignedEntry::real(r)),
            (Some(l), None) => out.push(AlignedEntry::real(l), AlignedEntry::synthetic(l)),
            (None, Some(r)) => out.push(AlignedEntry::synthetic(r), AlignedEntry::real(r)),
            (None, None) => {}
        }
    }
    out
}

fn align_positional(left: &NameIndex<'_>, right: &NameIndex<'_>) -> Alignment {
    let mut out = Alignment::default();
    let (mut i, mut j) = (0, 0);

    loop {
        let l = left.entries.get(i);
        let r = right.entries.get(j);

        if let Some(l) = l.filter(|l| !right.contains(&l.key)) {
            out.push(AlignedEntry::real(l), AlignedEntry::synthetic(l));
            i += 1;
            continue;
        }
        if let Some(r) = r.filter(|r| !left.contains(&r.key)) {
            out.push(AlignedEntry::synthetic(r), AlignedEntry::real(r));
            j += 1;
            continue;
        }

        // Both cursors now sit on names shared by both sides. Each side holds
        // the same number of shared names, so they run out together.
        match (l, r) {
            (Some(l), Some(r)) => {
                out.push(AlignedEntry::real(l), AlignedEntry::real(r));
                i += 1;
                j += 1;
            }
            _ => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::align;
    use crate::collection::Side;
    use crate::record::Record;

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn missing_entry_is_mirrored_as_synthetic() {
        let a = vec![Record::new("Tag1").with_field("colour", "red")];
        let out = align(&a, &[], false);

        assert_eq!(out.len(), 1);
        assert!(!out.a[0].synthetic);
        assert_eq!(out.a[0].source_index, Some(0));
        assert!(out.b[0].synthetic);
        assert_eq!(out.b[0].source_index, None);
        assert_eq!(out.b[0].record, a[0]);
    }

    #[test]
    fn by_name_rows_are_sorted_and_paired() {
        let a = vec![Record::new("web"), Record::new("Alpha"), Record::new("dns")];
        let b = vec![Record::new("DNS"), Record::new("mail"), Record::new("alpha")];
        let out = align(&a, &b, false);

        let rows_a = out.records(Side::A);
        let rows_b = out.records(Side::B);
        assert_eq!(names(&rows_a), vec!["Alpha", "dns", "mail", "web"]);
        assert_eq!(names(&rows_b), vec!["alpha", "DNS", "mail", "web"]);
        assert!(out.a[2].synthetic);
        assert!(out.b[3].synthetic);
    }

    #[test]
    fn positional_keeps_each_side_in_device_order() {
        let a = vec![Record::new("r1"), Record::new("r2"), Record::new("r3")];
        let b = vec![Record::new("r2"), Record::new("new"), Record::new("r1")];
        let out = align(&a, &b, true);

        let rows_a = out.records(Side::A);
        let rows_b = out.records(Side::B);
        assert_eq!(names(&rows_a), vec!["r1", "new", "r2", "r3"]);
        assert_eq!(names(&rows_b), vec!["r2", "new", "r1", "r3"]);
        assert!(out.a[1].synthetic);
        assert!(out.b[3].synthetic);

        let real_a: Vec<Option<usize>> = out.a.iter().map(|e| e.source_index).collect();
        let real_b: Vec<Option<usize>> = out.b.iter().map(|e| e.source_index).collect();
        assert_eq!(real_a, vec![Some(0), None, Some(1), Some(2)]);
        assert_eq!(real_b, vec![Some(0), Some(1), Some(2), None]);
    }

    #[test]
    fn empty_inputs_give_empty_alignment() {
        assert!(align(&[], &[], true).is_empty());
        assert!(align(&[], &[], false).is_empty());
    }

    #[test]
    fn duplicate_names_keep_first_occurrence() {
        let a = vec![
            Record::new("dup").with_field("v", "first"),
            Record::new("DUP").with_field("v", "second"),
        ];
        let out = align(&a, &[], true);

        assert_eq!(out.len(), 1);
        assert_eq!(out.a[0].record.text("v"), Some("first"));
        assert!(out.b[0].synthetic);
    }

    #[test]
    fn realigning_output_changes_nothing() {
        let a = vec![Record::new("x"), Record::new("y"), Record::new("only-a")];
        let b = vec![Record::new("y"), Record::new("only-b"), Record::new("x")];
        for preserve_order in [true, false] {
            let first = align(&a, &b, preserve_order);
            let again = align(
                &first.records(Side::A),
                &first.records(Side::B),
                preserve_order,
            );
            assert_eq!(again.records(Side::A), first.records(Side::A));
            assert_eq!(again.records(Side::B), first.records(Side::B));
            assert!(again.a.iter().chain(again.b.iter()).all(|e| !e.synthetic));
        }
    }
}

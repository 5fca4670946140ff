use serde::Serialize;

use crate::align::AlignedEntry;
use crate::collection::{Provenance, Side};
use crate::crossref::ReorderLink;
use crate::detect::FieldDifference;
use crate::record::Record;

/// Display status of one aligned row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Identical,
    /// Only side B had this record; side A holds a synthetic copy.
    MissingA,
    /// Only side A had this record; side B holds a synthetic copy.
    MissingB,
    Different,
    /// Different, and at least one side's record sits at another row on
    /// the opposite side.
    Moved,
}

/// One position of the alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub index: usize,
    pub a: AlignedEntry,
    pub b: AlignedEntry,
    pub different: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changed_fields: Vec<FieldDifference>,
    pub moved_a: bool,
    pub moved_b: bool,
}

impl ReportRow {
    pub fn status(&self) -> RowStatus {
        if self.a.synthetic {
            RowStatus::MissingA
        } else if self.b.synthetic {
            RowStatus::MissingB
        } else if self.different && (self.moved_a || self.moved_b) {
            RowStatus::Moved
        } else if self.different {
            RowStatus::Different
        } else {
            RowStatus::Identical
        }
    }

    pub fn entry(&self, side: Side) -> &AlignedEntry {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

/// Result of comparing two collections; the only surface handed to a
/// rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentReport {
    pub provenance_a: Provenance,
    pub provenance_b: Provenance,
    pub preserve_order: bool,
    pub rows: Vec<ReportRow>,
    pub links: Vec<ReorderLink>,
}

impl AlignmentReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Aligned records of one side, synthetic entries included.
    pub fn aligned(&self, side: Side) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| row.entry(side).record.clone())
            .collect()
    }

    /// True when any row is different or only present on one side.
    pub fn has_differences(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.status() != RowStatus::Identical)
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            rows: self.rows.len(),
            links: self.links.len(),
            ..ReportSummary::default()
        };
        for row in &self.rows {
            match row.status() {
                RowStatus::Identical => summary.identical += 1,
                RowStatus::MissingA => summary.synthetic_a += 1,
                RowStatus::MissingB => summary.synthetic_b += 1,
                RowStatus::Different | RowStatus::Moved => summary.different += 1,
            }
        }
        summary
    }
}

/// Row counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub rows: usize,
    pub identical: usize,
    pub different: usize,
    pub synthetic_a: usize,
    pub synthetic_b: usize,
    pub links: usize,
}

//! Align and diff two lists of named configuration records.
//!
//! Two devices return the same kinds of objects (tags, addresses, groups,
//! services, policies) in lists that rarely line up: one side is missing
//! entries, vendors shape member lists differently, and rule lists may be
//! reordered. This crate turns the two lists into a side-by-side report:
//!
//! 1. [`sort`] orders object listings by name (rule lists keep device order)
//! 2. [`align`] mirrors names missing on one side as synthetic entries
//! 3. [`detect`] flags rows whose records differ in any field
//! 4. [`crossref`] links same-named records that sit at different rows
//!
//! [`compare_with_options`] runs all four steps and returns an
//! [`AlignmentReport`]. The crate does no I/O and never mutates its inputs.
//!
//! ```
//! use record_diff_core::{compare, Collection, Provenance, Side};
//! use serde_json::json;
//!
//! let a = Collection::from_json(
//!     Side::A,
//!     Provenance::new("fw1", "paloalto"),
//!     json!([{"name": "grp1", "members": "a,b,c"}]),
//! )
//! .unwrap();
//! let b = Collection::from_json(
//!     Side::B,
//!     Provenance::new("fw2", "paloalto"),
//!     json!([{"name": "grp1", "members": ["c", " B", "a"]}]),
//! )
//! .unwrap();
//!
//! let report = compare(&a, &b);
//! assert!(!report.has_differences());
//! ```

pub mod align;
pub mod collection;
pub mod crossref;
pub mod detect;
pub mod engine;
pub mod format;
pub mod normalize;
pub mod record;
pub mod report;
pub mod sort;

pub use align::{align, AlignedEntry, Alignment};
pub use collection::{records_from_json, Collection, Provenance, Side};
pub use crossref::{find_reorder_links, CrossReference, ReorderLink};
pub use detect::{differs, field_differences, structurally_equal, DifferenceKind, FieldDifference};
pub use engine::{compare, compare_with_options, CompareOptions};
pub use format::{format_json, format_summary, format_text};
pub use normalize::{normalize, Comparison, FieldRule, FieldRules, DEFAULT_SET_VALUED_FIELDS};
pub use record::{FieldValue, Record, RecordError, Scalar};
pub use report::{AlignmentReport, ReportRow, ReportSummary, RowStatus};
pub use sort::{compare_names, sort_records};

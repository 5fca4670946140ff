//! Firewall object comparison between two devices.
//!
//! Device snapshots hold the tags, addresses, groups, services and policies
//! retrieved from a Palo Alto or Juniper SRX device. This crate pairs two
//! snapshots kind by kind and runs them through `record-diff-core`:
//!
//! - [`snapshot`] loads snapshot JSON files
//! - [`kind`] and [`vendor`] name what can be compared
//! - [`profile`] holds per-kind comparison settings loaded from TOML
//! - [`session`] keeps each kind's two sides until both have arrived
//! - [`plan`] lists the create calls for entries missing on one device
//! - [`report`] renders colored terminal output
//!
//! ```
//! use netobj_compare::kind::ObjectKind;
//! use netobj_compare::profile::default_profile;
//! use netobj_compare::session::ComparisonSession;
//! use netobj_compare::snapshot::parse_snapshot;
//! use record_diff_core::Side;
//!
//! let a = parse_snapshot(
//!     r#"{"device": {"id": "fw1", "vendor": "paloalto"},
//!         "objects": {"tags": [{"name": "web", "colour": "red"}]}}"#,
//!     "a".to_string(),
//! )
//! .unwrap();
//! let b = parse_snapshot(
//!     r#"{"device": {"id": "fw2", "vendor": "paloalto"},
//!         "objects": {"tags": {"message": "No tags found"}}}"#,
//!     "b".to_string(),
//! )
//! .unwrap();
//!
//! let mut session = ComparisonSession::new();
//! session.submit(ObjectKind::Tags, a.collection(ObjectKind::Tags, Side::A).unwrap());
//! session.submit(ObjectKind::Tags, b.collection(ObjectKind::Tags, Side::B).unwrap());
//!
//! let report = session.compare(ObjectKind::Tags, &default_profile()).unwrap();
//! assert_eq!(report.summary().synthetic_b, 1);
//! ```

pub mod kind;
pub mod plan;
pub mod profile;
pub mod report;
pub mod session;
pub mod snapshot;
pub mod vendor;

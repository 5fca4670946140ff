//! Per-kind comparison context.
//!
//! Lists for the two devices arrive independently. A session holds whatever
//! has arrived for each kind until both sides are present, then hands them
//! to the core pipeline and forgets them.

use std::collections::BTreeMap;

use record_diff_core::{compare_with_options, AlignmentReport, Collection, Side};
use thiserror::Error;
use tracing::{debug, info};

use crate::kind::ObjectKind;
use crate::profile::CompareProfile;

/// Collections received so far for one kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionEntry {
    pub a: Option<Collection>,
    pub b: Option<Collection>,
}

impl SessionEntry {
    pub fn ready_a(&self) -> bool {
        self.a.is_some()
    }

    pub fn ready_b(&self) -> bool {
        self.b.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.ready_a() && self.ready_b()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{kind}: side {missing} has not been retrieved yet")]
    NotReady { kind: ObjectKind, missing: Side },
    #[error("cannot compare objects from different vendors ({a} vs {b})")]
    VendorMismatch { a: String, b: String },
    #[error("{0}: nothing has been retrieved for this kind")]
    UnknownKind(ObjectKind),
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonSession {
    entries: BTreeMap<ObjectKind, SessionEntry>,
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a collection for its side, replacing any earlier one.
    pub fn submit(&mut self, kind: ObjectKind, collection: Collection) {
        debug!(
            %kind,
            side = %collection.side,
            device = %collection.provenance.device_id,
            records = collection.len(),
            "collection received"
        );
        let entry = self.entries.entry(kind).or_default();
        match collection.side {
            Side::A => entry.a = Some(collection),
            Side::B => entry.b = Some(collection),
        }
    }

    pub fn entry(&self, kind: ObjectKind) -> Option<&SessionEntry> {
        self.entries.get(&kind)
    }

    /// Kinds with both sides present.
    pub fn ready_kinds(&self) -> Vec<ObjectKind> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_ready())
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Compare the two sides of `kind` and discard them.
    ///
    /// An entry that fails validation stays in the session so the missing or
    /// mismatched side can be resubmitted.
    pub fn compare(
        &mut self,
        kind: ObjectKind,
        profile: &CompareProfile,
    ) -> Result<AlignmentReport, SessionError> {
        let entry = self
            .entries
            .get(&kind)
            .ok_or(SessionError::UnknownKind(kind))?;
        let (a, b) = match (&entry.a, &entry.b) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => {
                return Err(SessionError::NotReady {
                    kind,
                    missing: Side::A,
                })
            }
            (_, None) => {
                return Err(SessionError::NotReady {
                    kind,
                    missing: Side::B,
                })
            }
        };
        if a.provenance.vendor != b.provenance.vendor {
            return Err(SessionError::VendorMismatch {
                a: a.provenance.vendor.clone(),
                b: b.provenance.vendor.clone(),
            });
        }

        let report = compare_with_options(a, b, &profile.options(kind));
        self.entries.remove(&kind);

        let summary = report.summary();
        info!(
            %kind,
            rows = summary.rows,
            different = summary.different,
            missing_a = summary.synthetic_a,
            missing_b = summary.synthetic_b,
            "compared"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use record_diff_core::{Collection, Provenance, Record, RowStatus, Side};

    use super::{ComparisonSession, SessionError};
    use crate::kind::ObjectKind;
    use crate::profile::default_profile;

    fn collection(side: Side, vendor: &str, names: &[&str]) -> Collection {
        let records = names.iter().map(|name| Record::new(*name)).collect();
        Collection::new(side, Provenance::new(format!("fw-{side}"), vendor), records)
    }

    #[test]
    fn compare_requires_both_sides() {
        let mut session = ComparisonSession::new();
        session.submit(ObjectKind::Tags, collection(Side::B, "paloalto", &["t1"]));

        assert!(session.ready_kinds().is_empty());
        assert_eq!(
            session.compare(ObjectKind::Tags, &default_profile()),
            Err(SessionError::NotReady {
                kind: ObjectKind::Tags,
                missing: Side::A
            })
        );
        assert_eq!(
            session.compare(ObjectKind::Services, &default_profile()),
            Err(SessionError::UnknownKind(ObjectKind::Services))
        );
    }

    #[test]
    fn vendors_must_match() {
        let mut session = ComparisonSession::new();
        session.submit(ObjectKind::Addresses, collection(Side::A, "paloalto", &["h1"]));
        session.submit(ObjectKind::Addresses, collection(Side::B, "juniper", &["h1"]));

        let err = session
            .compare(ObjectKind::Addresses, &default_profile())
            .expect_err("mismatch");
        assert!(err
            .to_string()
            .starts_with("cannot compare objects from different vendors"));
        assert!(session.entry(ObjectKind::Addresses).is_some());
    }

    #[test]
    fn resubmitting_replaces_side_and_compare_discards_entry() {
        let mut session = ComparisonSession::new();
        session.submit(ObjectKind::Tags, collection(Side::A, "paloalto", &["old"]));
        session.submit(ObjectKind::Tags, collection(Side::A, "paloalto", &["t1"]));
        session.submit(ObjectKind::Tags, collection(Side::B, "paloalto", &["t1", "t2"]));
        assert_eq!(session.ready_kinds(), vec![ObjectKind::Tags]);

        let report = session
            .compare(ObjectKind::Tags, &default_profile())
            .expect("report");
        assert_eq!(report.len(), 2);
        assert_eq!(report.rows[1].status(), RowStatus::MissingA);

        assert!(session.entry(ObjectKind::Tags).is_none());
        assert!(matches!(
            session.compare(ObjectKind::Tags, &default_profile()),
            Err(SessionError::UnknownKind(_))
        ));
    }

    #[test]
    fn policy_kinds_keep_device_order() {
        let mut session = ComparisonSession::new();
        session.submit(
            ObjectKind::SecurityPolicies,
            collection(Side::A, "paloalto", &["z-rule", "a-rule"]),
        );
        session.submit(
            ObjectKind::SecurityPolicies,
            collection(Side::B, "paloalto", &["z-rule", "a-rule"]),
        );

        let report = session
            .compare(ObjectKind::SecurityPolicies, &default_profile())
            .expect("report");
        assert!(report.preserve_order);
        assert_eq!(report.rows[0].a.record.name, "z-rule");
        assert!(!report.has_differences());
    }
}

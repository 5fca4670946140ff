use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use serde_json::Value;

use crate::record::{Record, RecordError};

/// Which of the two compared devices a collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The opposite side.
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Where a collection was retrieved from. Compatibility between the two
/// sides is checked by the caller before comparing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub device_id: String,
    pub vendor: String,
}

impl Provenance {
    pub fn new(device_id: impl Into<String>, vendor: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            vendor: vendor.into(),
        }
    }
}

/// An ordered list of records retrieved from one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub side: Side,
    pub provenance: Provenance,
    pub records: Vec<Record>,
}

impl Collection {
    pub fn new(side: Side, provenance: Provenance, records: Vec<Record>) -> Self {
        Self {
            side,
            provenance,
            records,
        }
    }

    /// Build a collection from a JSON array of objects.
    ///
    /// A single element without a string `name` rejects the whole
    /// collection; partial comparisons are never produced.
    pub fn from_json(side: Side, provenance: Provenance, value: Value) -> Result<Self, RecordError> {
        Ok(Self::new(side, provenance, records_from_json(value)?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Convert a JSON array of objects into records.
pub fn records_from_json(value: Value) -> Result<Vec<Record>, RecordError> {
    let Value::Array(items) = value else {
        return Err(RecordError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Record::try_from(item).map_err(|source| RecordError::InvalidRecord {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Collection, Provenance, Side};
    use crate::record::RecordError;

    #[test]
    fn from_json_reports_offending_index() {
        let err = Collection::from_json(
            Side::A,
            Provenance::default(),
            json!([{"name": "ok"}, {"colour": "red"}]),
        )
        .expect_err("second record has no name");

        assert_eq!(
            err,
            RecordError::InvalidRecord {
                index: 1,
                source: Box::new(RecordError::MissingName),
            }
        );
    }

    #[test]
    fn from_json_rejects_non_array_payload() {
        let err = Collection::from_json(Side::B, Provenance::default(), json!({"name": "x"}))
            .expect_err("object is not a collection");
        assert_eq!(err, RecordError::NotAnArray);
    }

    #[test]
    fn side_other_flips() {
        assert_eq!(Side::A.other(), Side::B);
        assert_eq!(Side::B.other(), Side::A);
    }
}

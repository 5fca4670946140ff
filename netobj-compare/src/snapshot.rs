use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use record_diff_core::{records_from_json, Collection, Provenance, Record, RecordError, Side};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::kind::ObjectKind;
use crate::vendor::Vendor;

/// Identity of the device a snapshot was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub vendor: Vendor,
    /// High-availability state as reported by the device (`active`, `passive`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ha_state: Option<String>,
}

impl DeviceInfo {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn is_passive(&self) -> bool {
        self.ha_state
            .as_deref()
            .is_some_and(|state| state.eq_ignore_ascii_case("passive"))
    }
}

/// Object lists retrieved from one device, keyed by kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub device: DeviceInfo,
    pub objects: BTreeMap<ObjectKind, Vec<Record>>,
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    device: DeviceInfo,
    #[serde(default)]
    objects: Map<String, Value>,
}

/// Errors returned when loading snapshot files.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid {kind} in snapshot {path}: {source}")]
    Record {
        path: String,
        kind: ObjectKind,
        source: RecordError,
    },
}

impl DeviceSnapshot {
    pub fn provenance(&self) -> Provenance {
        Provenance::new(self.device.id.clone(), self.device.vendor.as_str())
    }

    /// The records of one kind wrapped as a collection for `side`.
    pub fn collection(&self, kind: ObjectKind, side: Side) -> Option<Collection> {
        self.objects
            .get(&kind)
            .map(|records| Collection::new(side, self.provenance(), records.clone()))
    }

    pub fn kinds(&self) -> Vec<ObjectKind> {
        self.objects.keys().copied().collect()
    }
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<DeviceSnapshot, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_snapshot(&raw, path.display().to_string())
}

/// Parse snapshot JSON. `origin` names the source in errors.
///
/// Unknown object kinds are skipped with a warning. A kind whose payload is
/// an object carrying only a `message` (the device API's "nothing found"
/// answer) becomes an empty list.
pub fn parse_snapshot(raw: &str, origin: String) -> Result<DeviceSnapshot, SnapshotError> {
    let file: SnapshotFile = serde_json::from_str(raw).map_err(|source| SnapshotError::Parse {
        path: origin.clone(),
        source,
    })?;

    let mut objects = BTreeMap::new();
    for (name, payload) in file.objects {
        let kind = match name.parse::<ObjectKind>() {
            Ok(kind) => kind,
            Err(err) => {
                warn!(snapshot = %origin, "skipping {err}");
                continue;
            }
        };
        let records = match empty_answer(&payload) {
            Some(answer) => {
                debug!(snapshot = %origin, %kind, answer, "device returned no objects");
                Vec::new()
            }
            None => records_from_json(payload).map_err(|source| SnapshotError::Record {
                path: origin.clone(),
                kind,
                source,
            })?,
        };
        objects.insert(kind, records);
    }

    Ok(DeviceSnapshot {
        device: file.device,
        objects,
    })
}

fn empty_answer(payload: &Value) -> Option<&str> {
    match payload {
        Value::Object(map) if map.len() == 1 => map.get("message").and_then(Value::as_str),
        _ => None,
    }
}

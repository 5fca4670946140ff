//! Provisioning plan for entries found on only one device.
//!
//! Every synthetic entry in a report names an object the target device
//! lacks. The plan lists the create call that would copy it over. Nothing
//! is sent anywhere; the plan is written out for review.

use record_diff_core::{AlignmentReport, FieldValue, Record, Side};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::kind::ObjectKind;
use crate::snapshot::DeviceInfo;
use crate::vendor::Vendor;

const NO_VALUE: &str = "None";
const NO_COLOUR: &str = "no colour";

/// One object to create on the device that lacks it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionAction {
    pub kind: ObjectKind,
    /// Side whose device is missing the object.
    pub target: Side,
    pub device_id: String,
    pub vendor: Vendor,
    pub name: String,
    pub supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProvisionPlan {
    pub actions: Vec<ProvisionAction>,
}

impl ProvisionPlan {
    pub fn extend(&mut self, actions: impl IntoIterator<Item = ProvisionAction>) {
        self.actions.extend(actions);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn supported(&self) -> usize {
        self.actions.iter().filter(|action| action.supported).count()
    }
}

/// Build create actions for every synthetic entry in `report`.
pub fn plan_for_report(
    kind: ObjectKind,
    report: &AlignmentReport,
    device_a: &DeviceInfo,
    device_b: &DeviceInfo,
) -> Vec<ProvisionAction> {
    let mut actions = Vec::new();
    for row in &report.rows {
        for (side, device) in [(Side::A, device_a), (Side::B, device_b)] {
            let entry = row.entry(side);
            if entry.synthetic {
                actions.push(plan_action(kind, side, device, &entry.record));
            }
        }
    }
    actions
}

fn plan_action(
    kind: ObjectKind,
    target: Side,
    device: &DeviceInfo,
    record: &Record,
) -> ProvisionAction {
    let mut action = ProvisionAction {
        kind,
        target,
        device_id: device.id.clone(),
        vendor: device.vendor,
        name: record.name.clone(),
        supported: false,
        reason: None,
        endpoint: None,
        payload: None,
    };

    if let Some(reason) = rejection(kind, device) {
        action.reason = Some(reason);
        return action;
    }
    match create_payload(kind, record) {
        Some(payload) => {
            action.supported = true;
            action.endpoint = Some(format!(
                "/api/objects?object={}&action=create&id={}",
                kind.api_object(),
                device.id
            ));
            action.payload = Some(Value::Object(payload));
        }
        None => action.reason = Some("adding objects is not yet supported here".to_string()),
    }
    action
}

fn rejection(kind: ObjectKind, device: &DeviceInfo) -> Option<String> {
    if kind == ObjectKind::Tags && device.vendor != Vendor::PaloAlto {
        return Some("tags are not supported on SRX devices".to_string());
    }
    if device.vendor == Vendor::PaloAlto && device.is_passive() {
        return Some(format!(
            "cannot add {} to a passive device",
            kind.label().to_lowercase()
        ));
    }
    None
}

fn create_payload(kind: ObjectKind, record: &Record) -> Option<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert("name".to_string(), Value::String(record.name.clone()));
    match kind {
        ObjectKind::Tags => {
            payload.insert("comment".to_string(), field(record, "description"));
            if let Some(colour) = record.get("colour") {
                if colour.as_text() != Some(NO_COLOUR) {
                    payload.insert("colour".to_string(), json(colour));
                }
            }
        }
        ObjectKind::Addresses => {
            payload.insert("address".to_string(), field(record, "addr"));
            payload.insert("description".to_string(), field(record, "description"));
            payload.insert("tag".to_string(), field_or_none(record, "tag"));
        }
        ObjectKind::AddressGroups => {
            let members = record.get("static").or_else(|| record.get("members"));
            payload.insert("members".to_string(), members.map(json).unwrap_or(Value::Null));
            payload.insert("description".to_string(), field_or_none(record, "description"));
            payload.insert("tag".to_string(), field_or_none(record, "tag"));
        }
        ObjectKind::ApplicationGroups => {
            payload.insert("members".to_string(), field(record, "members"));
        }
        ObjectKind::Services => {
            for name in ["protocol", "port", "description"] {
                payload.insert(name.to_string(), field(record, name));
            }
            payload.insert("tag".to_string(), field_or_none(record, "tag"));
        }
        ObjectKind::ServiceGroups => {
            payload.insert("members".to_string(), field(record, "members"));
            payload.insert("tag".to_string(), field_or_none(record, "tag"));
        }
        ObjectKind::NatPolicies | ObjectKind::SecurityPolicies | ObjectKind::QosPolicies => {
            return None
        }
    }
    Some(payload)
}

fn json(value: &FieldValue) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn field(record: &Record, name: &str) -> Value {
    record.get(name).map(json).unwrap_or(Value::Null)
}

/// Empty and missing values become the literal `"None"` the device API
/// expects for optional attributes.
fn field_or_none(record: &Record, name: &str) -> Value {
    match record.get(name) {
        None | Some(FieldValue::Null) => Value::String(NO_VALUE.to_string()),
        Some(value) if value.as_text().is_some_and(str::is_empty) => {
            Value::String(NO_VALUE.to_string())
        }
        Some(value) => json(value),
    }
}

//! Field normalization.
//!
//! Vendors return the same concept in different shapes: a group's members
//! may arrive as `"a, b"`, as `{"member": ["a", "b"]}` or as
//! `[{"name": "a"}, {"name": "b"}]`. Each field name resolves once to a
//! [`FieldRule`] that says how the value is normalized and compared.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::warn;

use crate::record::{FieldValue, Scalar};

/// Field names compared as unordered, case-insensitive sets by default.
pub const DEFAULT_SET_VALUED_FIELDS: &[&str] = &["members", "source"];

/// Wrapper key some vendors use around member lists.
const MEMBER_KEY: &str = "member";
const NAME_KEY: &str = "name";

/// Turns a raw field value into its comparable form.
pub type Normalizer = fn(&str, &FieldValue) -> FieldValue;

/// How a field's normalized values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Token sets, ignoring order, case and surrounding whitespace.
    Set,
    /// Recursive structural equality.
    Structural,
}

/// Normalization function plus comparison mode for one field.
#[derive(Clone, Copy)]
pub struct FieldRule {
    pub comparison: Comparison,
    pub normalize: Normalizer,
}

impl FieldRule {
    pub const SET: FieldRule = FieldRule {
        comparison: Comparison::Set,
        normalize: normalize_set,
    };

    pub const STRUCTURAL: FieldRule = FieldRule {
        comparison: Comparison::Structural,
        normalize: pass_through,
    };
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("comparison", &self.comparison)
            .finish_non_exhaustive()
    }
}

/// Declarative table from field name to [`FieldRule`].
///
/// Fields without an entry are compared structurally.
#[derive(Debug, Clone)]
pub struct FieldRules {
    table: HashMap<String, FieldRule>,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::with_set_valued(DEFAULT_SET_VALUED_FIELDS.iter().copied())
    }
}

impl FieldRules {
    /// A table where every field is compared structurally.
    pub fn structural_only() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// A table declaring the given fields set-valued.
    pub fn with_set_valued<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = fields
            .into_iter()
            .map(|field| (field.into(), FieldRule::SET))
            .collect();
        Self { table }
    }

    /// Register or replace the rule for one field.
    pub fn insert(&mut self, field: impl Into<String>, rule: FieldRule) {
        self.table.insert(field.into(), rule);
    }

    /// Resolve the rule for `field`.
    pub fn rule(&self, field: &str) -> FieldRule {
        self.table
            .get(field)
            .copied()
            .unwrap_or(FieldRule::STRUCTURAL)
    }

    pub fn comparison(&self, field: &str) -> Comparison {
        self.rule(field).comparison
    }

    pub fn is_set_valued(&self, field: &str) -> bool {
        self.comparison(field) == Comparison::Set
    }

    /// Normalize `value` according to the rule registered for `field`.
    pub fn normalize(&self, field: &str, value: &FieldValue) -> FieldValue {
        (self.rule(field).normalize)(field, value)
    }

    /// Set-valued field names, sorted.
    pub fn set_valued_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self
            .table
            .iter()
            .filter(|(_, rule)| rule.comparison == Comparison::Set)
            .map(|(field, _)| field.as_str())
            .collect();
        fields.sort_unstable();
        fields
    }
}

/// Normalize with the default field table.
pub fn normalize(field: &str, value: &FieldValue) -> FieldValue {
    FieldRules::default().normalize(field, value)
}

/// Identity normalizer for structurally compared fields.
pub fn pass_through(_field: &str, value: &FieldValue) -> FieldValue {
    value.clone()
}

/// Normalize a set-valued field to a [`FieldValue::List`].
///
/// Unrecognized shapes become an empty list so the field still compares;
/// the assumption is logged.
pub fn normalize_set(field: &str, value: &FieldValue) -> FieldValue {
    let mut out = Vec::new();
    match value {
        FieldValue::List(items) => return FieldValue::List(items.clone()),
        FieldValue::Scalar(Scalar::Text(text)) => {
            out.extend(text.split(',').map(|part| Scalar::Text(part.to_string())));
        }
        FieldValue::Sequence(items) => {
            for item in items {
                collect_element(field, item, &mut out);
            }
        }
        FieldValue::Structured(map) => {
            if let Some(inner) = map.get(MEMBER_KEY) {
                collect_wrapped(field, inner, &mut out);
            } else if let Some(FieldValue::Scalar(name)) = map.get(NAME_KEY) {
                out.push(name.clone());
            } else {
                warn!(field, "set-valued field has no member list; comparing as empty");
            }
        }
        FieldValue::Null | FieldValue::Scalar(_) => {
            warn!(field, value = %value, "unrecognized set-valued shape; comparing as empty");
        }
    }
    FieldValue::List(out)
}

fn collect_wrapped(field: &str, inner: &FieldValue, out: &mut Vec<Scalar>) {
    match inner {
        FieldValue::Sequence(items) => {
            for item in items {
                collect_element(field, item, out);
            }
        }
        FieldValue::List(items) => out.extend(items.iter().cloned()),
        FieldValue::Scalar(scalar) => out.push(scalar.clone()),
        FieldValue::Null | FieldValue::Structured(_) => {
            warn!(field, "member wrapper does not hold a list; comparing as empty");
        }
    }
}

fn collect_element(field: &str, item: &FieldValue, out: &mut Vec<Scalar>) {
    match item {
        FieldValue::Scalar(scalar) => out.push(scalar.clone()),
        FieldValue::Structured(map) => {
            if let Some(FieldValue::Scalar(name)) = map.get(NAME_KEY) {
                out.push(name.clone());
            } else if let Some(inner) = map.get(MEMBER_KEY) {
                collect_wrapped(field, inner, out);
            } else {
                warn!(field, "skipping member without a name");
            }
        }
        FieldValue::Null | FieldValue::List(_) | FieldValue::Sequence(_) => {
            warn!(field, element = %item, "skipping unrecognized member element");
        }
    }
}

/// Trimmed, lower-cased tokens of a normalized list. Any other shape yields
/// an empty set.
pub fn token_set(value: &FieldValue) -> BTreeSet<String> {
    match value {
        FieldValue::List(items) => items
            .iter()
            .map(|item| item.to_token().trim().to_lowercase())
            .collect(),
        _ => BTreeSet::new(),
    }
}

use std::fs;
use std::path::Path;

use record_diff_core::{CompareOptions, FieldRules, DEFAULT_SET_VALUED_FIELDS};
use serde::Deserialize;
use thiserror::Error;

use crate::kind::ObjectKind;

/// Comparison settings shared by every object kind, with per-kind overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompareProfile {
    #[serde(default = "default_set_valued_fields")]
    pub set_valued_fields: Vec<String>,
    #[serde(default, rename = "kind")]
    pub kinds: Vec<KindOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KindOverride {
    pub name: ObjectKind,
    #[serde(default)]
    pub preserve_order: Option<bool>,
}

/// Errors returned when loading profile files.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse profile {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl CompareProfile {
    /// Whether `kind` keeps device order. Kinds without an override use
    /// [`ObjectKind::preserves_order`].
    pub fn preserve_order(&self, kind: ObjectKind) -> bool {
        self.kinds
            .iter()
            .rev()
            .find(|entry| entry.name == kind)
            .and_then(|entry| entry.preserve_order)
            .unwrap_or_else(|| kind.preserves_order())
    }

    pub fn field_rules(&self) -> FieldRules {
        FieldRules::with_set_valued(self.set_valued_fields.iter().map(String::as_str))
    }

    /// Core comparison options for one kind.
    pub fn options(&self, kind: ObjectKind) -> CompareOptions {
        CompareOptions {
            preserve_order: self.preserve_order(kind),
            rules: self.field_rules(),
        }
    }
}

impl Default for CompareProfile {
    fn default() -> Self {
        fallback_profile()
    }
}

/// Load a profile from a TOML file.
pub fn load_profile(path: &Path) -> Result<CompareProfile, ProfileLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_profile(&raw, path.display().to_string())
}

/// Built-in profile.
pub fn default_profile() -> CompareProfile {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/profiles/compare.toml"
    ));
    parse_profile(embedded, "embedded profile".to_string()).unwrap_or_else(|_| fallback_profile())
}

fn parse_profile(raw: &str, path: String) -> Result<CompareProfile, ProfileLoadError> {
    toml::from_str(raw).map_err(|source| ProfileLoadError::Parse { path, source })
}

fn default_set_valued_fields() -> Vec<String> {
    DEFAULT_SET_VALUED_FIELDS
        .iter()
        .map(|field| field.to_string())
        .collect()
}

fn fallback_profile() -> CompareProfile {
    CompareProfile {
        set_valued_fields: default_set_valued_fields(),
        kinds: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{default_profile, load_profile, parse_profile, ProfileLoadError};
    use crate::kind::ObjectKind;

    #[test]
    fn embedded_profile_matches_kind_defaults() {
        let profile = default_profile();
        for kind in ObjectKind::ALL {
            assert_eq!(profile.preserve_order(kind), kind.preserves_order(), "{kind}");
        }
        assert_eq!(profile.field_rules().set_valued_fields(), vec!["members", "source"]);
    }

    #[test]
    fn overrides_apply_per_kind() {
        let profile = parse_profile(
            r#"
set_valued_fields = ["members", "source", "tag"]

[[kind]]
name = "addresses"
preserve_order = true

[[kind]]
name = "qos_policies"
preserve_order = false
"#,
            "inline".to_string(),
        )
        .expect("profile");

        assert!(profile.preserve_order(ObjectKind::Addresses));
        assert!(!profile.preserve_order(ObjectKind::QosPolicies));
        assert!(profile.preserve_order(ObjectKind::NatPolicies));
        assert!(profile.options(ObjectKind::Tags).rules.is_set_valued("tag"));
    }

    #[test]
    fn missing_field_list_uses_defaults() {
        let profile = parse_profile("", "inline".to_string()).expect("profile");
        assert_eq!(profile.set_valued_fields, vec!["members", "source"]);
        assert!(profile.kinds.is_empty());
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[[kind]]\nname = \"zones\"\n").expect("write");

        let err = load_profile(&path).expect_err("unknown kind");
        assert!(matches!(err, ProfileLoadError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = load_profile(&dir.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(err, ProfileLoadError::Io { .. }));
    }
}

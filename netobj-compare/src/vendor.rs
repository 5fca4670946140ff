use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Firewall platform a snapshot was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    PaloAlto,
    Juniper,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vendor `{0}` (expected paloalto or juniper)")]
pub struct UnknownVendor(pub String);

impl Vendor {
    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::PaloAlto => "paloalto",
            Vendor::Juniper => "juniper",
        }
    }
}

impl Display for Vendor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = UnknownVendor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paloalto" | "palo_alto" | "panos" => Ok(Vendor::PaloAlto),
            "juniper" | "srx" => Ok(Vendor::Juniper),
            _ => Err(UnknownVendor(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Vendor;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("PaloAlto".parse::<Vendor>(), Ok(Vendor::PaloAlto));
        assert_eq!("srx".parse::<Vendor>(), Ok(Vendor::Juniper));
        assert!("fortinet".parse::<Vendor>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Vendor::PaloAlto).expect("json"),
            "\"paloalto\""
        );
        let parsed: Vendor = serde_json::from_str("\"juniper\"").expect("json");
        assert_eq!(parsed, Vendor::Juniper);
    }
}

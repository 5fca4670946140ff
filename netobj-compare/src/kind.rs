use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Object types a device exposes for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Tags,
    Addresses,
    AddressGroups,
    ApplicationGroups,
    Services,
    ServiceGroups,
    NatPolicies,
    SecurityPolicies,
    QosPolicies,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown object kind `{0}`")]
pub struct UnknownKind(pub String);

impl ObjectKind {
    pub const ALL: [ObjectKind; 9] = [
        ObjectKind::Tags,
        ObjectKind::Addresses,
        ObjectKind::AddressGroups,
        ObjectKind::ApplicationGroups,
        ObjectKind::Services,
        ObjectKind::ServiceGroups,
        ObjectKind::NatPolicies,
        ObjectKind::SecurityPolicies,
        ObjectKind::QosPolicies,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Tags => "tags",
            ObjectKind::Addresses => "addresses",
            ObjectKind::AddressGroups => "address_groups",
            ObjectKind::ApplicationGroups => "application_groups",
            ObjectKind::Services => "services",
            ObjectKind::ServiceGroups => "service_groups",
            ObjectKind::NatPolicies => "nat_policies",
            ObjectKind::SecurityPolicies => "security_policies",
            ObjectKind::QosPolicies => "qos_policies",
        }
    }

    /// Human heading used by the text renderer.
    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Tags => "Tags",
            ObjectKind::Addresses => "Addresses",
            ObjectKind::AddressGroups => "Address Groups",
            ObjectKind::ApplicationGroups => "Application Groups",
            ObjectKind::Services => "Services",
            ObjectKind::ServiceGroups => "Service Groups",
            ObjectKind::NatPolicies => "NAT Policies",
            ObjectKind::SecurityPolicies => "Security Policies",
            ObjectKind::QosPolicies => "QoS Policies",
        }
    }

    /// Rule lists are evaluated top-down, so their device order is part of
    /// what gets compared. Object listings are sorted by name instead.
    pub fn preserves_order(self) -> bool {
        matches!(
            self,
            ObjectKind::NatPolicies | ObjectKind::SecurityPolicies | ObjectKind::QosPolicies
        )
    }

    /// Object name used by the device API's create route.
    pub fn api_object(self) -> &'static str {
        match self {
            ObjectKind::ApplicationGroups => "app_groups",
            other => other.as_str(),
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        if wanted == "app_groups" {
            return Ok(ObjectKind::ApplicationGroups);
        }
        ObjectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectKind;

    #[test]
    fn parses_snake_case_and_aliases() {
        assert_eq!(
            "address_groups".parse::<ObjectKind>(),
            Ok(ObjectKind::AddressGroups)
        );
        assert_eq!(
            "Service-Groups".parse::<ObjectKind>(),
            Ok(ObjectKind::ServiceGroups)
        );
        assert_eq!(
            "app_groups".parse::<ObjectKind>(),
            Ok(ObjectKind::ApplicationGroups)
        );
        assert!("zones".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn only_policy_kinds_preserve_order() {
        let ordered: Vec<_> = ObjectKind::ALL
            .into_iter()
            .filter(|kind| kind.preserves_order())
            .collect();
        assert_eq!(
            ordered,
            vec![
                ObjectKind::NatPolicies,
                ObjectKind::SecurityPolicies,
                ObjectKind::QosPolicies
            ]
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in ObjectKind::ALL {
            assert_eq!(kind.to_string().parse::<ObjectKind>(), Ok(kind));
        }
    }
}

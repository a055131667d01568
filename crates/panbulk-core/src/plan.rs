// ── Provisioning plan ──
//
// Validates a `ProvisionConfig` into the exact set of objects the workflow
// will create. Everything here is local: a plan that fails to build means
// no request was sent.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use ipnet::{IpNet, Ipv4Net};

use crate::config::ProvisionConfig;
use crate::error::CoreError;
use crate::model::{
    EthernetInterface, Layer3Subinterface, SubinterfaceSettings, VirtualRouterAssignment,
    ZoneAssignment,
};

/// Highest usable 802.1Q tag.
pub const MAX_VLAN_TAG: usize = 4094;
pub const MTU_RANGE: std::ops::RangeInclusive<u16> = 576..=9216;
/// Config object names are capped at 31 characters.
const MAX_NAME_LEN: usize = 31;

/// Validated provisioning input.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    pub base: EthernetInterface,
    /// One address per tag, in tag order (tag 1 first).
    pub addresses: Vec<Ipv4Net>,
    pub settings: SubinterfaceSettings,
    pub virtual_router: String,
    pub zone: String,
}

impl ProvisionPlan {
    pub fn from_config(config: &ProvisionConfig) -> Result<Self, CoreError> {
        validate_interface_name(&config.base_interface)?;
        validate_object_name("zone", &config.zone)?;
        validate_object_name("virtual_router", &config.virtual_router)?;
        if let Some(ref vsys) = config.vsys {
            validate_object_name("vsys", vsys)?;
        }
        if let Some(ref profile) = config.management_profile {
            validate_object_name("management_profile", profile)?;
        }
        if !MTU_RANGE.contains(&config.mtu) {
            return Err(CoreError::validation(
                "mtu",
                format!(
                    "{} is outside {}..={}",
                    config.mtu,
                    MTU_RANGE.start(),
                    MTU_RANGE.end()
                ),
            ));
        }

        let tags = config.tag_count.unwrap_or(config.addresses.len());
        if tags == 0 {
            return Err(CoreError::validation(
                "addresses",
                "at least one subinterface address is required",
            ));
        }
        if tags > MAX_VLAN_TAG {
            return Err(CoreError::validation(
                "tag_count",
                format!("{tags} exceeds the highest VLAN tag {MAX_VLAN_TAG}"),
            ));
        }
        if tags > config.addresses.len() {
            return Err(CoreError::AddressListExhausted {
                tags,
                addresses: config.addresses.len(),
            });
        }

        let addresses = parse_addresses(&config.addresses[..tags])?;

        Ok(Self {
            base: EthernetInterface::layer3(config.base_interface.clone()),
            addresses,
            settings: SubinterfaceSettings {
                comment: config.comment.clone(),
                management_profile: config.management_profile.clone(),
                mtu: config.mtu,
            },
            virtual_router: config.virtual_router.clone(),
            zone: config.zone.clone(),
        })
    }

    /// Number of VLAN tags (and subinterfaces) in the batch.
    pub fn tag_count(&self) -> usize {
        self.addresses.len()
    }

    /// Build the batch: tag `n` (from 1) paired with `addresses[n - 1]`.
    pub fn subinterfaces(&self) -> Vec<Layer3Subinterface> {
        (1..=u16::MAX)
            .zip(&self.addresses)
            .map(|(tag, address)| {
                Layer3Subinterface::new(&self.base.name, tag, *address, &self.settings)
            })
            .collect()
    }

    /// The virtual-router association covering every subinterface in `batch`.
    pub fn virtual_router_assignment(&self, batch: &[Layer3Subinterface]) -> VirtualRouterAssignment {
        VirtualRouterAssignment {
            router: self.virtual_router.clone(),
            interfaces: batch.iter().map(|s| s.name.clone()).collect(),
        }
    }

    /// The security-zone association covering every subinterface in `batch`.
    pub fn zone_assignment(&self, batch: &[Layer3Subinterface]) -> ZoneAssignment {
        ZoneAssignment {
            zone: self.zone.clone(),
            interfaces: batch.iter().map(|s| s.name.clone()).collect(),
        }
    }
}

/// Subinterface addresses land in the layer-3 `ip` list, which is IPv4 only.
fn parse_addresses(raw: &[String]) -> Result<Vec<Ipv4Net>, CoreError> {
    let mut seen: HashSet<Ipv4Addr> = HashSet::new();
    let mut parsed = Vec::with_capacity(raw.len());

    for (index, value) in raw.iter().enumerate() {
        let invalid = |reason: String| CoreError::InvalidAddress {
            index: index + 1,
            value: value.clone(),
            reason,
        };
        let net = match value.trim().parse::<IpNet>() {
            Ok(IpNet::V4(net)) => net,
            Ok(IpNet::V6(_)) => {
                return Err(invalid("only IPv4 prefixes are supported".into()));
            }
            Err(e) => return Err(invalid(e.to_string())),
        };
        if !seen.insert(net.addr()) {
            return Err(CoreError::DuplicateAddress {
                value: net.addr().to_string(),
            });
        }
        parsed.push(net);
    }

    Ok(parsed)
}

/// `ethernet<slot>/<port>`, optionally with further `/<n>` segments.
fn validate_interface_name(name: &str) -> Result<(), CoreError> {
    let invalid = || {
        CoreError::validation(
            "base_interface",
            format!("'{name}' is not an ethernet interface name (expected e.g. ethernet1/5)"),
        )
    };

    let rest = name.strip_prefix("ethernet").ok_or_else(invalid)?;
    let segments: Vec<&str> = rest.split('/').collect();
    let numeric = segments
        .iter()
        .all(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()));
    if segments.len() < 2 || !numeric {
        return Err(invalid());
    }
    Ok(())
}

fn validate_object_name(field: &str, name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::validation(field, "must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::validation(
            field,
            format!("'{name}' is longer than {MAX_NAME_LEN} characters"),
        ));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ')))
    {
        return Err(CoreError::validation(
            field,
            format!("'{name}' contains invalid character {bad:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> ProvisionConfig {
        ProvisionConfig::default()
    }

    #[test]
    fn reference_plan_has_six_tagged_subinterfaces() {
        let plan = ProvisionPlan::from_config(&config()).unwrap();
        let subs = plan.subinterfaces();

        assert_eq!(subs.len(), 6);
        let names: Vec<_> = subs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "ethernet1/5.1",
                "ethernet1/5.2",
                "ethernet1/5.3",
                "ethernet1/5.4",
                "ethernet1/5.5",
                "ethernet1/5.6"
            ]
        );
        for (i, sub) in subs.iter().enumerate() {
            assert_eq!(usize::from(sub.tag), i + 1);
            assert_eq!(sub.address.to_string(), config().addresses[i]);
            assert_eq!(sub.mtu, 1400);
        }
    }

    #[test]
    fn tag_count_limits_batch() {
        let cfg = ProvisionConfig {
            tag_count: Some(2),
            ..config()
        };
        let plan = ProvisionPlan::from_config(&cfg).unwrap();
        assert_eq!(plan.tag_count(), 2);
        assert_eq!(plan.subinterfaces()[1].address.to_string(), "2.2.2.2/23");
    }

    #[test]
    fn more_tags_than_addresses_fails() {
        for (tags, len) in [(7, 6), (2, 1), (10, 0)] {
            let cfg = ProvisionConfig {
                tag_count: Some(tags),
                addresses: config().addresses.into_iter().take(len).collect(),
                ..config()
            };
            match ProvisionPlan::from_config(&cfg) {
                Err(CoreError::AddressListExhausted { tags: t, addresses }) => {
                    assert_eq!((t, addresses), (tags, len));
                }
                other => panic!("expected AddressListExhausted, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_address_list_fails() {
        let cfg = ProvisionConfig {
            addresses: Vec::new(),
            ..config()
        };
        assert!(matches!(
            ProvisionPlan::from_config(&cfg),
            Err(CoreError::ValidationFailed { ref field, .. }) if field == "addresses"
        ));
    }

    #[test]
    fn malformed_address_reports_position() {
        let mut cfg = config();
        cfg.addresses[2] = "3.3.3.300/23".into();
        match ProvisionPlan::from_config(&cfg) {
            Err(CoreError::InvalidAddress { index, value, .. }) => {
                assert_eq!(index, 3);
                assert_eq!(value, "3.3.3.300/23");
            }
            other => panic!("expected InvalidAddress, got {other:?}"),
        }
    }

    #[test]
    fn address_without_prefix_is_malformed() {
        let cfg = ProvisionConfig {
            addresses: vec!["10.0.0.1".into()],
            ..config()
        };
        assert!(matches!(
            ProvisionPlan::from_config(&cfg),
            Err(CoreError::InvalidAddress { index: 1, .. })
        ));
    }

    #[test]
    fn ipv6_prefix_is_rejected_before_any_request() {
        let mut cfg = config();
        cfg.addresses[1] = "2001:db8::1/64".into();
        match ProvisionPlan::from_config(&cfg) {
            Err(CoreError::InvalidAddress { index, value, reason }) => {
                assert_eq!(index, 2);
                assert_eq!(value, "2001:db8::1/64");
                assert!(reason.contains("IPv4"), "{reason}");
            }
            other => panic!("expected InvalidAddress, got {other:?}"),
        }
    }

    #[test]
    fn tag_count_above_highest_vlan_tag_fails() {
        let cfg = ProvisionConfig {
            tag_count: Some(MAX_VLAN_TAG + 1),
            ..config()
        };
        assert!(matches!(
            ProvisionPlan::from_config(&cfg),
            Err(CoreError::ValidationFailed { ref field, .. }) if field == "tag_count"
        ));
    }

    #[test]
    fn object_name_length_limit() {
        let at_limit = ProvisionConfig {
            zone: "z".repeat(MAX_NAME_LEN),
            ..config()
        };
        assert!(ProvisionPlan::from_config(&at_limit).is_ok());

        let too_long = ProvisionConfig {
            virtual_router: "r".repeat(MAX_NAME_LEN + 1),
            ..config()
        };
        assert!(matches!(
            ProvisionPlan::from_config(&too_long),
            Err(CoreError::ValidationFailed { ref field, .. }) if field == "virtual_router"
        ));
    }

    #[test]
    fn duplicate_addresses_fail() {
        let cfg = ProvisionConfig {
            addresses: vec!["10.0.0.1/24".into(), "10.0.0.1/25".into()],
            ..config()
        };
        assert!(matches!(
            ProvisionPlan::from_config(&cfg),
            Err(CoreError::DuplicateAddress { ref value }) if value == "10.0.0.1"
        ));
    }

    #[test]
    fn unused_addresses_are_not_validated() {
        let mut cfg = config();
        cfg.addresses[5] = "garbage".into();
        cfg.tag_count = Some(5);
        assert!(ProvisionPlan::from_config(&cfg).is_ok());
    }

    #[test]
    fn interface_names() {
        for ok in ["ethernet1/5", "ethernet1/1/1", "ethernet12/48"] {
            assert!(validate_interface_name(ok).is_ok(), "{ok}");
        }
        for bad in ["ethernet1", "eth1/5", "ethernet1/", "ethernet/5", "ethernet1/5.1", "ae1"] {
            assert!(validate_interface_name(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn object_names_reject_quotes() {
        let cfg = ProvisionConfig {
            zone: "it's".into(),
            ..config()
        };
        assert!(matches!(
            ProvisionPlan::from_config(&cfg),
            Err(CoreError::ValidationFailed { ref field, .. }) if field == "zone"
        ));
    }

    #[test]
    fn mtu_out_of_range() {
        let cfg = ProvisionConfig {
            mtu: 100,
            ..config()
        };
        assert!(matches!(
            ProvisionPlan::from_config(&cfg),
            Err(CoreError::ValidationFailed { ref field, .. }) if field == "mtu"
        ));
    }

    #[test]
    fn assignments_cover_whole_batch() {
        let plan = ProvisionPlan::from_config(&config()).unwrap();
        let batch = plan.subinterfaces();

        let vr = plan.virtual_router_assignment(&batch);
        let zone = plan.zone_assignment(&batch);

        assert_eq!(vr.router, "default");
        assert_eq!(zone.zone, "local_vlans");
        assert_eq!(vr.interfaces.len(), 6);
        assert_eq!(vr.interfaces, zone.interfaces);
        assert_eq!(zone.interfaces[5], "ethernet1/5.6");
    }
}

// ── Domain model ──
//
// Transport-agnostic descriptors for the objects the workflow creates.
// Rendering into XML API elements lives in `device.rs`.

use std::fmt;

use ipnet::Ipv4Net;
use serde::Serialize;

/// A virtual system identifier (`vsys1`, `vsys2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Vsys(String);

impl Vsys {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vsys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Vsys {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Interface operating mode. Only layer-3 is provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceMode {
    Layer3,
}

impl InterfaceMode {
    /// Config-tree element name for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layer3 => "layer3",
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical interface declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EthernetInterface {
    pub name: String,
    pub mode: InterfaceMode,
}

impl EthernetInterface {
    pub fn layer3(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: InterfaceMode::Layer3,
        }
    }
}

/// Settings shared by every subinterface in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubinterfaceSettings {
    pub comment: String,
    pub management_profile: Option<String>,
    pub mtu: u16,
}

/// A layer-3 subinterface: `{parent}.{tag}` carrying one IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer3Subinterface {
    pub name: String,
    pub parent: String,
    pub tag: u16,
    pub address: Ipv4Net,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_profile: Option<String>,
    pub mtu: u16,
}

impl Layer3Subinterface {
    pub fn new(parent: &str, tag: u16, address: Ipv4Net, settings: &SubinterfaceSettings) -> Self {
        Self {
            name: format!("{parent}.{tag}"),
            parent: parent.to_owned(),
            tag,
            address,
            comment: settings.comment.clone(),
            management_profile: settings.management_profile.clone(),
            mtu: settings.mtu,
        }
    }
}

/// Interfaces bound to one virtual router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualRouterAssignment {
    pub router: String,
    pub interfaces: Vec<String>,
}

/// Interfaces grouped into one security zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneAssignment {
    pub zone: String,
    pub interfaces: Vec<String>,
}

/// Identity of the managed device, from `show system info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub hostname: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub sw_version: Option<String>,
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, PAN-OS {}, serial {})",
            self.hostname.as_deref().unwrap_or("unknown"),
            self.model.as_deref().unwrap_or("?"),
            self.sw_version.as_deref().unwrap_or("?"),
            self.serial.as_deref().unwrap_or("?"),
        )
    }
}

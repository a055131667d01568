// Config-tree xpath builders for a standalone firewall.
//
// Names go into `entry[@name=...]` predicates as XPath 1.0 string
// literals. A name holding both quote kinds is split with `concat()`.

/// Root of a standalone firewall's device config.
pub const DEVICE: &str = "/config/devices/entry[@name='localhost.localdomain']";

fn entry(name: &str) -> String {
    format!("entry[@name={}]", literal(name))
}

/// Quote `value` as an XPath string literal.
fn literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// `/.../network/interface/ethernet`
pub fn ethernet_root() -> String {
    format!("{DEVICE}/network/interface/ethernet")
}

/// Names of all configured ethernet interfaces (name-only listing).
pub fn ethernet_names() -> String {
    format!("{}/entry/@name", ethernet_root())
}

pub fn ethernet_entry(name: &str) -> String {
    format!("{}/{}", ethernet_root(), entry(name))
}

/// Container for layer-3 subinterfaces of `parent`.
pub fn layer3_units(parent: &str) -> String {
    format!("{}/layer3/units", ethernet_entry(parent))
}

pub fn vsys_root() -> String {
    format!("{DEVICE}/vsys")
}

/// Names of all virtual systems (name-only listing).
pub fn vsys_names() -> String {
    format!("{}/entry/@name", vsys_root())
}

pub fn vsys_entry(vsys: &str) -> String {
    format!("{}/{}", vsys_root(), entry(vsys))
}

/// Interfaces imported into (owned by) a vsys.
pub fn vsys_interface_import(vsys: &str) -> String {
    format!("{}/import/network/interface", vsys_entry(vsys))
}

/// Virtual routers imported into a vsys.
pub fn vsys_virtual_router_import(vsys: &str) -> String {
    format!("{}/import/network/virtual-router", vsys_entry(vsys))
}

/// Interface membership list of a virtual router.
pub fn virtual_router_interfaces(router: &str) -> String {
    format!("{DEVICE}/network/virtual-router/{}/interface", entry(router))
}

/// Layer-3 interface membership list of a zone inside a vsys.
pub fn zone_layer3(vsys: &str, zone: &str) -> String {
    format!("{}/zone/{}/network/layer3", vsys_entry(vsys), entry(zone))
}

/// `show system info` op command.
pub const SHOW_SYSTEM_INFO: &str = "<show><system><info></info></system></show>";

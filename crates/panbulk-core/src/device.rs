// ── XML API device session ──
//
// Renders domain descriptors into config-tree fragments and sends them
// through `XmlApiClient`. Every `create_*` call is exactly one
// `multi-config` request against the candidate config.

use std::time::Duration;

use panbulk_api::{Element, MultiConfig, TlsMode, TransportConfig, XmlApiClient, xpath};
use tracing::debug;

use crate::config::{DeviceTarget, TlsVerification};
use crate::error::CoreError;
use crate::model::{
    EthernetInterface, Layer3Subinterface, SystemInfo, VirtualRouterAssignment, Vsys,
    ZoneAssignment,
};
use crate::session::{Connector, DeviceSession};

/// Opens [`XmlApiSession`]s by generating an API key.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlApiConnector;

impl Connector for XmlApiConnector {
    type Session = XmlApiSession;

    async fn open(&self, target: &DeviceTarget) -> Result<XmlApiSession, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&target.tls),
            timeout: target.timeout,
        };
        let mut client = XmlApiClient::new(target.url.clone(), &transport)?;
        client
            .authenticate(&target.username, &target.password)
            .await
            .map_err(|e| classify(e, target.timeout, "login", target.url.as_str()))?;

        debug!(url = %target.url, "session opened");
        Ok(XmlApiSession::new(client, target.timeout))
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

/// Attach operation context to a failed request.
///
/// Envelope errors become [`CoreError::Rejected`]; everything else is
/// wrapped in [`CoreError::Operation`]. Request timeouts report the
/// configured timeout.
fn classify(
    err: panbulk_api::Error,
    timeout: Duration,
    operation: &str,
    target: &str,
) -> CoreError {
    let source = match err {
        panbulk_api::Error::Api { code, message } => {
            return CoreError::Rejected {
                operation: operation.into(),
                target: target.into(),
                message,
                code,
            };
        }
        panbulk_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout {
            timeout_secs: Some(timeout.as_secs()),
        },
        other => other.into(),
    };
    CoreError::Operation {
        operation: operation.into(),
        target: target.into(),
        source: Box::new(source),
    }
}

/// An authenticated XML API session.
pub struct XmlApiSession {
    client: XmlApiClient,
    timeout: Duration,
}

impl XmlApiSession {
    /// Wrap an already-authenticated client.
    pub fn new(client: XmlApiClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn apply(&self, batch: &MultiConfig, operation: &str, target: &str) -> Result<(), CoreError> {
        self.client
            .multi_config(batch)
            .await
            .map_err(|e| classify(e, self.timeout, operation, target))?;
        Ok(())
    }

    async fn entry_names(&self, xpath: &str, operation: &str) -> Result<Vec<String>, CoreError> {
        let resp = self
            .client
            .get_config(xpath)
            .await
            .map_err(|e| classify(e, self.timeout, operation, xpath))?;

        Ok(resp
            .result()
            .map(|result| {
                result
                    .children_named("entry")
                    .filter_map(|e| e.attr("name"))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ── Element rendering ────────────────────────────────────────────────

fn subinterface_element(sub: &Layer3Subinterface) -> Element {
    let profile = sub
        .management_profile
        .as_ref()
        .map(|p| Element::text("interface-management-profile", p.as_str()));

    Element::entry(sub.name.as_str())
        .child(Element::text("tag", sub.tag.to_string()))
        .child(Element::new("ip").child(Element::entry(sub.address.to_string())))
        .child_opt(profile)
        .child(Element::text("mtu", sub.mtu.to_string()))
        .child(Element::text("comment", sub.comment.as_str()))
}

fn members<'a>(names: impl IntoIterator<Item = &'a String>) -> Vec<Element> {
    names.into_iter().map(|n| Element::member(n.as_str())).collect()
}

/// `set` operations for a subinterface batch: one container per parent
/// interface, in first-seen order, then a single vsys import.
fn subinterface_batch(vsys: &Vsys, batch: &[Layer3Subinterface]) -> MultiConfig {
    let mut groups: Vec<(&str, Vec<Element>)> = Vec::new();
    for sub in batch {
        let element = subinterface_element(sub);
        match groups.iter_mut().find(|(parent, _)| *parent == sub.parent) {
            Some((_, elements)) => elements.push(element),
            None => groups.push((sub.parent.as_str(), vec![element])),
        }
    }

    let mut multi = MultiConfig::new();
    for (parent, elements) in groups {
        multi = multi.set(xpath::layer3_units(parent), elements);
    }
    multi.set(
        xpath::vsys_interface_import(vsys.name()),
        members(batch.iter().map(|s| &s.name)),
    )
}

impl DeviceSession for XmlApiSession {
    async fn system_info(&self) -> Result<SystemInfo, CoreError> {
        let resp = self
            .client
            .op(xpath::SHOW_SYSTEM_INFO)
            .await
            .map_err(|e| classify(e, self.timeout, "show system info", "device"))?;

        let system = resp.result().and_then(|r| r.child("system"));
        let field = |name: &str| system.and_then(|s| s.child_text(name)).map(str::to_owned);
        Ok(SystemInfo {
            hostname: field("hostname"),
            model: field("model"),
            serial: field("serial"),
            sw_version: field("sw-version"),
        })
    }

    async fn list_vsys(&self) -> Result<Vec<Vsys>, CoreError> {
        let names = self.entry_names(&xpath::vsys_names(), "list vsys").await?;
        Ok(names.into_iter().map(Vsys::new).collect())
    }

    async fn list_ethernet_interfaces(&self) -> Result<Vec<String>, CoreError> {
        self.entry_names(&xpath::ethernet_names(), "list interfaces")
            .await
    }

    async fn create_interface(
        &self,
        vsys: &Vsys,
        interface: &EthernetInterface,
    ) -> Result<(), CoreError> {
        let batch = MultiConfig::new()
            .set(
                xpath::ethernet_root(),
                [Element::entry(interface.name.as_str())
                    .child(Element::new(interface.mode.as_str()))],
            )
            .set(
                xpath::vsys_interface_import(vsys.name()),
                [Element::member(interface.name.as_str())],
            );
        self.apply(&batch, "create interface", &interface.name).await
    }

    async fn create_subinterfaces(
        &self,
        vsys: &Vsys,
        batch: &[Layer3Subinterface],
    ) -> Result<(), CoreError> {
        let target = match batch {
            [] => return Ok(()),
            [only] => only.name.clone(),
            [first, .., last] => format!("{}..{}", first.name, last.name),
        };
        self.apply(&subinterface_batch(vsys, batch), "create subinterfaces", &target)
            .await
    }

    async fn create_virtual_router(
        &self,
        vsys: &Vsys,
        assignment: &VirtualRouterAssignment,
    ) -> Result<(), CoreError> {
        let batch = MultiConfig::new()
            .set(
                xpath::virtual_router_interfaces(&assignment.router),
                members(&assignment.interfaces),
            )
            .set(
                xpath::vsys_virtual_router_import(vsys.name()),
                [Element::member(assignment.router.as_str())],
            );
        self.apply(&batch, "create virtual router", &assignment.router)
            .await
    }

    async fn create_zone(
        &self,
        vsys: &Vsys,
        assignment: &ZoneAssignment,
    ) -> Result<(), CoreError> {
        let batch = MultiConfig::new().set(
            xpath::zone_layer3(vsys.name(), &assignment.zone),
            members(&assignment.interfaces),
        );
        self.apply(&batch, "create zone", &assignment.zone).await
    }
}

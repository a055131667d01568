// ── Runtime provisioning configuration ──
//
// These types describe *what* to provision and *how* to reach the device.
// They carry credential data but never touch disk; `panbulk-config` builds
// a `ProvisionConfig` from files/env and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Management interfaces ship self-signed certs.
    #[default]
    DangerAcceptInvalid,
}

/// Everything the workflow needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Management address: a bare host (`10.10.10.1`) or a full URL.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Physical interface to create and split, e.g. `ethernet1/5`.
    pub base_interface: String,
    /// Address/prefix per VLAN tag; tag `n` takes `addresses[n - 1]`.
    pub addresses: Vec<String>,
    /// Number of tags to consume, starting at 1. Defaults to the address count.
    pub tag_count: Option<usize>,
    /// Explicit vsys. When unset, one is picked at random from the device.
    pub vsys: Option<String>,
    pub zone: String,
    pub virtual_router: String,
    pub comment: String,
    pub management_profile: Option<String>,
    pub mtu: u16,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            host: "10.10.10.1".into(),
            username: "admin".into(),
            password: SecretString::from(String::new()),
            base_interface: "ethernet1/5".into(),
            addresses: [
                "1.1.1.1/23",
                "2.2.2.2/23",
                "3.3.3.3/23",
                "4.4.4.4/24",
                "5.5.5.5/24",
                "6.6.6.6/24",
            ]
            .map(String::from)
            .to_vec(),
            tag_count: None,
            vsys: None,
            zone: "local_vlans".into(),
            virtual_router: "default".into(),
            comment: "comment".into(),
            management_profile: None,
            mtu: 1400,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ProvisionConfig {
    /// The management base URL. Bare hosts are reached over HTTPS.
    pub fn base_url(&self) -> Result<Url, CoreError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(CoreError::validation("host", "must not be empty"));
        }
        let raw = if host.contains("://") {
            host.to_owned()
        } else {
            format!("https://{host}")
        };
        raw.parse().map_err(|e: url::ParseError| {
            CoreError::validation("host", format!("invalid address '{host}': {e}"))
        })
    }

    /// Connection parameters for [`Connector::open`](crate::Connector::open).
    pub fn target(&self) -> Result<DeviceTarget, CoreError> {
        Ok(DeviceTarget {
            url: self.base_url()?,
            username: self.username.clone(),
            password: self.password.clone(),
            tls: self.tls.clone(),
            timeout: self.timeout,
        })
    }
}

/// How to reach and authenticate to one device.
#[derive(Debug, Clone)]
pub struct DeviceTarget {
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        let config = ProvisionConfig::default();
        assert_eq!(config.base_url().unwrap().as_str(), "https://10.10.10.1/");
    }

    #[test]
    fn full_url_is_kept() {
        let config = ProvisionConfig {
            host: "http://127.0.0.1:8080".into(),
            ..ProvisionConfig::default()
        };
        assert_eq!(config.base_url().unwrap().as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn empty_host_is_rejected() {
        let config = ProvisionConfig {
            host: "  ".into(),
            ..ProvisionConfig::default()
        };
        assert!(matches!(
            config.base_url(),
            Err(CoreError::ValidationFailed { ref field, .. }) if field == "host"
        ));
    }

    #[test]
    fn defaults_match_reference_scenario() {
        let config = ProvisionConfig::default();
        assert_eq!(config.addresses.len(), 6);
        assert_eq!(config.addresses[3], "4.4.4.4/24");
        assert_eq!(config.base_interface, "ethernet1/5");
        assert_eq!(config.mtu, 1400);
    }
}

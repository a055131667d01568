//! Configuration for panbulk.
//!
//! TOML file + `PANBULK_*` environment layering, password resolution
//! (env + keyring + plaintext), and translation to
//! `panbulk_core::ProvisionConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use panbulk_core::{ProvisionConfig, TlsVerification};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PANBULK_CONFIG";
pub const PASSWORD_ENV: &str = "PANBULK_PASSWORD";
const ENV_PREFIX: &str = "PANBULK_";
const KEYRING_SERVICE: &str = "panbulk";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for {username}@{host}")]
    NoCredentials { host: String, username: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// On-disk configuration. Every key can also be set as `PANBULK_<KEY>`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Management address: bare host or full URL.
    pub host: String,
    pub username: String,

    /// Plaintext password (prefer the keyring or `PANBULK_PASSWORD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    pub base_interface: String,

    /// One `address/prefix` per VLAN tag, tag 1 first.
    pub addresses: Vec<String>,

    /// Tags to consume; defaults to `addresses.len()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_count: Option<usize>,

    /// Fixed vsys. Unset picks one at random.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vsys: Option<String>,

    pub zone: String,
    pub virtual_router: String,
    pub comment: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_profile: Option<String>,

    pub mtu: u16,

    /// Accept self-signed management certificates. Off unless set.
    pub insecure: bool,

    /// CA certificate to verify the management certificate against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout: u64,

    /// Report format: `table`, `json`, or `yaml`.
    pub output: String,

    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let core = ProvisionConfig::default();
        Self {
            host: core.host,
            username: core.username,
            password: None,
            base_interface: core.base_interface,
            addresses: core.addresses,
            tag_count: None,
            vsys: None,
            zone: core.zone,
            virtual_router: core.virtual_router,
            comment: core.comment,
            management_profile: None,
            mtu: core.mtu,
            insecure: false,
            ca_cert: None,
            timeout: core.timeout.as_secs(),
            output: "table".into(),
            log_level: "warn".into(),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// `$PANBULK_CONFIG`, else the platform config dir.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "panbulk", "panbulk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("panbulk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults < TOML at `path` (if present) < `PANBULK_*` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Keyring account for a host's password.
pub fn keyring_user(host: &str) -> String {
    format!("{host}/password")
}

/// Resolve the device password: env var, then system keyring, then
/// plaintext in the config file. Empty values are skipped.
pub fn resolve_password(cfg: &Config) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            debug!("password from environment");
            return Ok(SecretString::from(pw));
        }
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(&cfg.host)) {
        if let Ok(pw) = entry.get_password() {
            debug!("password from keyring");
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = cfg.password {
        if !pw.is_empty() {
            debug!("password from config file");
            return Ok(SecretString::from(pw.clone()));
        }
    }

    Err(ConfigError::NoCredentials {
        host: cfg.host.clone(),
        username: cfg.username.clone(),
    })
}

/// TLS mode implied by `insecure` / `ca_cert`. A CA file wins.
pub fn tls_verification(cfg: &Config) -> TlsVerification {
    if let Some(ref ca_path) = cfg.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else if cfg.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build the workflow input, resolving the password.
pub fn to_provision_config(cfg: &Config) -> Result<ProvisionConfig, ConfigError> {
    if cfg.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    if cfg.username.is_empty() {
        return Err(ConfigError::Validation {
            field: "username".into(),
            reason: "must not be empty".into(),
        });
    }
    if cfg.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let password = resolve_password(cfg)?;

    Ok(ProvisionConfig {
        host: cfg.host.clone(),
        username: cfg.username.clone(),
        password,
        base_interface: cfg.base_interface.clone(),
        addresses: cfg.addresses.clone(),
        tag_count: cfg.tag_count,
        vsys: cfg.vsys.clone(),
        zone: cfg.zone.clone(),
        virtual_router: cfg.virtual_router.clone(),
        comment: cfg.comment.clone(),
        management_profile: cfg.management_profile.clone(),
        mtu: cfg.mtu,
        tls: tls_verification(cfg),
        timeout: Duration::from_secs(cfg.timeout),
    })
}

//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use panbulk_config::ConfigError;
use panbulk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to firewall at {url}")]
    #[diagnostic(
        code(panbulk::connection_failed),
        help(
            "Check that the management interface is reachable over HTTPS.\n\
             Set `host` in the config file or PANBULK_HOST."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(
        "Request timed out{}",
        .seconds.map_or_else(String::new, |s| format!(" after {s}s"))
    )]
    #[diagnostic(
        code(panbulk::timeout),
        help("Increase `timeout` (PANBULK_TIMEOUT) or check firewall responsiveness.")
    )]
    Timeout { seconds: Option<u64> },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(panbulk::auth_failed),
        help("Verify `username` and the password (PANBULK_PASSWORD, keyring, or config file).")
    )]
    AuthFailed { message: String },

    #[error("No password configured for {username}@{host}")]
    #[diagnostic(
        code(panbulk::no_credentials),
        help(
            "Set PANBULK_PASSWORD, store it in the keyring \
             (service 'panbulk', account '{host}/password'), or set `password` in the config file."
        )
    )]
    NoCredentials { host: String, username: String },

    // ── Virtual systems ──────────────────────────────────────────────

    #[error("The firewall reported no virtual systems")]
    #[diagnostic(
        code(panbulk::no_vsys),
        help("Check that the API user can read the device configuration.")
    )]
    NoVsys,

    #[error("Virtual system '{name}' not found")]
    #[diagnostic(code(panbulk::vsys_not_found), help("Available: {available}"))]
    VsysNotFound { name: String, available: String },

    // ── Device state ─────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(
        code(panbulk::conflict),
        help("Pick an unused `base_interface`, or remove the existing one first.")
    )]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Firewall rejected {operation} for {target}: {message}")]
    #[diagnostic(
        code(panbulk::rejected),
        help(
            "Earlier steps stay in the candidate configuration.\n\
             Review or revert them on the firewall before retrying."
        )
    )]
    Rejected {
        operation: String,
        target: String,
        message: String,
    },

    /// Any failed request, tagged with the step and object involved. The
    /// cause keeps its own exit code and help.
    #[error("{operation} failed for {target}")]
    #[diagnostic(code(panbulk::request_failed))]
    Operation {
        operation: String,
        target: String,
        #[source]
        source: Box<CliError>,
        #[help]
        help: Option<String>,
    },

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(panbulk::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("{tags} VLAN tags requested but only {addresses} addresses configured")]
    #[diagnostic(
        code(panbulk::address_list_exhausted),
        help("Add addresses to `addresses` or lower `tag_count`.")
    )]
    AddressListExhausted { tags: usize, addresses: usize },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(panbulk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(panbulk::config),
        help("Check the config file and PANBULK_* environment variables.")
    )]
    Config(Box<figment::Error>),

    // ── Serialization ─────────────────────────────────────────────────

    #[error("Failed to render report: {0}")]
    #[diagnostic(code(panbulk::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render report: {0}")]
    #[diagnostic(code(panbulk::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {message}")]
    #[diagnostic(code(panbulk::internal))]
    Internal { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Operation { source, .. } => source.exit_code(),
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NoVsys | Self::VsysNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::AddressListExhausted { .. } | Self::Validation { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NoVsys => CliError::NoVsys,

            CoreError::VsysNotFound { name, available } => {
                CliError::VsysNotFound { name, available }
            }

            CoreError::AddressListExhausted { tags, addresses } => {
                CliError::AddressListExhausted { tags, addresses }
            }

            CoreError::InvalidAddress {
                index,
                value,
                reason,
            } => CliError::Validation {
                field: format!("addresses[{}]", index.saturating_sub(1)),
                reason: format!("'{value}': {reason}"),
            },

            CoreError::DuplicateAddress { value } => CliError::Validation {
                field: "addresses".into(),
                reason: format!("{value} is listed more than once"),
            },

            CoreError::ValidationFailed { field, reason } => {
                CliError::Validation { field, reason }
            }

            CoreError::InterfaceExists { name } => CliError::Conflict {
                resource_type: "Interface".into(),
                identifier: name,
            },

            CoreError::Rejected {
                operation,
                target,
                message,
                code: _,
            } => CliError::Rejected {
                operation,
                target,
                message,
            },

            CoreError::Operation {
                operation,
                target,
                source,
            } => {
                let source = Box::new(CliError::from(*source));
                let help = source.help().map(|h| h.to_string());
                CliError::Operation {
                    operation,
                    target,
                    source,
                    help,
                }
            }

            CoreError::Api { message, code } => CliError::ApiError {
                code: code.unwrap_or_else(|| "none".into()),
                message,
            },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { host, username } => {
                CliError::NoCredentials { host, username }
            }
            ConfigError::Figment(e) => CliError::Config(e),
        }
    }
}

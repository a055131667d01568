// ── Core error types ──
//
// Workflow-level errors. Consumers never see raw HTTP statuses or XML
// envelopes; the `From<panbulk_api::Error>` impl translates transport-layer
// errors, and the device session attaches operation/target context to every
// failed request.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to firewall at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// `timeout_secs` is the configured request timeout, when known.
    #[error(
        "Request to firewall timed out{}",
        .timeout_secs.map_or_else(String::new, |s| format!(" after {s}s"))
    )]
    Timeout { timeout_secs: Option<u64> },

    // ── Vsys selection ───────────────────────────────────────────────
    #[error("Firewall reported no virtual systems")]
    NoVsys,

    #[error("Virtual system '{name}' not found (available: {available})")]
    VsysNotFound { name: String, available: String },

    // ── Plan validation ──────────────────────────────────────────────
    #[error("{tags} VLAN tags requested but only {addresses} addresses configured")]
    AddressListExhausted { tags: usize, addresses: usize },

    #[error("Invalid address #{index} '{value}': {reason}")]
    InvalidAddress {
        index: usize,
        value: String,
        reason: String,
    },

    #[error("Address {value} is assigned to more than one subinterface")]
    DuplicateAddress { value: String },

    #[error("Invalid {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    // ── Device-side errors ───────────────────────────────────────────
    #[error("Interface {name} already exists on the firewall")]
    InterfaceExists { name: String },

    #[error("Firewall rejected {operation} for {target}: {message}")]
    Rejected {
        operation: String,
        target: String,
        message: String,
        code: Option<String>,
    },

    /// A request that failed for any reason other than an explicit
    /// rejection, tagged with what was being attempted.
    #[error("{operation} failed for {target}: {source}")]
    Operation {
        operation: String,
        target: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<panbulk_api::Error> for CoreError {
    fn from(err: panbulk_api::Error) -> Self {
        match err {
            panbulk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            panbulk_api::Error::NotAuthenticated => CoreError::AuthenticationFailed {
                message: "no API key -- session was not opened".into(),
            },
            panbulk_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: None }
                } else {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            }
            panbulk_api::Error::InvalidUrl(e) => CoreError::ValidationFailed {
                field: "host".into(),
                reason: e.to_string(),
            },
            panbulk_api::Error::Tls(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            panbulk_api::Error::Http { status, body } => CoreError::Api {
                message: format!("HTTP {status}: {body}"),
                code: None,
            },
            panbulk_api::Error::Api { code, message } => CoreError::Api { message, code },
            panbulk_api::Error::MalformedResponse { message, body: _ } => {
                CoreError::Internal(format!("Malformed response: {message}"))
            }
        }
    }
}

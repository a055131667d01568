use thiserror::Error;

/// Top-level error type for the `panbulk-api` crate.
///
/// Covers every failure mode of the XML API surface: authentication,
/// transport, envelope errors reported by the device, and unparseable
/// responses. `panbulk-core` maps these into workflow-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Key generation or a keyed request was rejected (bad credentials,
    /// expired key, HTTP 401/403, or envelope code 403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A keyed request was attempted before `authenticate()` succeeded.
    #[error("No API key -- authenticate before issuing requests")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error (unreadable or invalid CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status that is not an auth failure.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── XML API ─────────────────────────────────────────────────────
    /// `<response status="error">` envelope returned by the device.
    #[error("API error (code {}): {message}", .code.as_deref().unwrap_or("none"))]
    Api {
        code: Option<String>,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not a well-formed `<response>` document.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String, body: String },
}

// XML API HTTP client
//
// Wraps `reqwest::Client` with endpoint construction, API-key handling and
// envelope unwrapping. Every call is a form-encoded POST to `/api/`, so
// credentials and config fragments never end up in request URLs or logs.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::multi_config::MultiConfig;
use crate::response::ApiResponse;
use crate::transport::TransportConfig;

const API_KEY_HEADER: &str = "X-PAN-KEY";

/// Raw HTTP client for a firewall's XML management API.
///
/// Call [`authenticate`](Self::authenticate) first; every later request
/// carries the generated key in the `X-PAN-KEY` header. All methods return
/// the parsed envelope only after it has been checked for errors.
pub struct XmlApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl XmlApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the management root, e.g. `https://10.10.10.1`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            api_key: None,
        }
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Generate an API key for `username`/`password` and keep it for all
    /// subsequent requests.
    ///
    /// `POST /api/ type=keygen`
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<(), Error> {
        debug!(username, url = %self.base_url, "generating API key");

        let resp = self
            .send(
                &[
                    ("type", "keygen"),
                    ("user", username),
                    ("password", password.expose_secret()),
                ],
                false,
            )
            .await
            .map_err(|e| match e {
                // Keygen rejections come back as plain API errors on some
                // releases; any envelope error here is a credential problem.
                Error::Api { message, .. } => Error::Authentication { message },
                other => other,
            })?;

        let key = resp
            .result()
            .and_then(|r| r.child_text("key"))
            .ok_or_else(|| Error::MalformedResponse {
                message: "keygen response has no <key>".into(),
                body: String::new(),
            })?;

        self.api_key = Some(SecretString::from(key.to_owned()));
        debug!("API key generated");
        Ok(())
    }

    // ── Config / operational requests ────────────────────────────────

    /// Read the candidate config at `xpath`.
    ///
    /// `POST /api/ type=config action=get`
    pub async fn get_config(&self, xpath: &str) -> Result<ApiResponse, Error> {
        debug!(xpath, "config get");
        self.send(
            &[("type", "config"), ("action", "get"), ("xpath", xpath)],
            true,
        )
        .await
    }

    /// Apply several `set` operations in one request.
    ///
    /// `POST /api/ type=config action=multi-config element=<multi-config>...`
    pub async fn multi_config(&self, batch: &MultiConfig) -> Result<ApiResponse, Error> {
        debug!(operations = batch.len(), "config multi-config");
        trace!("multi-config body:\n{}", batch.describe());
        let element = batch.to_element().to_string();
        self.send(
            &[
                ("type", "config"),
                ("action", "multi-config"),
                ("element", &element),
            ],
            true,
        )
        .await
    }

    /// Run an operational command, e.g. `<show><system><info/></system></show>`.
    ///
    /// `POST /api/ type=op cmd=...`
    pub async fn op(&self, cmd: &str) -> Result<ApiResponse, Error> {
        debug!(cmd, "op command");
        self.send(&[("type", "op"), ("cmd", cmd)], true).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn api_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join("/api/")?)
    }

    async fn send(&self, params: &[(&str, &str)], keyed: bool) -> Result<ApiResponse, Error> {
        let url = self.api_url()?;
        let mut builder = self.http.post(url).form(params);

        if keyed {
            let key = self.api_key.as_ref().ok_or(Error::NotAuthenticated)?;
            builder = builder.header(API_KEY_HEADER, key.expose_secret());
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let body = resp.text().await.unwrap_or_default();
            let message = ApiResponse::parse(&body)
                .map(|r| r.message())
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(Error::Authentication { message });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if keyed {
            // Keygen replies carry the key itself; only keyed calls are traced.
            trace!(status = status.as_u16(), "response body: {body}");
        }

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        ApiResponse::parse(&body)?.into_result()
    }
}

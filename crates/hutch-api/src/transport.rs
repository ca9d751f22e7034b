// HTTP transport for the management API.
//
// `TransportConfig` builds the `reqwest::Client` (TLS, timeout, user agent);
// `HttpClient` is the single network-facing unit: it attaches Basic
// credentials, sends JSON, decodes JSON, and turns statuses outside
// 200..=206 into `Error::Http`. Everything in the resource layer goes
// through `HttpClient::request`.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;

/// Default per-request ceiling.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the bundled root certificate store.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed brokers in test setups).
    DangerAcceptInvalid,
}

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("hutch/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Normalize a broker address into the management API base URL.
///
/// Accepts `host:port` (defaults to `http://`), `http://host:port`, or a URL
/// that already ends in `/api`. The result always ends in `/api/` so that
/// relative endpoint paths join underneath it.
pub fn api_base_url(raw: &str) -> Result<Url, Error> {
    let with_scheme = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("http://{raw}")
    };
    let mut url = Url::parse(&with_scheme)?;

    let path = url.path().trim_end_matches('/').to_owned();
    if path.ends_with("/api") {
        url.set_path(&format!("{path}/"));
    } else {
        url.set_path(&format!("{path}/api/"));
    }
    Ok(url)
}

// ── Error body ───────────────────────────────────────────────────────

/// Shape of the broker's JSON error body: `{"error": "...", "reason": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    reason: Option<Value>,
}

fn error_detail(raw: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(raw).ok()?;
    match body.reason? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

// ── HttpClient ───────────────────────────────────────────────────────

/// Raw HTTP client for the management API.
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            credentials,
            timeout: transport.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn network_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Network(err)
        }
    }

    /// Send one request and decode the reply.
    ///
    /// Returns `Ok(None)` when the broker answered with an empty body (or a
    /// body that is not JSON), `Ok(Some(value))` otherwise.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        headers: Option<HeaderMap>,
    ) -> Result<Option<Value>, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut req = self
            .http
            .request(method, url)
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            );
        if let Some(extra) = headers {
            req = req.headers(extra);
        }
        if let Some(ref payload) = body {
            req = req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(payload.clone());
        }

        let resp = req.send().await.map_err(|e| self.network_error(e))?;
        let status = resp.status();
        let raw = resp.text().await.map_err(|e| self.network_error(e))?;

        if !is_success(status) {
            return Err(Error::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
                detail: error_detail(&raw),
                path: path.to_owned(),
                body,
            });
        }

        Ok(decode(&raw))
    }
}

/// The management API signals success with 200..=206.
fn is_success(status: StatusCode) -> bool {
    (200..=206).contains(&status.as_u16())
}

fn decode(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "response body is not JSON, treating as no content");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_from_host_port() {
        let url = api_base_url("localhost:15672").unwrap();
        assert_eq!(url.as_str(), "http://localhost:15672/api/");
    }

    #[test]
    fn base_url_keeps_existing_api_suffix() {
        let url = api_base_url("https://rabbit.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://rabbit.example.com/api/");
    }

    #[test]
    fn base_url_under_a_path_prefix() {
        let url = api_base_url("https://proxy.example.com/rabbitmq/").unwrap();
        assert_eq!(url.as_str(), "https://proxy.example.com/rabbitmq/api/");
    }

    #[test]
    fn escaped_segments_survive_the_join() {
        let base = api_base_url("localhost:15672").unwrap();
        let url = base.join("queues/%2F/jobs").unwrap();
        assert_eq!(url.path(), "/api/queues/%2F/jobs");
    }

    #[test]
    fn success_range_is_200_to_206() {
        assert!(is_success(StatusCode::OK));
        assert!(is_success(StatusCode::NO_CONTENT));
        assert!(is_success(StatusCode::PARTIAL_CONTENT));
        assert!(!is_success(StatusCode::MULTI_STATUS));
        assert!(!is_success(StatusCode::NOT_FOUND));
    }

    #[test]
    fn undecodable_body_is_no_content() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("not json"), None);
        assert_eq!(decode("{\"routed\":true}"), Some(serde_json::json!({"routed": true})));
    }

    #[test]
    fn error_detail_uses_reason_field() {
        assert_eq!(
            error_detail(r#"{"error":"Object Not Found","reason":"Not Found"}"#).as_deref(),
            Some("Not Found")
        );
        assert_eq!(error_detail(r#"{"error":"bad_request"}"#), None);
        assert_eq!(error_detail("<html>oops</html>"), None);
    }
}

// Management API resource client
//
// `Client` pairs the transport with the admin gate and offers typed helpers
// (list / single record / write) on top of `HttpClient::request`. The
// per-resource operations live in sibling modules as inherent methods so
// this file stays focused on request plumbing.

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::admin::AdminGate;
use crate::auth::Credentials;
use crate::error::Error;
use crate::paths::Endpoint;
use crate::transport::{HttpClient, TransportConfig, api_base_url};

/// Everything needed to talk to one broker.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Broker management address: `host:port`, a full URL, or a URL ending
    /// in `/api`.
    pub url: String,
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
            transport: TransportConfig::default(),
        }
    }
}

/// Async client for the RabbitMQ management HTTP API.
pub struct Client {
    http: HttpClient,
    pub(crate) admin: AdminGate,
}

impl Client {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let base_url = api_base_url(&config.url)?;
        let http = HttpClient::new(base_url, config.credentials.clone(), &config.transport)?;
        Ok(Self::from_http(http))
    }

    fn from_http(http: HttpClient) -> Self {
        Self {
            http,
            admin: AdminGate::default(),
        }
    }

    /// The `/api/` base URL every path is joined onto.
    pub fn base_url(&self) -> &Url {
        self.http.base_url()
    }

    /// The configured user name.
    pub fn username(&self) -> &str {
        self.http.username()
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) fn path(endpoint: Endpoint, args: &[&str]) -> Result<String, Error> {
        endpoint.render(args)
    }

    /// Raw request through the transport.
    pub(crate) async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        headers: Option<HeaderMap>,
    ) -> Result<Option<Value>, Error> {
        self.http.request(method, path, body, headers).await
    }

    /// GET a list. An empty reply is an empty list.
    pub(crate) async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Error> {
        match self.call(Method::GET, path, None, None).await? {
            Some(value) => decode(&value),
            None => Ok(Vec::new()),
        }
    }

    /// GET a single record. An empty reply is an error.
    pub(crate) async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let value = self.call(Method::GET, path, None, None).await?;
        expect_record(path, value)
    }

    /// PUT a JSON body, returning `true` on any success status.
    pub(crate) async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<bool, Error> {
        let body = serde_json::to_string(body)?;
        self.call(Method::PUT, path, Some(body), None).await?;
        Ok(true)
    }

    /// POST a JSON body and hand back the decoded reply, if any.
    pub(crate) async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<Value>, Error> {
        let body = serde_json::to_string(body)?;
        self.call(Method::POST, path, Some(body), None).await
    }

    /// DELETE, returning `true` on any success status (usually 204).
    pub(crate) async fn delete(&self, path: &str) -> Result<bool, Error> {
        self.delete_with_headers(path, None).await
    }

    pub(crate) async fn delete_with_headers(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<bool, Error> {
        self.call(Method::DELETE, path, None, headers).await?;
        Ok(true)
    }
}

// ── Decoding ─────────────────────────────────────────────────────────

pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, Error> {
    T::deserialize(value).map_err(|e| {
        let body = value.to_string();
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

pub(crate) fn expect_record<T: DeserializeOwned>(
    path: &str,
    value: Option<Value>,
) -> Result<T, Error> {
    match value {
        Some(value) => decode(&value),
        None => Err(Error::Api {
            message: format!("empty response from {path}"),
            source: None,
        }),
    }
}

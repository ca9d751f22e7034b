use thiserror::Error;

/// Top-level error type for the `hutch-api` crate.
///
/// Four kinds matter to callers: [`Network`](Self::Network) /
/// [`Timeout`](Self::Timeout) when nothing usable came back from the broker,
/// [`Http`](Self::Http) when the broker answered with a non-success status,
/// [`Api`](Self::Api) when a resource method gave a specific status a clearer
/// meaning, and [`Permission`](Self::Permission) when the admin gate refused
/// the call before anything was sent.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, broken pipe, etc.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request exceeded the configured per-request ceiling.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Broker responses ────────────────────────────────────────────
    /// The broker answered with a status outside 200..=206.
    ///
    /// `detail` holds the broker's own `"reason"` field when the error
    /// body carried one; `body` is the request body that was sent.
    #[error("{status} - {reason} ({}) ({path})", .detail.as_deref().unwrap_or("no detail"))]
    Http {
        status: u16,
        reason: String,
        detail: Option<String>,
        path: String,
        body: Option<String>,
    },

    /// A semantic failure layered over a specific HTTP status.
    #[error("API error: {message}")]
    Api {
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Raised locally when the authenticated user lacks administrator rights.
    #[error("Insufficient privileges for '{operation}': user '{user}' is not an administrator")]
    Permission { user: String, operation: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A decoded JSON body did not match the expected record shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A name of `.` or `..` would be resolved away by URL normalization.
    #[error("Name '{segment}' cannot be addressed through '{template}'")]
    DotSegment {
        template: &'static str,
        segment: String,
    },

    /// A path template was rendered with the wrong number of arguments.
    #[error("Path template '{template}' expects {expected} argument(s), got {got}")]
    Path {
        template: &'static str,
        expected: usize,
        got: usize,
    },
}

impl Error {
    /// Wrap an error as an [`Api`](Self::Api) error with a clearer message.
    pub(crate) fn api(message: impl Into<String>, source: Self) -> Self {
        Self::Api {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The HTTP status behind this error, looking through `Api` wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Api {
                source: Some(inner),
                ..
            } => inner.status(),
            _ => None,
        }
    }

    /// Returns `true` if the broker reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if nothing usable reached or came back from the broker.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }

    /// Returns `true` if the gate or the broker refused the credentials.
    pub fn is_permission(&self) -> bool {
        matches!(self, Self::Permission { .. }) || matches!(self.status(), Some(401 | 403))
    }
}

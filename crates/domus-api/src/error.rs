use thiserror::Error;

/// Top-level error type for the `domus-api` crate.
///
/// Every call through the gateway ends in exactly one of: a decoded
/// envelope, or one of these variants. `domus-core` maps them into
/// user-facing outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// DNS failure, refused connection, TLS failure or timeout.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured endpoint is not a usable base URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// URL join failure while building a request path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client-construction failure.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the envelope message when the
    /// server sent one, otherwise a trimmed body preview.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Application ─────────────────────────────────────────────────
    /// `status == "error"` inside an otherwise successful response.
    #[error("Server rejected request: {message}")]
    Api { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local validation ────────────────────────────────────────────
    /// Input rejected before any network call was attempted.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl Error {
    /// HTTP status code, for `Http` errors and status-bearing transport errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for 5xx responses.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` for 4xx responses.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if the server refused the session (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Tls(_))
    }

    /// Returns `true` if the failure happened before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidEndpoint { .. } | Self::InvalidUrl(_)
        )
    }
}

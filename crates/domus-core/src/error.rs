// ── Core error types ──
//
// User-facing errors from domus-core. Consumers see categories (could not
// connect, server failed, request rejected) rather than raw transport
// errors. The `From<domus_api::Error>` impl does the translation.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// `status` is absent when the server refused credentials inside a
    /// successful response.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        status: Option<u16>,
        message: String,
    },

    // ── HTTP errors ──────────────────────────────────────────────────
    /// 5xx from the server.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// 4xx other than authentication and not-found.
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Not found: {message}")]
    NotFound { status: u16, message: String },

    // ── Application errors ───────────────────────────────────────────
    /// The server answered `status: "error"`.
    #[error("Server reported failure: {message}")]
    Api { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status, when the server answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. }
            | Self::Rejected { status, .. }
            | Self::NotFound { status, .. } => Some(*status),
            Self::AuthenticationFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// No response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<domus_api::Error> for CoreError {
    fn from(err: domus_api::Error) -> Self {
        match err {
            domus_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            }
            domus_api::Error::Tls(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            domus_api::Error::Http { status, message } => match status {
                401 | 403 => CoreError::AuthenticationFailed {
                    status: Some(status),
                    message,
                },
                404 => CoreError::NotFound { status, message },
                500..=599 => CoreError::Server { status, message },
                _ => CoreError::Rejected { status, message },
            },
            domus_api::Error::Api { message } => CoreError::Api { message },
            domus_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response: {message}"))
            }
            domus_api::Error::InvalidEndpoint { endpoint, reason } => CoreError::Validation {
                message: format!("endpoint '{endpoint}': {reason}"),
            },
            domus_api::Error::InvalidUrl(e) => CoreError::Validation {
                message: format!("invalid URL: {e}"),
            },
            domus_api::Error::Validation { field, reason } => CoreError::Validation {
                message: format!("{field}: {reason}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> CoreError {
        domus_api::Error::Http {
            status,
            message: "m".into(),
        }
        .into()
    }

    #[test]
    fn http_statuses_map_to_categories() {
        assert!(matches!(http(401), CoreError::AuthenticationFailed { .. }));
        assert!(matches!(http(404), CoreError::NotFound { .. }));
        assert_eq!(http(403).status(), Some(403));
        assert_eq!(http(404).status(), Some(404));
        assert!(matches!(http(409), CoreError::Rejected { status: 409, .. }));
        let server = http(503);
        assert!(server.is_server_error());
        assert_eq!(server.status(), Some(503));
    }

    #[test]
    fn local_validation_stays_local() {
        let err: CoreError = domus_api::Error::Validation {
            field: "username".into(),
            reason: "cannot be empty".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Validation failed: username: cannot be empty"
        );
    }
}

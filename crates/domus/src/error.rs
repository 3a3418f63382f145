//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use domus_config::ConfigError;
use domus_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const SERVER: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to server at {url}")]
    #[diagnostic(
        code(domus::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Change the address with: domus config set-endpoint <url>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(domus::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(domus::auth_failed),
        help("Log in again with: domus login")
    )]
    AuthFailed { message: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Server error (HTTP {status}): {message}")]
    #[diagnostic(code(domus::server_error))]
    Server { status: u16, message: String },

    #[error("Request rejected (HTTP {status}): {message}")]
    #[diagnostic(code(domus::rejected))]
    Rejected { status: u16, message: String },

    #[error("Server reported failure: {message}")]
    #[diagnostic(code(domus::api_error))]
    ApiError { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(domus::not_found),
        help("Run: domus {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(domus::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(domus::config),
        help("Check the config file printed by: domus config path")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Unexpected response from server: {message}")]
    #[diagnostic(code(domus::internal))]
    Internal { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Server { .. } => exit_code::SERVER,
            Self::Validation { .. } => exit_code::USAGE,
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
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::AuthenticationFailed { message, .. } => CliError::AuthFailed { message },
            CoreError::Server { status, message } => CliError::Server { status, message },
            CoreError::Rejected { status, message } => CliError::Rejected { status, message },
            CoreError::NotFound { message, .. } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: message,
                list_command: "dashboard".into(),
            },
            CoreError::Api { message } => CliError::ApiError { message },
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

impl From<domus_api::Error> for CliError {
    fn from(err: domus_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_get_their_own_exit_code() {
        let err: CliError = CoreError::Server {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::SERVER);
    }

    #[test]
    fn auth_failure_suggests_login() {
        let err: CliError = CoreError::AuthenticationFailed {
            status: Some(401),
            message: "Invalid username or password".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
        let help = Diagnostic::help(&err)
            .map(|h| h.to_string())
            .unwrap_or_default();
        assert!(help.contains("domus login"));
    }
}

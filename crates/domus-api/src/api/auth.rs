// Authentication and connectivity endpoints
//
// Login posts JSON credentials; the server answers with an envelope and a
// `session` cookie, which the gateway's response pipeline stores.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::envelope::{ApiEnvelope, ServerStatusPayload};
use crate::error::Error;
use crate::gateway::SessionGateway;
use crate::models::{LoginRequest, LoginResponse, ServerStatus, UserInfo};

/// `data` of `GET api/user/profile`.
#[derive(Debug, serde::Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub user: Option<UserInfo>,
}

impl SessionGateway {
    /// Authenticate with username and password.
    ///
    /// `POST api/login` with `{"username", "password"}`. Empty credentials
    /// are rejected locally without contacting the server.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<ApiEnvelope<LoginResponse>, Error> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation {
                field: "username".into(),
                reason: "username cannot be empty".into(),
            });
        }
        if password.expose_secret().trim().is_empty() {
            return Err(Error::Validation {
                field: "password".into(),
                reason: "password cannot be empty".into(),
            });
        }

        debug!(username, "logging in");
        let body = LoginRequest {
            username,
            password: password.expose_secret().trim(),
        };
        self.post(&["api", "login"], &body).await
    }

    /// End the server-side session.
    ///
    /// `GET logout`. The server answers with a redirect to its login page,
    /// so only the HTTP status is checked. Does not touch the stored token;
    /// callers clear it.
    pub async fn logout_remote(&self) -> Result<(), Error> {
        debug!("logging out");
        self.get_status_only(&["logout"]).await
    }

    /// Connectivity check.
    ///
    /// `GET api/ping`
    pub async fn ping(&self) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        self.get(&["api", "ping"]).await
    }

    /// Server status.
    ///
    /// `GET api/status`
    pub async fn server_status(&self) -> Result<ServerStatus, Error> {
        let payload: ServerStatusPayload = self.get(&["api", "status"]).await?;
        payload.into_status()
    }

    /// Profile of the logged-in user.
    ///
    /// `GET api/user/profile`
    pub async fn user_profile(&self) -> Result<ApiEnvelope<ProfileResponse>, Error> {
        self.get(&["api", "user", "profile"]).await
    }
}

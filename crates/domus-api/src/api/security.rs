// Security system endpoints

use tracing::debug;

use crate::envelope::{ApiEnvelope, SecurityPayload};
use crate::error::Error;
use crate::gateway::SessionGateway;
use crate::models::{SecurityState, SecurityToggleRequest};

impl SessionGateway {
    /// Current security state.
    ///
    /// `GET api/security`. `Ok(None)` when the server reports no state.
    pub async fn security_state(&self) -> Result<Option<SecurityState>, Error> {
        let payload: SecurityPayload = self.get(&["api", "security"]).await?;
        payload.into_state()
    }

    /// Arm or disarm.
    ///
    /// `POST api/security` with `{"state": "Załączony"|"Wyłączony"}`
    pub async fn set_security_state(
        &self,
        armed: bool,
    ) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        let state = SecurityState::armed(armed);
        debug!(state = state.label(), "setting security state");
        self.post(
            &["api", "security"],
            &SecurityToggleRequest {
                state: state.label(),
            },
        )
        .await
    }
}

// ── Home facade ──
//
// What a UI layer talks to. Wraps the gateway and the dashboard
// orchestrator; commands only touch the published snapshot after the
// server has confirmed them.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use domus_api::models::{DeviceDraft, SecurityState, ThermostatDraft};
use domus_api::{SessionGateway, UserInfo};

use crate::error::CoreError;
use crate::refresh::{DashboardEvent, DashboardRefreshOrchestrator, RefreshOutcome};
use crate::snapshot::DashboardSnapshot;

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc`. Construct one at startup from an
/// explicitly built [`SessionGateway`].
#[derive(Clone)]
pub struct Home {
    inner: Arc<HomeInner>,
}

struct HomeInner {
    gateway: Arc<SessionGateway>,
    dashboard: DashboardRefreshOrchestrator,
}

impl Home {
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        let dashboard = DashboardRefreshOrchestrator::new(Arc::clone(&gateway));
        Self {
            inner: Arc::new(HomeInner { gateway, dashboard }),
        }
    }

    pub fn gateway(&self) -> &Arc<SessionGateway> {
        &self.inner.gateway
    }

    pub fn dashboard(&self) -> &DashboardRefreshOrchestrator {
        &self.inner.dashboard
    }

    // ── Dashboard ────────────────────────────────────────────────────

    /// Start a refresh in the background. Results arrive through [`subscribe`](Self::subscribe).
    pub fn refresh(&self) -> JoinHandle<RefreshOutcome> {
        let home = self.clone();
        tokio::spawn(async move { home.inner.dashboard.refresh().await })
    }

    /// Run a refresh and wait for it.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        self.inner.dashboard.refresh().await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.dashboard.subscribe()
    }

    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        self.inner.dashboard.snapshot()
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Log in. On success the session cookie has been stored by the gateway.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<UserInfo>, CoreError> {
        let envelope = self.inner.gateway.login(username, password).await?;
        let data = envelope
            .into_result()
            .map_err(|e| match e {
                domus_api::Error::Api { message } => CoreError::AuthenticationFailed {
                    status: None,
                    message,
                },
                other => other.into(),
            })?;
        let user = data.and_then(|d| d.user);
        info!(user = user.as_ref().map(|u| u.name.as_str()), "logged in");
        Ok(user)
    }

    /// End the session. The local token is cleared even if the server
    /// cannot be reached.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.gateway.logout_remote().await {
            warn!(error = %e, "server logout failed, clearing local session anyway");
        }
        self.inner.gateway.store().clear_session();
        debug!("session cleared");
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.gateway.has_session()
    }

    // ── Endpoint ─────────────────────────────────────────────────────

    /// The endpoint as the user entered it.
    pub fn endpoint(&self) -> String {
        self.inner.gateway.stored_endpoint()
    }

    /// Validate, persist and switch to a new endpoint.
    pub fn set_endpoint(&self, endpoint: &str) -> Result<Url, CoreError> {
        Ok(self.inner.gateway.reconfigure(endpoint)?)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Toggle a device; the snapshot flips only after the server confirms.
    pub async fn toggle_device(&self, id: &str) -> Result<(), CoreError> {
        self.inner.gateway.toggle_device(id).await?.into_unit()?;
        self.inner.dashboard.update(|snap| {
            let Some(device) = snap.devices.iter_mut().find(|d| d.id == id) else {
                return false;
            };
            device.state = !device.state;
            true
        });
        Ok(())
    }

    /// Set a thermostat's target; the snapshot follows on confirmation.
    pub async fn set_thermostat_target(&self, id: &str, temperature: f64) -> Result<(), CoreError> {
        self.inner
            .gateway
            .set_thermostat_target(id, temperature)
            .await?
            .into_unit()?;
        self.inner.dashboard.update(|snap| {
            let Some(thermostat) = snap.thermostats.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            thermostat.temperature = temperature;
            true
        });
        Ok(())
    }

    /// Arm or disarm the security system.
    pub async fn set_security(&self, armed: bool) -> Result<(), CoreError> {
        self.inner
            .gateway
            .set_security_state(armed)
            .await?
            .into_unit()?;
        let label = SecurityState::armed(armed).label().to_owned();
        self.inner.dashboard.update(|snap| {
            if snap.security_state == label {
                false
            } else {
                snap.security_state = label;
                true
            }
        });
        Ok(())
    }

    // ── Rooms / devices / thermostats ────────────────────────────────

    pub async fn create_room(&self, name: &str) -> Result<(), CoreError> {
        Ok(self.inner.gateway.create_room(name).await?.into_unit()?)
    }

    pub async fn update_room(&self, id: &str, name: &str) -> Result<(), CoreError> {
        Ok(self
            .inner
            .gateway
            .update_room(id, name)
            .await?
            .into_unit()?)
    }

    pub async fn delete_room(&self, id: &str) -> Result<(), CoreError> {
        Ok(self.inner.gateway.delete_room(id).await?.into_unit()?)
    }

    pub async fn create_device(&self, draft: &DeviceDraft) -> Result<(), CoreError> {
        Ok(self.inner.gateway.create_device(draft).await?.into_unit()?)
    }

    pub async fn update_device(&self, id: &str, draft: &DeviceDraft) -> Result<(), CoreError> {
        Ok(self
            .inner
            .gateway
            .update_device(id, draft)
            .await?
            .into_unit()?)
    }

    pub async fn delete_device(&self, id: &str) -> Result<(), CoreError> {
        Ok(self.inner.gateway.delete_device(id).await?.into_unit()?)
    }

    pub async fn create_thermostat(&self, draft: &ThermostatDraft) -> Result<(), CoreError> {
        Ok(self
            .inner
            .gateway
            .create_thermostat(draft)
            .await?
            .into_unit()?)
    }

    pub async fn update_thermostat(
        &self,
        id: &str,
        draft: &ThermostatDraft,
    ) -> Result<(), CoreError> {
        Ok(self
            .inner
            .gateway
            .update_thermostat(id, draft)
            .await?
            .into_unit()?)
    }

    pub async fn delete_thermostat(&self, id: &str) -> Result<(), CoreError> {
        Ok(self
            .inner
            .gateway
            .delete_thermostat(id)
            .await?
            .into_unit()?)
    }
}

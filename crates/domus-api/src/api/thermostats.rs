// Temperature control endpoints

use tracing::debug;

use crate::envelope::{ApiEnvelope, ListPayload};
use crate::error::Error;
use crate::gateway::SessionGateway;
use crate::models::{TemperatureSetRequest, ThermostatControl, ThermostatDraft};

impl SessionGateway {
    /// List thermostats.
    ///
    /// `GET api/temperature_controls`
    pub async fn list_thermostats(&self) -> Result<Vec<ThermostatControl>, Error> {
        let payload: ListPayload<ThermostatControl> =
            self.get(&["api", "temperature_controls"]).await?;
        debug!(shape = payload.shape(), "thermostats payload");
        payload.into_items("temperature_controls")
    }

    /// Set a thermostat's target temperature.
    ///
    /// `POST api/temperature_controls/{id}/temperature` with
    /// `{"temperature": value}`. The value is passed through as given;
    /// range checks belong to the caller.
    pub async fn set_thermostat_target(
        &self,
        id: &str,
        temperature: f64,
    ) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        if !temperature.is_finite() {
            return Err(Error::Validation {
                field: "temperature".into(),
                reason: format!("not a number: {temperature}"),
            });
        }
        debug!(id, temperature, "setting thermostat target");
        self.post(
            &["api", "temperature_controls", id, "temperature"],
            &TemperatureSetRequest { temperature },
        )
        .await
    }

    /// Create a thermostat.
    ///
    /// `POST api/temperature_controls`
    pub async fn create_thermostat(
        &self,
        draft: &ThermostatDraft,
    ) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        self.post(&["api", "temperature_controls"], draft).await
    }

    /// Update a thermostat.
    ///
    /// `PUT api/temperature_controls/{id}`
    pub async fn update_thermostat(
        &self,
        id: &str,
        draft: &ThermostatDraft,
    ) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        self.put(&["api", "temperature_controls", id], draft).await
    }

    /// Delete a thermostat.
    ///
    /// `DELETE api/temperature_controls/{id}`
    pub async fn delete_thermostat(
        &self,
        id: &str,
    ) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        self.delete(&["api", "temperature_controls", id]).await
    }
}

// Device ("button") endpoints

use tracing::debug;

use crate::envelope::{ApiEnvelope, ListPayload};
use crate::error::Error;
use crate::gateway::SessionGateway;
use crate::models::{Device, DeviceDraft};

impl SessionGateway {
    /// List devices.
    ///
    /// `GET api/buttons`
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        let payload: ListPayload<Device> = self.get(&["api", "buttons"]).await?;
        debug!(shape = payload.shape(), "devices payload");
        payload.into_items("buttons")
    }

    /// Flip a device on or off.
    ///
    /// `POST api/buttons/{id}/toggle`. The caller updates local state only
    /// after the envelope reports success.
    pub async fn toggle_device(&self, id: &str) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        debug!(id, "toggling device");
        self.post_empty(&["api", "buttons", id, "toggle"]).await
    }

    /// Create a device.
    ///
    /// `POST api/buttons`
    pub async fn create_device(
        &self,
        draft: &DeviceDraft,
    ) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        self.post(&["api", "buttons"], draft).await
    }

    /// Update a device.
    ///
    /// `PUT api/buttons/{id}`
    pub async fn update_device(
        &self,
        id: &str,
        draft: &DeviceDraft,
    ) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        self.put(&["api", "buttons", id], draft).await
    }

    /// Delete a device.
    ///
    /// `DELETE api/buttons/{id}`
    pub async fn delete_device(&self, id: &str) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        self.delete(&["api", "buttons", id]).await
    }
}

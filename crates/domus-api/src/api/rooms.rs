// Room endpoints

use serde_json::json;
use tracing::debug;

use crate::envelope::{ApiEnvelope, ListPayload};
use crate::error::Error;
use crate::gateway::SessionGateway;
use crate::models::{Room, RoomEntry};

impl SessionGateway {
    /// List rooms.
    ///
    /// `GET api/rooms`. Accepts a bare array, an enveloped array, or
    /// `{"data": {"rooms": [...]}}`; entries may be names or objects.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, Error> {
        let payload: ListPayload<RoomEntry> = self.get(&["api", "rooms"]).await?;
        debug!(shape = payload.shape(), "rooms payload");
        Ok(payload
            .into_items("rooms")?
            .into_iter()
            .map(Room::from)
            .collect())
    }

    /// Create a room.
    ///
    /// `POST api/rooms` with `{"room_name": ...}`
    pub async fn create_room(&self, name: &str) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        let name = non_empty("room_name", name)?;
        self.post(&["api", "rooms"], &json!({ "room_name": name }))
            .await
    }

    /// Rename a room.
    ///
    /// `PUT api/rooms/{id}` with `{"name": ...}`
    pub async fn update_room(
        &self,
        id: &str,
        name: &str,
    ) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        let name = non_empty("name", name)?;
        self.put(&["api", "rooms", id], &json!({ "name": name }))
            .await
    }

    /// Delete a room.
    ///
    /// `DELETE api/rooms/{id}`
    pub async fn delete_room(&self, id: &str) -> Result<ApiEnvelope<serde_json::Value>, Error> {
        self.delete(&["api", "rooms", id]).await
    }
}

fn non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            field: field.into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(trimmed)
}

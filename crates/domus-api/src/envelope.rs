// Response envelopes
//
// Most endpoints answer `{ "status": "success"|"error", "message": ..., "data": ... }`.
// Older list endpoints return a bare JSON array, and the server wraps
// lists either directly in `data` or under a named key inside `data`.
// The security endpoint has its own variations. The payload types here
// accept every observed shape and reduce them to one result.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::models::{SecurityState, SecurityStateResponse, ServerStatus};

const SUCCESS: &str = "success";

/// The standard `{ status, message, data }` wrapper.
///
/// `status == "success"` is the only success signal. A populated `data`
/// next to `status: "error"` is still a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }

    /// Branch on `status` first, then hand back the (possibly absent) payload.
    pub fn into_result(self) -> Result<Option<T>, Error> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::Api {
                message: self
                    .message
                    .unwrap_or_else(|| format!("status={}", self.status)),
            })
        }
    }

    /// Like [`into_result`](Self::into_result), discarding the payload.
    pub fn into_unit(self) -> Result<(), Error> {
        self.into_result().map(|_| ())
    }
}

/// Body of an enveloped list: the array itself, or an object such as
/// `{ "rooms": [...], "count": 3 }`. Keyed entries stay raw until the list
/// entry is picked, so non-list siblings never fail the decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Items(Vec<T>),
    Keyed(BTreeMap<String, serde_json::Value>),
}

/// Every shape a list endpoint has been seen to return.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// Bare JSON array, no envelope.
    Bare(Vec<T>),
    /// Standard envelope around the list.
    Enveloped(ApiEnvelope<ListBody<T>>),
}

impl<T> ListPayload<T> {
    /// Which wire shape this payload arrived in.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Bare(_) => "bare",
            Self::Enveloped(ApiEnvelope {
                data: Some(ListBody::Keyed(_)),
                ..
            }) => "enveloped-keyed",
            Self::Enveloped(_) => "enveloped",
        }
    }

}

impl<T: DeserializeOwned> ListPayload<T> {
    /// Reduce to the item list.
    ///
    /// `key` names the wrapper object field (e.g. `"rooms"`); a keyed body
    /// without that field yields its only array entry, or an empty list.
    pub fn into_items(self, key: &str) -> Result<Vec<T>, Error> {
        match self {
            Self::Bare(items) => Ok(items),
            Self::Enveloped(envelope) => match envelope.into_result()? {
                None => Ok(Vec::new()),
                Some(ListBody::Items(items)) => Ok(items),
                Some(ListBody::Keyed(mut map)) => {
                    let entry = map.remove(key).or_else(|| {
                        let mut lists = map.into_values().filter(serde_json::Value::is_array);
                        match (lists.next(), lists.next()) {
                            (Some(only), None) => Some(only),
                            _ => None,
                        }
                    });
                    entry.map_or_else(|| Ok(Vec::new()), decode_list)
                }
            },
        }
    }
}

fn decode_list<T: DeserializeOwned>(value: serde_json::Value) -> Result<Vec<T>, Error> {
    serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

/// The security endpoint's shapes:
/// - `{ "security_state": ... }`
/// - `{ "status": "success", "security_state": ... }`
/// - `{ "status": "success", "data": { "security_state": ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub security_state: Option<SecurityState>,
    #[serde(default)]
    pub data: Option<SecurityStateResponse>,
}

impl SecurityPayload {
    /// Reduce to the reported state. An explicit non-success status fails
    /// even when a state is present.
    pub fn into_state(self) -> Result<Option<SecurityState>, Error> {
        if let Some(status) = self.status.as_deref() {
            if status != SUCCESS {
                return Err(Error::Api {
                    message: self.message.unwrap_or_else(|| format!("status={status}")),
                });
            }
        }
        Ok(self
            .security_state
            .or_else(|| self.data.and_then(|d| d.security_state)))
    }
}

/// The status endpoint answers either in the standard envelope or flat:
/// `{ "status": "success", "server_status": "running", "version": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStatusPayload {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<ServerStatus>,
    #[serde(default)]
    pub server_status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl ServerStatusPayload {
    /// Reduce to the reported status, preferring `data` over top-level fields.
    pub fn into_status(self) -> Result<ServerStatus, Error> {
        if self.status != SUCCESS {
            return Err(Error::Api {
                message: self
                    .message
                    .unwrap_or_else(|| format!("status={}", self.status)),
            });
        }
        Ok(self.data.unwrap_or(ServerStatus {
            system_status: self.server_status,
            version: self.version,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn error_status_with_data_is_failure() {
        let env: ApiEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "status": "error",
            "message": "Brak dostępu",
            "data": { "rooms": ["Kitchen"] }
        }))
        .unwrap();

        assert!(env.data.is_some());
        assert!(!env.is_success());
        match env.into_result() {
            Err(Error::Api { message }) => assert_eq!(message, "Brak dostępu"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn success_without_data_is_ok_none() {
        let env: ApiEnvelope<serde_json::Value> =
            serde_json::from_value(json!({ "status": "success", "message": "Button 3 toggled" }))
                .unwrap();
        assert!(env.into_result().unwrap().is_none());
    }

    #[test]
    fn list_accepts_all_three_shapes() {
        let bare: ListPayload<String> = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(bare.shape(), "bare");
        assert_eq!(bare.into_items("rooms").unwrap(), vec!["a", "b"]);

        let flat: ListPayload<String> =
            serde_json::from_value(json!({ "status": "success", "data": ["a"] })).unwrap();
        assert_eq!(flat.shape(), "enveloped");
        assert_eq!(flat.into_items("rooms").unwrap(), vec!["a"]);

        let keyed: ListPayload<String> = serde_json::from_value(json!({
            "status": "success",
            "data": { "rooms": ["a", "b", "c"] }
        }))
        .unwrap();
        assert_eq!(keyed.shape(), "enveloped-keyed");
        assert_eq!(keyed.into_items("rooms").unwrap().len(), 3);
    }

    #[test]
    fn keyed_list_ignores_non_list_siblings() {
        let keyed: ListPayload<String> = serde_json::from_value(json!({
            "status": "success",
            "data": { "rooms": ["a", "b"], "count": 2 }
        }))
        .unwrap();
        assert_eq!(keyed.shape(), "enveloped-keyed");
        assert_eq!(keyed.into_items("rooms").unwrap(), vec!["a", "b"]);

        let renamed: ListPayload<String> = serde_json::from_value(json!({
            "status": "success",
            "data": { "items": ["x"], "total": 1 }
        }))
        .unwrap();
        assert_eq!(renamed.into_items("rooms").unwrap(), vec!["x"]);
    }

    #[test]
    fn keyed_list_with_bad_items_is_deserialization_error() {
        let keyed: ListPayload<String> = serde_json::from_value(json!({
            "status": "success",
            "data": { "rooms": [1, 2] }
        }))
        .unwrap();
        assert!(matches!(
            keyed.into_items("rooms"),
            Err(Error::Deserialization { .. })
        ));
    }

    #[test]
    fn enveloped_list_error_is_failure() {
        let payload: ListPayload<String> = serde_json::from_value(json!({
            "status": "error",
            "message": "Nie jesteś zalogowany"
        }))
        .unwrap();
        assert!(matches!(payload.into_items("rooms"), Err(Error::Api { .. })));
    }

    #[test]
    fn server_status_flat_and_enveloped() {
        let flat: ServerStatusPayload = serde_json::from_value(json!({
            "status": "success",
            "server_status": "running",
            "version": "2.1"
        }))
        .unwrap();
        let flat = flat.into_status().unwrap();
        assert_eq!(flat.system_status.as_deref(), Some("running"));
        assert_eq!(flat.version.as_deref(), Some("2.1"));

        let nested: ServerStatusPayload = serde_json::from_value(json!({
            "status": "success",
            "data": { "system_status": "degraded" }
        }))
        .unwrap();
        assert_eq!(
            nested.into_status().unwrap().system_status.as_deref(),
            Some("degraded")
        );

        let failed: ServerStatusPayload = serde_json::from_value(json!({
            "status": "error",
            "server_status": "running"
        }))
        .unwrap();
        assert!(failed.into_status().is_err());
    }

    #[test]
    fn security_shapes() {
        let top: SecurityPayload =
            serde_json::from_value(json!({ "status": "success", "security_state": "Załączony" }))
                .unwrap();
        assert_eq!(top.into_state().unwrap().unwrap().label(), "Załączony");

        let bare: SecurityPayload =
            serde_json::from_value(json!({ "security_state": "Wyłączony" })).unwrap();
        assert_eq!(bare.into_state().unwrap().unwrap().label(), "Wyłączony");

        let nested: SecurityPayload = serde_json::from_value(json!({
            "status": "success",
            "data": { "security_state": true }
        }))
        .unwrap();
        assert!(nested.into_state().unwrap().unwrap().is_armed());

        let failed: SecurityPayload = serde_json::from_value(json!({
            "status": "error",
            "message": "Brak dostępu do wybranego domu",
            "security_state": "Załączony"
        }))
        .unwrap();
        assert!(failed.into_state().is_err());
    }
}

// Wire models for the home-automation server
//
// Field names follow the server's JSON. Identifiers arrive as strings on
// newer servers and as integers on older ones; both decode to `String`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Colour assigned to rooms the server reports by name only.
pub const DEFAULT_ROOM_COLOR: &str = "#2196F3";

/// Security label the server uses for an armed system.
pub const SECURITY_ARMED: &str = "Załączony";
/// Security label the server uses for a disarmed system.
pub const SECURITY_DISARMED: &str = "Wyłączony";

// ── Identifier helper ────────────────────────────────────────────────

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

// ── Auth ─────────────────────────────────────────────────────────────

/// `POST api/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Authenticated user as reported by login and profile endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".into()
}

/// `data` of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<UserInfo>,
}

/// `data` of `GET api/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    #[serde(default, alias = "server_status")]
    pub system_status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default = "default_room_color")]
    pub color: String,
    #[serde(default)]
    pub position: i32,
}

fn default_room_color() -> String {
    DEFAULT_ROOM_COLOR.into()
}

impl Room {
    /// A room the server only knows by name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            color: default_room_color(),
            position: 0,
        }
    }
}

/// Rooms arrive either as plain names or as full objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RoomEntry {
    Name(String),
    Detailed(Room),
}

impl From<RoomEntry> for Room {
    fn from(entry: RoomEntry) -> Self {
        match entry {
            RoomEntry::Name(name) => Room::named(name),
            RoomEntry::Detailed(room) => room,
        }
    }
}

// ── Devices ──────────────────────────────────────────────────────────

/// A switchable device (the server calls these "buttons").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub state: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub position: i32,
}

/// Body for creating or updating a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// ── Thermostats ──────────────────────────────────────────────────────

/// A temperature control.
///
/// The server exposes a single `temperature` field; it serves as both the
/// current reading and the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermostatControl {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default = "default_true")]
    pub state: bool,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub position: i32,
}

fn default_true() -> bool {
    true
}

fn default_mode() -> String {
    "auto".into()
}

impl ThermostatControl {
    pub fn target_temperature(&self) -> f64 {
        self.temperature
    }
}

/// Body for creating or updating a thermostat.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThermostatDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// `POST api/temperature_controls/{id}/temperature` body.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct TemperatureSetRequest {
    pub temperature: f64,
}

// ── Security ─────────────────────────────────────────────────────────

/// Reported security state: a label on current servers, a boolean on old ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecurityState {
    Label(String),
    Flag(bool),
}

impl SecurityState {
    pub fn armed(armed: bool) -> Self {
        Self::Label(if armed { SECURITY_ARMED } else { SECURITY_DISARMED }.into())
    }

    pub fn is_armed(&self) -> bool {
        match self {
            Self::Label(l) => l == SECURITY_ARMED,
            Self::Flag(f) => *f,
        }
    }

    /// Label as the server would render it.
    pub fn label(&self) -> &str {
        match self {
            Self::Label(l) => l,
            Self::Flag(true) => SECURITY_ARMED,
            Self::Flag(false) => SECURITY_DISARMED,
        }
    }
}

impl fmt::Display for SecurityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `{ "security_state": ... }` object, nested under `data` on some servers.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityStateResponse {
    #[serde(default)]
    pub security_state: Option<SecurityState>,
}

/// `POST api/security` body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SecurityToggleRequest<'a> {
    pub state: &'a str,
}

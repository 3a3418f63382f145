// ── Dashboard snapshot ──
//
// Immutable view of everything the dashboard shows. Published as
// `Arc<DashboardSnapshot>`; each refresh or confirmed command produces a
// new one.

use chrono::{DateTime, Utc};
use serde::Serialize;

use domus_api::{Device, Room, ThermostatControl};

/// One independently fetched part of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Slice {
    Rooms,
    Devices,
    Thermostats,
    Security,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub rooms: Vec<Room>,
    pub devices: Vec<Device>,
    pub thermostats: Vec<ThermostatControl>,
    /// Label as reported by the server; empty until first fetched.
    pub security_state: String,
    /// When the last refresh cycle finished, if any has.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn thermostat(&self, id: &str) -> Option<&ThermostatControl> {
        self.thermostats.iter().find(|t| t.id == id)
    }

    /// Devices grouped under `room`, in server order.
    pub fn devices_in<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a Device> + 'a {
        self.devices
            .iter()
            .filter(move |d| d.room.as_deref() == Some(room))
    }

    pub fn is_armed(&self) -> bool {
        self.security_state == domus_api::models::SECURITY_ARMED
    }
}

// domus-core: dashboard state and home control on top of domus-api.

pub mod error;
pub mod home;
pub mod refresh;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use home::Home;
pub use refresh::{
    DashboardEvent, DashboardRefreshOrchestrator, RefreshOutcome, RefreshReport, RefreshState,
};
pub use snapshot::{DashboardSnapshot, Slice};

// Re-export model types consumers need alongside the facade.
pub use domus_api::{Device, DeviceDraft, Room, ThermostatControl, ThermostatDraft, UserInfo};

//! Async client for the Domus home-automation server.
//!
//! - **[`SessionGateway`]**: the single HTTP entry point. Owns the live
//!   `reqwest::Client` for the configured endpoint, injects the session cookie
//!   on every request and captures rotated session cookies from responses.
//! - **ApiSurface** ([`api`]): one typed async method per remote operation
//!   (auth, rooms, devices, thermostats, security), implemented as inherent
//!   methods on the gateway.
//! - **[`ApiEnvelope`]**: the `{ status, message, data }` wrapper, plus the
//!   discriminated payload unions for endpoints that answer in more than one
//!   shape.
//! - **[`CredentialStore`]**: the persistence seam the gateway reads the
//!   endpoint and session token through. `domus-config` provides the secure
//!   implementation; [`MemoryStore`] is an in-process one.

pub mod api;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod models;
pub mod session;
pub mod transport;

pub use endpoint::{DEFAULT_ENDPOINT, normalize};
pub use envelope::{ApiEnvelope, ListPayload, SecurityPayload, ServerStatusPayload};
pub use error::Error;
pub use gateway::SessionGateway;
pub use models::{
    Device, DeviceDraft, LoginRequest, LoginResponse, Room, SecurityState, ServerStatus,
    ThermostatControl, ThermostatDraft, UserInfo,
};
pub use session::{CredentialStore, MemoryStore, SESSION_COOKIE, StoreKey};
pub use transport::TransportConfig;

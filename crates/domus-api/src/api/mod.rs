// Typed remote operations
//
// One inherent method on `SessionGateway` per server capability, grouped
// by resource. Each returns the decoded envelope (or a shape-tolerant
// payload) so callers branch on `status` themselves.

pub mod auth;
pub mod devices;
pub mod rooms;
pub mod security;
pub mod thermostats;

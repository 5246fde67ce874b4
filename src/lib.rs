//! Edge relay library: a single-origin HTTP forwarding handler.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::RelayConfig;
pub use http::{Forwarder, RelayServer};
pub use lifecycle::Shutdown;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing)
//!     → forward.rs (guards, single outbound call)
//!         → request.rs (target URL, body buffering)
//!         → security::headers (outbound header rewrite)
//!         → reqwest client (manual redirects, identity encoding)
//!     → response.rs (relay or synthesized response)
//!     → error.rs (500 / 400 / 502 mapping)
//!     → Send to client
//! ```

pub mod error;
pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use error::ForwardError;
pub use forward::Forwarder;
pub use request::RequestId;
pub use server::RelayServer;

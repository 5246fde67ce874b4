//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (drop Host and hop-by-hop, add X-Forwarded-*)
//!     → Outbound request to the origin
//!
//! Origin response:
//!     → headers.rs (strip hop-by-hop)
//!     → Client
//! ```
//!
//! # Design Decisions
//! - No trust in client-chosen Host; the origin sees X-Forwarded-Host instead
//! - Only platform-provided client IP headers feed X-Forwarded-For

pub mod headers;

pub use headers::{prepare_outbound_headers, strip_hop_by_hop, HeaderPolicy};

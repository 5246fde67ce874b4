//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarding handler produces:
//!     → logging.rs (structured log events, one span per request)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID recorded on the span, never forwarded
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs apply_env (origin secret from the environment)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → origin.rs resolves the Target Origin once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the origin never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod origin;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use origin::Origin;
pub use schema::{
    ForwardingConfig, ListenerConfig, LogFormat, ObservabilityConfig, OriginConfig, RelayConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, env secret overrides)
//!     → validation.rs (semantic checks, all errors collected)
//!     → ProxyConfig (validated, immutable)
//!     → compiled into runtime values at server construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All sections have defaults so a minimal file parses, but validation
//!   requires the gate and service-token sections to be filled in
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets may come from the environment instead of the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ProxyConfig;
pub use schema::{
    GateConfig, ListenerConfig, ObservabilityConfig, ServiceTokenConfig, TimeoutConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};

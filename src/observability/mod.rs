//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, request ids attached)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every per-request log line
//! - Rejections log the failed rule name, never the expected value

pub mod logging;

pub use logging::init_logging;

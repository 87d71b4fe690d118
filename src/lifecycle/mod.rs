//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile policies → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C received → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then policies, then the listener
//! - A broadcast channel fans the shutdown signal out to every task

pub mod shutdown;

pub use shutdown::Shutdown;

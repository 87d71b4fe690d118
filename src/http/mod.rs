//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     ↓
//! server (gate check via security::GatePolicy)
//!     ↓ rejected → 403 Forbidden
//! rewrite (public endpoint stripped from the request URL)
//!     ↓
//! server (credential decision via security::ServiceCredentials)
//!     ↓
//! outbound client → backend
//!     ↓ failed → 502
//! response relayed verbatim
//! ```

pub mod rewrite;
pub mod server;

pub use rewrite::TargetRewriter;
pub use server::{AppState, HttpServer, ServerError};

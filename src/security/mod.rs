//! Request gating and credential policy subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request headers
//!     → gate.rs (required header pairs, then User-Agent; first failure → 403)
//!     → credentials.rs (session cookie? strip service token : inject it)
//!     → modified header map handed to the forwarder
//! ```
//!
//! # Design Decisions
//! - Fail closed: the default outcome is rejection, forwarding only happens
//!   on a full match
//! - Both policies are compiled once from validated config and shared
//!   read-only across requests

pub mod credentials;
pub mod gate;

pub use credentials::{has_session_cookie, ServiceCredentials};
pub use gate::{GatePolicy, Rejection};

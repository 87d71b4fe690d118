//! Header-gating reverse proxy library.
//!
//! Admits only requests that carry a configured set of secret headers and
//! the expected User-Agent, rewrites their target onto a private backend,
//! and attaches or strips service-token credentials before forwarding.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

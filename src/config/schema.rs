//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate
//! proxy. All types derive Serde traits for deserialization from the TOML
//! config file. Defaults exist for every section so a minimal file parses,
//! but the defaults alone do not pass validation: the gate header pairs and
//! the service token have no sensible built-in values.

use serde::{Deserialize, Serialize};

/// Root configuration for the gate proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Public and backend endpoint URLs.
    pub upstream: UpstreamConfig,

    /// Required-header and User-Agent gate.
    pub gate: GateConfig,

    /// Cloudflare Access service-token credentials.
    pub service_token: ServiceTokenConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Endpoint URLs for the proxy and the service it protects.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// The proxy's own public URL. Stripped as a literal prefix from
    /// incoming request URLs when computing the forwarded target.
    pub public_endpoint: String,

    /// URL of the protected backend service. The stripped remainder of the
    /// incoming URL is appended to this.
    pub backend_endpoint: String,
}

/// The request gate: shared-secret header pairs plus an exact User-Agent.
///
/// `header_names` and `header_values` are parallel lists evaluated pairwise
/// in order. Unequal lengths are a configuration error caught at startup,
/// never a per-request condition.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Required header names, matched case-insensitively.
    pub header_names: Vec<String>,

    /// Expected header values, matched case-sensitively. Same length as
    /// `header_names`.
    pub header_values: Vec<String>,

    /// Exact User-Agent value accepted requests must carry.
    pub user_agent: String,
}

/// Cloudflare Access service-token credentials injected toward the backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceTokenConfig {
    /// Service token client id (sent as `CF-Access-Client-Id`).
    pub client_id: String,

    /// Service token client secret (sent as `CF-Access-Client-Secret`).
    pub client_secret: String,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout toward the backend, in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. "info" or "gate_proxy=debug").
    /// `RUST_LOG` overrides this when set.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_parses_with_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.gate.header_names.is_empty());
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn full_file_parses() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [upstream]
            public_endpoint = "https://gate.example.com"
            backend_endpoint = "https://origin.example.com"

            [gate]
            header_names = ["X-Edge-Key", "X-Edge-Token"]
            header_values = ["alpha", "beta"]
            user_agent = "SyncAgent/2.4"

            [service_token]
            client_id = "abc.access"
            client_secret = "s3cret"

            [timeouts]
            connect_secs = 2
            request_secs = 10

            [observability]
            log_level = "gate_proxy=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.public_endpoint, "https://gate.example.com");
        assert_eq!(config.gate.header_names.len(), 2);
        assert_eq!(config.gate.header_values[1], "beta");
        assert_eq!(config.service_token.client_id, "abc.access");
        assert_eq!(config.timeouts.connect_secs, 2);
    }
}

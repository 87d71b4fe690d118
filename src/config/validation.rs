//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the gate header name/value lists line up pairwise
//! - Validate endpoint URLs, bind address, header syntax
//! - Reject empty secrets before the process starts serving
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig -> Result<(), Vec<ValidationError>>
//! - Runs at startup; a config that fails here never handles a request

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The listener bind address is not a parseable socket address.
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    InvalidBindAddress(String),

    /// An endpoint URL failed to parse or has a non-http(s) scheme.
    /// `key` names the offending config entry.
    #[error("{key} `{value}` is not a valid http(s) URL")]
    InvalidEndpoint { key: &'static str, value: String },

    /// The parallel gate lists have different lengths.
    #[error(
        "gate.header_names and gate.header_values must have the same length \
         (got {names} names, {values} values)"
    )]
    HeaderListMismatch { names: usize, values: usize },

    /// The gate must require at least one header pair.
    #[error("gate.header_names must contain at least one entry")]
    NoRequiredHeaders,

    /// A configured header name is not valid HTTP header syntax.
    #[error("gate.header_names[{index}] `{name}` is not a valid header name")]
    InvalidHeaderName { index: usize, name: String },

    /// A configured header value contains bytes not allowed in a header.
    #[error("gate.header_values[{index}] is not a valid header value")]
    InvalidHeaderValue { index: usize },

    /// The required User-Agent may not be empty.
    #[error("gate.user_agent must not be empty")]
    EmptyUserAgent,

    /// A service-token field is empty or not a valid header value.
    /// `key` names the offending config entry.
    #[error("{key} must be a non-empty header-safe string")]
    InvalidServiceToken { key: &'static str },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_endpoint(
        "upstream.public_endpoint",
        &config.upstream.public_endpoint,
        &mut errors,
    );
    check_endpoint(
        "upstream.backend_endpoint",
        &config.upstream.backend_endpoint,
        &mut errors,
    );

    let names = &config.gate.header_names;
    let values = &config.gate.header_values;
    if names.len() != values.len() {
        errors.push(ValidationError::HeaderListMismatch {
            names: names.len(),
            values: values.len(),
        });
    } else if names.is_empty() {
        errors.push(ValidationError::NoRequiredHeaders);
    } else {
        for (index, name) in names.iter().enumerate() {
            if name.parse::<HeaderName>().is_err() {
                errors.push(ValidationError::InvalidHeaderName {
                    index,
                    name: name.clone(),
                });
            }
        }
        for (index, value) in values.iter().enumerate() {
            if HeaderValue::from_str(value).is_err() {
                errors.push(ValidationError::InvalidHeaderValue { index });
            }
        }
    }

    if config.gate.user_agent.is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }

    check_token("service_token.client_id", &config.service_token.client_id, &mut errors);
    check_token(
        "service_token.client_secret",
        &config.service_token.client_secret,
        &mut errors,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(key: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidEndpoint {
            key,
            value: value.to_string(),
        }),
    }
}

fn check_token(key: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() || HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::InvalidServiceToken { key });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{GateConfig, ServiceTokenConfig, UpstreamConfig};

    fn valid_config() -> ProxyConfig {
        ProxyConfig {
            upstream: UpstreamConfig {
                public_endpoint: "https://gate.example.com".into(),
                backend_endpoint: "https://origin.example.com".into(),
            },
            gate: GateConfig {
                header_names: vec!["X-Edge-Key".into()],
                header_values: vec!["secret".into()],
                user_agent: "SyncAgent/2.4".into(),
            },
            service_token: ServiceTokenConfig {
                client_id: "abc.access".into(),
                client_secret: "s3cret".into(),
            },
            ..ProxyConfig::default()
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_mismatched_header_lists() {
        let mut config = valid_config();
        config.gate.header_names.push("X-Edge-Token".into());

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::HeaderListMismatch { names: 2, values: 1 })));
    }

    #[test]
    fn rejects_empty_header_lists() {
        let mut config = valid_config();
        config.gate.header_names.clear();
        config.gate.header_values.clear();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::NoRequiredHeaders)));
    }

    #[test]
    fn rejects_malformed_endpoints() {
        let mut config = valid_config();
        config.upstream.public_endpoint = "not a url".into();
        config.upstream.backend_endpoint = "ftp://origin.example.com".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::InvalidEndpoint { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn rejects_invalid_header_name() {
        let mut config = valid_config();
        config.gate.header_names[0] = "bad header\n".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidHeaderName { index: 0, .. })));
    }

    #[test]
    fn rejects_empty_user_agent_and_secrets() {
        let mut config = valid_config();
        config.gate.user_agent.clear();
        config.service_token.client_id.clear();
        config.service_token.client_secret.clear();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::EmptyUserAgent)));
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::InvalidServiceToken { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn collects_multiple_errors_in_one_pass() {
        let config = ProxyConfig::default();

        let errors = validate_config(&config).unwrap_err();
        // Empty endpoints, empty gate, empty user agent, empty token fields.
        assert!(errors.len() >= 5);
    }
}

//! Required-header and User-Agent gate.
//!
//! # Responsibilities
//! - Compile the configured header pairs into a reusable policy
//! - Evaluate incoming header maps against the policy
//! - Report why a request was turned away, without leaking secret values
//!
//! # Design Decisions
//! - Policy compiled at startup, immutable at runtime (no per-request parsing)
//! - Pairs evaluated in configured order; first failure short-circuits
//! - Header names match case-insensitively, values byte-for-byte
//! - Repeated occurrences of a header compare as one comma-joined value,
//!   so sending the right secret twice is still a mismatch
//! - The User-Agent check runs only after every header pair passed

use axum::http::{header, HeaderMap, HeaderName};
use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::ValidationError;

/// Why a request was rejected. Carries header names only; expected and
/// received values are shared secrets and never leave the policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    /// A required header was absent.
    #[error("missing required header `{0}`")]
    MissingHeader(HeaderName),

    /// A required header was present with the wrong value.
    #[error("mismatched value for required header `{0}`")]
    HeaderValueMismatch(HeaderName),

    /// No User-Agent header on the request.
    #[error("missing User-Agent header")]
    MissingUserAgent,

    /// User-Agent present but not the expected value.
    #[error("mismatched User-Agent value")]
    UserAgentMismatch,
}

/// One required (name, value) pair.
#[derive(Debug, Clone)]
struct HeaderRule {
    name: HeaderName,
    value: String,
}

/// The compiled request gate.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    rules: Vec<HeaderRule>,
    user_agent: String,
}

impl GatePolicy {
    /// Compile the gate from configuration.
    ///
    /// The same structural rules as `validate_config` apply; constructing a
    /// policy from an unvalidated config still cannot produce a policy that
    /// accepts everything.
    pub fn from_config(config: &GateConfig) -> Result<Self, ValidationError> {
        if config.header_names.len() != config.header_values.len() {
            return Err(ValidationError::HeaderListMismatch {
                names: config.header_names.len(),
                values: config.header_values.len(),
            });
        }
        if config.header_names.is_empty() {
            return Err(ValidationError::NoRequiredHeaders);
        }

        let mut rules = Vec::with_capacity(config.header_names.len());
        for (index, (name, value)) in config
            .header_names
            .iter()
            .zip(&config.header_values)
            .enumerate()
        {
            let name = name
                .parse::<HeaderName>()
                .map_err(|_| ValidationError::InvalidHeaderName {
                    index,
                    name: name.clone(),
                })?;
            rules.push(HeaderRule {
                name,
                value: value.clone(),
            });
        }

        Ok(Self {
            rules,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Evaluate a request's headers against the gate.
    ///
    /// Returns the first failure in configured order; later pairs are not
    /// inspected once one fails.
    pub fn evaluate(&self, headers: &HeaderMap) -> Result<(), Rejection> {
        for rule in &self.rules {
            match joined_value(headers, &rule.name) {
                None => return Err(Rejection::MissingHeader(rule.name.clone())),
                Some(value) if value != rule.value.as_bytes() => {
                    return Err(Rejection::HeaderValueMismatch(rule.name.clone()))
                }
                Some(_) => {}
            }
        }

        match joined_value(headers, &header::USER_AGENT) {
            None => Err(Rejection::MissingUserAgent),
            Some(value) if value != self.user_agent.as_bytes() => {
                Err(Rejection::UserAgentMismatch)
            }
            Some(_) => Ok(()),
        }
    }
}

/// A header's value for comparison purposes. Repeated occurrences collapse
/// into one comma-joined string, so a duplicated secret header can never
/// equal a single configured value.
fn joined_value(headers: &HeaderMap, name: &HeaderName) -> Option<Vec<u8>> {
    let mut values = headers.get_all(name).iter();
    let first = values.next()?;
    let mut joined = first.as_bytes().to_vec();
    for value in values {
        joined.extend_from_slice(b", ");
        joined.extend_from_slice(value.as_bytes());
    }
    Some(joined)
}

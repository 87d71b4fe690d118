//! Cloudflare Access service-token handling.
//!
//! # Responsibilities
//! - Centralize the Access header names and the session-cookie marker
//! - Decide per request whether to inject or strip the service token
//!
//! # Design Decisions
//! - An established `CF_Authorization` session makes the token redundant;
//!   injecting it anyway stacks authorization cookies downstream until the
//!   backend's own auth layer starts failing requests, so the token is
//!   actively removed instead
//! - Caller-supplied values for the token headers are never forwarded:
//!   they are either overwritten with our own or stripped
//! - Every `Cookie` header value is scanned, not just the first

use axum::http::{header, HeaderMap, HeaderValue};

use crate::config::schema::ServiceTokenConfig;
use crate::config::validation::ValidationError;

/// Header carrying the service-token client id.
pub const CLIENT_ID_HEADER: &str = "cf-access-client-id";

/// Header carrying the service-token client secret.
pub const CLIENT_SECRET_HEADER: &str = "cf-access-client-secret";

/// Cookie-key marker of an already-established Access session.
pub const SESSION_COOKIE_MARKER: &str = "CF_Authorization=";

/// The service token, pre-parsed into header values at startup.
/// Both fields are marked sensitive, so Debug renders them opaque.
#[derive(Debug, Clone)]
pub struct ServiceCredentials {
    client_id: HeaderValue,
    client_secret: HeaderValue,
}

impl ServiceCredentials {
    /// Build the credential pair from configuration.
    pub fn from_config(config: &ServiceTokenConfig) -> Result<Self, ValidationError> {
        let client_id = parse_token("service_token.client_id", &config.client_id)?;
        let client_secret = parse_token("service_token.client_secret", &config.client_secret)?;
        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Apply the credential decision to an outgoing header map.
    ///
    /// With a session cookie present the token headers are removed, caller
    /// supplied or not; without one they are set to our configured values,
    /// replacing anything the caller sent.
    pub fn apply(&self, headers: &mut HeaderMap) {
        if has_session_cookie(headers) {
            headers.remove(CLIENT_ID_HEADER);
            headers.remove(CLIENT_SECRET_HEADER);
        } else {
            headers.insert(CLIENT_ID_HEADER, self.client_id.clone());
            headers.insert(CLIENT_SECRET_HEADER, self.client_secret.clone());
        }
    }
}

/// True when any `Cookie` header value contains the session marker.
pub fn has_session_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains(SESSION_COOKIE_MARKER))
}

fn parse_token(key: &'static str, value: &str) -> Result<HeaderValue, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::InvalidServiceToken { key });
    }
    let mut parsed = HeaderValue::from_str(value)
        .map_err(|_| ValidationError::InvalidServiceToken { key })?;
    // Sensitive: never debug-printed, never indexed by HTTP/2 header tables.
    parsed.set_sensitive(true);
    Ok(parsed)
}

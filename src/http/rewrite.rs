//! Forwarded-target computation.
//!
//! # Responsibilities
//! - Reconstruct the absolute URL the caller addressed
//! - Turn it into the backend target by stripping the public endpoint
//!
//! # Design Decisions
//! - The strip is a literal string replacement of the first occurrence,
//!   not URL parsing; the proxy is only ever addressed via its public
//!   endpoint, so a non-matching URL is forwarded as
//!   `backend_endpoint + full_url` rather than defended against
//! - The public endpoint's scheme is what the caller used at the edge;
//!   the listener itself may sit behind a TLS-terminating hop

use axum::http::Uri;
use url::Url;

use crate::config::schema::UpstreamConfig;
use crate::config::validation::ValidationError;

/// Computes the backend target for each accepted request.
#[derive(Debug, Clone)]
pub struct TargetRewriter {
    public_endpoint: String,
    backend_endpoint: String,
    public_scheme: String,
}

impl TargetRewriter {
    /// Build the rewriter from configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ValidationError> {
        let public = Url::parse(&config.public_endpoint).map_err(|_| {
            ValidationError::InvalidEndpoint {
                key: "upstream.public_endpoint",
                value: config.public_endpoint.clone(),
            }
        })?;
        Url::parse(&config.backend_endpoint).map_err(|_| ValidationError::InvalidEndpoint {
            key: "upstream.backend_endpoint",
            value: config.backend_endpoint.clone(),
        })?;

        Ok(Self {
            public_endpoint: config.public_endpoint.clone(),
            backend_endpoint: config.backend_endpoint.clone(),
            public_scheme: public.scheme().to_string(),
        })
    }

    /// The forwarded target URL for a request.
    ///
    /// `host` is the request's Host header, used to rebuild the absolute
    /// URL when the request line carries only a path.
    pub fn target_for(&self, uri: &Uri, host: Option<&str>) -> String {
        let incoming = self.incoming_url(uri, host);
        let suffix = incoming.replacen(&self.public_endpoint, "", 1);
        format!("{}{}", self.backend_endpoint, suffix)
    }

    /// The absolute URL the caller addressed, as seen at the edge.
    fn incoming_url(&self, uri: &Uri, host: Option<&str>) -> String {
        if uri.scheme().is_some() && uri.authority().is_some() {
            return uri.to_string();
        }
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("");
        format!(
            "{}://{}{}",
            self.public_scheme,
            host.unwrap_or(""),
            path_and_query
        )
    }
}

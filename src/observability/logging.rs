//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Configure the log level from config, with RUST_LOG override
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - A bare configured level covers this crate and tower-http; a value with
//!   explicit directives is used as the filter unchanged
//! - Secret header values are never logged; handlers log names and ids only

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::schema::ObservabilityConfig;

/// Install the global tracing subscriber.
///
/// When `RUST_LOG` is set it wins outright; otherwise the configured
/// level applies to this crate and to tower-http.
pub fn init_logging(config: &ObservabilityConfig) {
    let default_filter = filter_directives(&config.log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Translate the configured level into an `EnvFilter` directive string.
///
/// A bare level like `"info"` fans out to this crate and tower-http. A
/// value that already contains directives, like `"gate_proxy=debug"`,
/// would turn into nonsense if interpolated, so it passes through as is.
fn filter_directives(log_level: &str) -> String {
    if log_level.contains('=') || log_level.contains(',') {
        log_level.to_string()
    } else {
        format!("gate_proxy={log_level},tower_http={log_level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_fans_out_to_crate_and_tower_http() {
        assert_eq!(filter_directives("info"), "gate_proxy=info,tower_http=info");
        assert_eq!(
            filter_directives("debug"),
            "gate_proxy=debug,tower_http=debug"
        );
    }

    #[test]
    fn explicit_directives_pass_through_unchanged() {
        assert_eq!(filter_directives("gate_proxy=debug"), "gate_proxy=debug");
        assert_eq!(
            filter_directives("info,hyper_util=warn"),
            "info,hyper_util=warn"
        );
    }
}

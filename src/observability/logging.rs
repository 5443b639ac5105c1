//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries
//! - Resolve the log filter from the environment, falling back to config
//!
//! # Design Decisions
//! - `RUST_LOG` wins over `[observability].log_level` so operators can turn
//!   on debug output without editing config
//! - Logs go to stderr; stdout carries command output

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("vm_reconciler={}", config.log_level.to_ascii_lowercase())
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    // An embedding process or test harness may own the global subscriber.
    if let Err(e) = installed {
        tracing::debug!(error = %e, "Global subscriber already set, keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_uses_configured_level() {
        let config = ObservabilityConfig {
            log_level: "DEBUG".to_string(),
            ..ObservabilityConfig::default()
        };
        assert_eq!(default_directive(&config), "vm_reconciler=debug");
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let config = ObservabilityConfig::default();
        init_logging(&config);
        init_logging(&config);
        tracing::info!("still logging after a second init");
    }
}

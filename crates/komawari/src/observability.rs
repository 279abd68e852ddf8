//! Logging setup for the command-line tool.

use std::env;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log level filter used when `RUST_LOG` is unset (e.g., "info", "debug")
    pub log_level: String,
    /// Apply `log_level` even when `RUST_LOG` is set
    pub override_env: bool,
    /// Enable JSON-formatted logs
    pub json_logs: bool,
}

impl ObservabilityConfig {
    /// Configuration honoring `RUST_LOG`, defaulting to `info`.
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            override_env: false,
            json_logs: false,
        }
    }

    /// Set the log level used when `RUST_LOG` is unset.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Log at `debug` regardless of `RUST_LOG`.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.log_level = "debug".to_string();
            self.override_env = true;
        }
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    /// Filter directive to install given the value of `RUST_LOG`.
    pub fn filter_directive(&self, rust_log: Option<&str>) -> String {
        match rust_log.map(str::trim) {
            Some(directive) if !self.override_env && !directive.is_empty() => {
                directive.to_string()
            }
            _ => self.log_level.clone(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
pub fn init_observability(config: &ObservabilityConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rust_log = env::var("RUST_LOG").ok();
    let env_filter = EnvFilter::try_new(config.filter_directive(rust_log.as_deref()))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

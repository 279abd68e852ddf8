//! Metrics for oracle calls.
//!
//! OpenTelemetry instruments for request counts, failures by class, and
//! call latency. Without an installed exporter they record nothing.

use komawari_error::OracleErrorKind;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;

static METRICS: OnceLock<OracleMetrics> = OnceLock::new();

/// Metrics for oracle interactions, labeled by provider and model.
#[derive(Clone)]
pub struct OracleMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Successful oracle calls
    pub requests: Counter<u64>,
    /// Failed oracle calls
    pub errors: Counter<u64>,
    /// Oracle call duration in seconds, retries included, for successes
    /// and failures alike
    pub duration: Histogram<f64>,
}

impl OracleMetrics {
    fn init() -> Self {
        let meter = global::meter("komawari_oracle");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("oracle.requests")
                .with_description("Successful oracle calls")
                .build(),
            errors: meter
                .u64_counter("oracle.errors")
                .with_description("Failed oracle calls")
                .build(),
            duration: meter
                .f64_histogram("oracle.duration")
                .with_unit("seconds")
                .with_description("Oracle call duration")
                .build(),
        }
    }

    /// Get the global oracle metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a successful call.
    pub fn record_request(&self, provider: &str, model: &str, duration_secs: f64) {
        let labels = call_labels(provider, model, None);
        self.requests.add(1, &labels);
        self.duration.record(duration_secs, &labels);
    }

    /// Record a failed call and the time spent before giving up.
    pub fn record_error(
        &self,
        provider: &str,
        model: &str,
        error_type: &str,
        duration_secs: f64,
    ) {
        let labels = call_labels(provider, model, Some(error_type));
        self.errors.add(1, &labels);
        self.duration.record(duration_secs, &labels);
    }
}

/// Labels shared by the counters and the duration histogram.
fn call_labels(provider: &str, model: &str, error_type: Option<&str>) -> Vec<KeyValue> {
    let mut labels = vec![
        KeyValue::new("provider", provider.to_string()),
        KeyValue::new("model", model.to_string()),
    ];
    if let Some(error_type) = error_type {
        labels.push(KeyValue::new("error_type", error_type.to_string()));
    }
    labels
}

/// Classify an oracle failure for metrics labeling.
///
/// Returns one of: "auth", "rate_limit", "server", "http", "network",
/// "timeout", "empty", "malformed", "client".
pub fn classify_error(kind: &OracleErrorKind) -> &'static str {
    match kind {
        OracleErrorKind::MissingApiKey(_) | OracleErrorKind::Unauthorized { .. } => "auth",
        OracleErrorKind::HttpStatus { status_code, .. } => match status_code {
            429 => "rate_limit",
            500..=599 => "server",
            _ => "http",
        },
        OracleErrorKind::Transport(_) => "network",
        OracleErrorKind::Timeout(_) => "timeout",
        OracleErrorKind::EmptyResponse => "empty",
        OracleErrorKind::MalformedResponse(_) => "malformed",
        OracleErrorKind::ClientCreation(_) => "client",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_call_durations_carry_error_type() {
        let labels = call_labels("openai", "gpt-4o-mini", Some("timeout"));
        let keys: Vec<_> = labels.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, ["provider", "model", "error_type"]);
        assert_eq!(labels[2].value.as_str(), "timeout");
    }

    #[test]
    fn test_successful_call_labels_have_no_error_type() {
        let labels = call_labels("openai", "gpt-4o-mini", None);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_record_error_without_exporter() {
        let metrics = OracleMetrics::get();
        metrics.record_error("openai", "gpt-4o-mini", "timeout", 1.5);
        metrics.record_request("openai", "gpt-4o-mini", 0.25);
    }
}

//! OpenAI-compatible chat completions client.

use crate::{ChatCompletionRequest, ChatCompletionResponse, OracleMetrics, classify_error};
use async_trait::async_trait;
use komawari_config::OracleConfig;
use komawari_core::{OracleRequest, OracleResponse};
use komawari_error::{KomawariResult, OracleError, OracleErrorKind};
use komawari_interface::Oracle;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, info, instrument, warn};

const PROVIDER: &str = "openai";

/// Map a non-success HTTP status to an error kind.
///
/// 401 and 403 mean the credentials were rejected, which no retry or later
/// call can fix.
///
/// # Examples
///
/// ```
/// use komawari_oracle::classify_status;
///
/// assert!(classify_status(401, "bad key".into()).is_fatal());
/// assert!(classify_status(503, "overloaded".into()).is_retryable());
/// assert!(!classify_status(400, "bad request".into()).is_retryable());
/// ```
pub fn classify_status(status_code: u16, message: String) -> OracleErrorKind {
    match status_code {
        401 | 403 => OracleErrorKind::Unauthorized {
            status_code,
            message,
        },
        _ => OracleErrorKind::HttpStatus {
            status_code,
            message,
        },
    }
}

/// Labeling oracle backed by a chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsOracle {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    timeout_secs: u64,
    max_retries: usize,
    temperature: Option<f32>,
}

impl ChatCompletionsOracle {
    /// Create an oracle with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns `OracleErrorKind::ClientCreation` if the HTTP client cannot be built.
    #[instrument(skip(api_key), fields(model = %model))]
    pub fn new(
        api_key: String,
        model: String,
        base_url: &str,
        timeout_secs: u64,
        max_retries: usize,
    ) -> KomawariResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| OracleError::new(OracleErrorKind::ClientCreation(e.to_string())))?;

        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        debug!(endpoint = %endpoint, timeout_secs, max_retries, "Created chat completions oracle");

        Ok(Self {
            client,
            api_key,
            model,
            endpoint,
            timeout_secs,
            max_retries,
            temperature: None,
        })
    }

    /// Create an oracle from configuration, reading the API key from the
    /// configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns `OracleErrorKind::MissingApiKey` if the variable is not set.
    pub fn from_config(config: &OracleConfig) -> KomawariResult<Self> {
        let api_key = config.api_key()?;
        let mut oracle = Self::new(
            api_key,
            config.model().clone(),
            config.base_url(),
            *config.timeout_secs(),
            *config.max_retries(),
        )?;
        oracle.temperature = *config.temperature();
        Ok(oracle)
    }

    /// Set the default sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, body: &ChatCompletionRequest) -> Result<String, OracleError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::new(classify_status(status.as_u16(), message)));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::new(OracleErrorKind::Timeout(self.timeout_secs))
            } else {
                OracleError::new(OracleErrorKind::MalformedResponse(e.to_string()))
            }
        })?;

        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| OracleError::new(OracleErrorKind::EmptyResponse))
    }

    fn transport_error(&self, error: reqwest::Error) -> OracleError {
        if error.is_timeout() {
            OracleError::new(OracleErrorKind::Timeout(self.timeout_secs))
        } else {
            OracleError::new(OracleErrorKind::Transport(error.to_string()))
        }
    }

    /// Send once; on a retryable failure, retry with a backoff picked for
    /// that failure, capped at the configured retry count.
    async fn send_with_retry(&self, body: &ChatCompletionRequest) -> Result<String, OracleError> {
        let first = match self.send_once(body).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };

        if !first.kind.is_retryable() || self.max_retries == 0 {
            return Err(first);
        }

        let (initial_ms, retries, max_delay_secs) = first.kind.retry_strategy_params();
        let retries = retries.min(self.max_retries);
        info!(
            error = %first,
            initial_backoff_ms = initial_ms,
            max_retries = retries,
            max_delay_secs,
            "Oracle call failed, will retry"
        );

        let strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(retries);

        Retry::spawn(strategy, || async {
            match self.send_once(body).await {
                Ok(text) => Ok(text),
                Err(e) if e.kind.is_retryable() => {
                    warn!(error = %e, "Oracle call failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent oracle error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }
}

#[async_trait]
impl Oracle for ChatCompletionsOracle {
    #[instrument(
        skip(self, req),
        fields(provider = PROVIDER, model = %self.model, messages = req.messages().len())
    )]
    async fn complete(&self, req: &OracleRequest) -> KomawariResult<OracleResponse> {
        let body = ChatCompletionRequest::from_oracle_request(req, &self.model, self.temperature);
        let started = Instant::now();
        let result = self.send_with_retry(&body).await;

        let metrics = OracleMetrics::get();
        let elapsed = started.elapsed().as_secs_f64();
        match &result {
            Ok(text) => {
                debug!(chars = text.chars().count(), elapsed, "Oracle responded");
                metrics.record_request(PROVIDER, &self.model, elapsed);
            }
            Err(e) => {
                warn!(error = %e, elapsed, "Oracle call failed");
                metrics.record_error(PROVIDER, &self.model, classify_error(&e.kind), elapsed);
            }
        }

        Ok(OracleResponse::new(result?))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

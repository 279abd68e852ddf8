//! Oracle connection settings.

use komawari_error::{KomawariResult, OracleError, OracleErrorKind};
use serde::{Deserialize, Serialize};

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct OracleConfig {
    /// API base URL, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Model identifier
    #[serde(default = "default_model")]
    model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    /// Retries for transient failures
    #[serde(default = "default_max_retries")]
    max_retries: usize,
    /// Sampling temperature; provider default when unset
    #[serde(default)]
    temperature: Option<f32>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> usize {
    2
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            temperature: None,
        }
    }
}

impl OracleConfig {
    /// Replace the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Read the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// `OracleErrorKind::MissingApiKey` when the variable is unset or empty.
    pub fn api_key(&self) -> KomawariResult<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(OracleError::new(OracleErrorKind::MissingApiKey(
                self.api_key_env.clone(),
            ))
            .into()),
        }
    }
}

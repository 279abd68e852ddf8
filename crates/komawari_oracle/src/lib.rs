//! HTTP labeling oracle for Komawari.
//!
//! [`ChatCompletionsOracle`] talks to any OpenAI-compatible
//! `/chat/completions` endpoint. Transient failures (timeouts, 429, 5xx) are
//! retried with exponential backoff; credential rejections are reported as
//! `OracleErrorKind::Unauthorized` so the pipeline can abort.
//!
//! ```no_run
//! use komawari_config::OracleConfig;
//! use komawari_core::{Message, OracleRequest};
//! use komawari_interface::Oracle;
//! use komawari_oracle::ChatCompletionsOracle;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = ChatCompletionsOracle::from_config(&OracleConfig::default())?;
//! let request = OracleRequest::new(vec![Message::user("汽車が来た。")]);
//! let response = oracle.complete(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod dto;
mod metrics;

pub use client::{ChatCompletionsOracle, classify_status};
pub use dto::{
    ChatChoice, ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse,
    ChatMessage, ChatResponseMessage,
};
pub use metrics::{OracleMetrics, classify_error};

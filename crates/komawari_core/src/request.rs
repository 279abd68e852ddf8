//! Oracle request and response types.

use crate::Message;
use serde::{Deserialize, Serialize};

/// A single oracle call: an ordered list of messages.
///
/// # Examples
///
/// ```
/// use komawari_core::{Message, OracleRequest};
///
/// let request = OracleRequest::new(vec![
///     Message::system("Split the text into cuts."),
///     Message::user("汽車が来た。"),
/// ])
/// .with_temperature(0.2);
/// assert_eq!(request.messages().len(), 2);
/// assert_eq!(*request.temperature(), Some(0.2));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_getters::Getters)]
pub struct OracleRequest {
    /// Messages in order
    messages: Vec<Message>,
    /// Sampling temperature, if the caller wants to pin one
    temperature: Option<f32>,
}

impl OracleRequest {
    /// Create a request from messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            temperature: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the sampling temperature if one is given.
    pub fn with_optional_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Free-form text returned by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_getters::Getters)]
pub struct OracleResponse {
    /// Response text
    text: String,
}

impl OracleResponse {
    /// Wrap response text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Consume the response, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

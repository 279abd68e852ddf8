//! Mock oracle for testing.

use async_trait::async_trait;
use komawari_core::{OracleRequest, OracleResponse};
use komawari_error::{KomawariResult, OracleError, OracleErrorKind};
use komawari_interface::Oracle;
use std::sync::{Arc, Mutex};

/// Behavior configuration for mock responses.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockBehavior {
    /// Always answer with the given text
    Success(String),
    /// Always fail with the given error
    Error(OracleErrorKind),
    /// Answer from a sequence, one entry per call
    Sequence(Vec<MockResponse>),
}

/// A single mock response (success or error).
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockResponse {
    Success(String),
    Error(OracleErrorKind),
}

/// Scripted oracle that records every request it receives.
#[derive(Clone)]
pub struct MockOracle {
    behavior: MockBehavior,
    call_count: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<OracleRequest>>>,
}

#[allow(dead_code)]
impl MockOracle {
    /// Oracle that always answers with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Success(text.into()))
    }

    /// Oracle that always fails with `error`.
    pub fn new_error(error: OracleErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Error(error))
    }

    /// Oracle that answers from `responses` in order.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    /// Oracle with custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times `complete` was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> KomawariResult<OracleResponse> {
        let mut count = self.call_count.lock().unwrap();
        let current = *count;
        *count += 1;

        let response = match &self.behavior {
            MockBehavior::Success(text) => MockResponse::Success(text.clone()),
            MockBehavior::Error(kind) => MockResponse::Error(kind.clone()),
            MockBehavior::Sequence(responses) => match responses.get(current) {
                Some(response) => response.clone(),
                None => MockResponse::Error(OracleErrorKind::Transport(format!(
                    "Mock sequence exhausted (call {} beyond {} responses)",
                    current + 1,
                    responses.len()
                ))),
            },
        };

        match response {
            MockResponse::Success(text) => Ok(OracleResponse::new(text)),
            MockResponse::Error(kind) => Err(OracleError::new(kind).into()),
        }
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn complete(&self, req: &OracleRequest) -> KomawariResult<OracleResponse> {
        self.requests.lock().unwrap().push(req.clone());
        self.next_response()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-oracle"
    }
}

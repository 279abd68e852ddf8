//! Oracle call error types and retry classification.

/// Oracle-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OracleErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Failed to create the HTTP client
    #[display("Failed to create oracle client: {}", _0)]
    ClientCreation(String),
    /// The oracle rejected our credentials (401/403)
    #[display("Oracle rejected credentials (HTTP {}): {}", status_code, message)]
    Unauthorized {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Non-success HTTP status other than an authorization failure
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Network-level failure before a response arrived
    #[display("Oracle transport failed: {}", _0)]
    Transport(String),
    /// Request exceeded the configured timeout
    #[display("Oracle call timed out after {}s", _0)]
    Timeout(u64),
    /// Oracle answered without any text content
    #[display("Oracle returned an empty response")]
    EmptyResponse,
    /// Response body did not match the expected envelope
    #[display("Malformed oracle response: {}", _0)]
    MalformedResponse(String),
}

impl OracleErrorKind {
    /// Whether this failure will recur on every subsequent call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OracleErrorKind::Unauthorized { .. } | OracleErrorKind::MissingApiKey(_)
        )
    }

    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            OracleErrorKind::HttpStatus { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            OracleErrorKind::Transport(_) => true,
            OracleErrorKind::Timeout(_) => true,
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            OracleErrorKind::HttpStatus { status_code, .. } => match *status_code {
                429 => (5000, 3, 40),
                503 => (2000, 5, 60),
                500 | 502 | 504 => (1000, 3, 8),
                408 => (2000, 4, 30),
                _ => (2000, 5, 60),
            },
            OracleErrorKind::Transport(_) => (1000, 3, 10),
            OracleErrorKind::Timeout(_) => (2000, 2, 30),
            _ => (2000, 5, 60),
        }
    }
}

/// Oracle error with source location tracking.
///
/// # Examples
///
/// ```
/// use komawari_error::{OracleError, OracleErrorKind};
///
/// let err = OracleError::new(OracleErrorKind::MissingApiKey("OPENAI_API_KEY".to_string()));
/// assert!(format!("{}", err).contains("OPENAI_API_KEY"));
/// assert!(err.kind.is_fatal());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Oracle Error: {} at line {} in {}", kind, line, file)]
pub struct OracleError {
    /// The kind of error that occurred
    pub kind: OracleErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl OracleError {
    /// Create a new OracleError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OracleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use komawari_error::{OracleError, OracleErrorKind, RetryableError};
///
/// let err = OracleError::new(OracleErrorKind::HttpStatus {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, retries, _max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(retries, 5);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503, 429, or network timeouts return true.
    /// Permanent errors like 401 or 400 return false.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 5, 60)
    }
}

impl RetryableError for OracleError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}

//! Top-level error wrapper types.

use crate::{ConfigError, InputError, JsonError, OracleError, PipelineError, PipelineErrorKind};

/// Union of every error domain in the workspace.
///
/// # Examples
///
/// ```
/// use komawari_error::{JsonError, KomawariError};
///
/// let json_err = JsonError::new("expected value at line 1 column 1");
/// let err: KomawariError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum KomawariErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Source input error
    #[from(InputError)]
    Input(InputError),
    /// Oracle call error
    #[from(OracleError)]
    Oracle(OracleError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Komawari error with kind discrimination.
///
/// # Examples
///
/// ```
/// use komawari_error::{KomawariResult, ConfigError};
///
/// fn might_fail() -> KomawariResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Komawari Error: {}", _0)]
pub struct KomawariError(Box<KomawariErrorKind>);

impl KomawariError {
    /// Create a new error from a kind.
    pub fn new(kind: KomawariErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &KomawariErrorKind {
        &self.0
    }

    /// Whether this is an oracle authorization failure that no retry or
    /// later window can recover from, or a run aborted because of one.
    ///
    /// # Examples
    ///
    /// ```
    /// use komawari_error::{KomawariError, OracleError, OracleErrorKind};
    ///
    /// let err: KomawariError = OracleError::new(OracleErrorKind::Unauthorized {
    ///     status_code: 401,
    ///     message: "invalid api key".to_string(),
    /// })
    /// .into();
    /// assert!(err.is_fatal());
    ///
    /// let err: KomawariError = OracleError::new(OracleErrorKind::Timeout(120)).into();
    /// assert!(!err.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        match self.kind() {
            KomawariErrorKind::Oracle(e) => e.kind.is_fatal(),
            KomawariErrorKind::Pipeline(e) => matches!(e.kind, PipelineErrorKind::Aborted { .. }),
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to KomawariErrorKind
impl<T> From<T> for KomawariError
where
    T: Into<KomawariErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Komawari operations.
pub type KomawariResult<T> = std::result::Result<T, KomawariError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputErrorKind, OracleErrorKind};

    #[test]
    fn test_transport_failures_are_oracle_errors() {
        let err: KomawariError =
            OracleError::new(OracleErrorKind::Transport("connection refused".into())).into();
        assert!(matches!(err.kind(), KomawariErrorKind::Oracle(_)));
        assert!(err.to_string().contains("connection refused"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_every_domain_converts() {
        let errors: Vec<KomawariError> = vec![
            JsonError::new("bad json").into(),
            ConfigError::new("bad config").into(),
            InputError::new(InputErrorKind::FileRead("a.txt".into())).into(),
            PipelineError::new(PipelineErrorKind::InvalidTargetLength).into(),
        ];
        assert!(errors.iter().all(|e| !e.is_fatal()));
        assert!(matches!(errors[2].kind(), KomawariErrorKind::Input(_)));
    }
}

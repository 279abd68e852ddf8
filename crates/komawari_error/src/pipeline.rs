//! Pipeline error types.

/// Specific error conditions for the cut pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Window size and overlap violate `0 < overlap < size`
    #[display("Invalid windowing: size={} overlap={} (require 0 < overlap < size)", size, overlap)]
    InvalidWindowing {
        /// Requested window size
        size: usize,
        /// Requested overlap
        overlap: usize,
    },
    /// Target cut length must be positive
    #[display("Target cut length must be positive")]
    InvalidTargetLength,
    /// Run aborted because the oracle rejected our credentials
    #[display("Run aborted at window {} of {}: {}", window, total, reason)]
    Aborted {
        /// 1-based index of the window being processed
        window: usize,
        /// Total number of windows
        total: usize,
        /// Underlying oracle message
        reason: String,
    },
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use komawari_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::InvalidWindowing { size: 100, overlap: 100 });
/// assert!(format!("{}", err).contains("overlap=100"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Source input error types.

/// Kinds of failures while reading source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum InputErrorKind {
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Bytes could not be decoded with any supported encoding
    #[display("Unsupported text encoding: {}", _0)]
    Undecodable(String),
}

/// Input error with location tracking.
///
/// # Examples
///
/// ```
/// use komawari_error::{InputError, InputErrorKind};
///
/// let err = InputError::new(InputErrorKind::FileRead("novel.txt".to_string()));
/// assert!(format!("{}", err).contains("novel.txt"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Input Error: {} at line {} in {}", kind, line, file)]
pub struct InputError {
    /// The kind of error that occurred
    pub kind: InputErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl InputError {
    /// Create a new input error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: InputErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Error types for the Komawari library.
//!
//! This crate provides the foundation error types used throughout the Komawari workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use komawari_error::{KomawariResult, InputError, InputErrorKind};
//!
//! fn read_novel() -> KomawariResult<String> {
//!     Err(InputError::new(InputErrorKind::FileRead("novel.txt".to_string())))?
//! }
//!
//! match read_novel() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod input;
mod json;
mod oracle;
mod pipeline;

pub use config::ConfigError;
pub use error::{KomawariError, KomawariErrorKind, KomawariResult};
pub use input::{InputError, InputErrorKind};
pub use json::JsonError;
pub use oracle::{OracleError, OracleErrorKind, RetryableError};
pub use pipeline::{PipelineError, PipelineErrorKind};

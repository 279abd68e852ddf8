//! Trait definitions for the Komawari narrative cut pipeline.
//!
//! The pipeline talks to the outside world through two seams: an [`Oracle`]
//! that labels text, and an optional [`ProgressSink`] told about every
//! finished window.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{Oracle, ProgressSink};

//! Core data types for the Komawari narrative cut pipeline.
//!
//! This crate provides the foundation data types shared by every Komawari crate:
//! the source text and its character-offset coordinate system, windows, cuts and
//! their labels, the raw records an oracle returns, and the character graph.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cut;
mod graph;
mod label;
mod lengths;
mod message;
mod progress;
mod request;
mod role;
mod source;
mod span;

pub use cut::{Cut, CutId, CutKind, CutLabels, TimeTag, content_checksum};
pub use graph::{
    CharacterExtraction, CharacterGraph, CharacterMention, CharacterNode,
    DEFAULT_RELATIONSHIP_LABEL, RelationshipEdge, RelationshipMention,
};
pub use label::OracleLabel;
pub use lengths::{CutLengths, SegmentationConfig};
pub use message::Message;
pub use progress::{FallbackReason, WindowOutcome, WindowProgress};
pub use request::{OracleRequest, OracleResponse};
pub use role::Role;
pub use source::{SourceText, normalize_line_endings};
pub use span::{Span, Window};

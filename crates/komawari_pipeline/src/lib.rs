//! Windowing, oracle labeling and fallback segmentation for narrative text.
//!
//! The main entry point is [`CutAssembler`], which splits a [`SourceText`]
//! into overlapping windows, asks an [`Oracle`] to cut and label each one,
//! reconciles the reported offsets, and falls back to a deterministic
//! splitter whenever a window's answer is unusable. [`GraphExtractor`]
//! runs a second loop that reduces per-window character extractions into a
//! relationship graph.
//!
//! The building blocks are exposed for independent use and testing.
//!
//! [`SourceText`]: komawari_core::SourceText
//! [`Oracle`]: komawari_interface::Oracle

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod brief;
mod extraction;
mod fallback;
mod graph;
mod prompt;
mod reconcile;
mod reducer;
mod roster;
mod sheet;
mod variants;
mod windowing;

pub use assembler::{CutAssembler, WindowLabeling, assemble_offline};
pub use brief::{CharacterBrief, character_brief};
pub use extraction::{parse_array, parse_object};
pub use fallback::{FallbackSegment, fallback_split};
pub use graph::GraphExtractor;
pub use prompt::{GRAPH_SYSTEM_PROMPT, graph_request, label_request, label_system_prompt};
pub use reconcile::{reconcile_span, resolve_offset};
pub use reducer::{RelationshipReducer, reduce};
pub use roster::{GlossaryEntry, Roster, character_glossary, normalize_name, normalize_speakers};
pub use sheet::{character_sheet, sheet_context, text_preview};
pub use variants::{FALLBACK_NOTE, PADDING_NOTE, PlotVariant, plot_variants};
pub use windowing::split_windows;

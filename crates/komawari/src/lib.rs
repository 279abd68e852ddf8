//! Komawari - narrative text to comic cuts
//!
//! Komawari splits long narrative prose into short, labeled "cuts" (roughly
//! one comic panel each) by asking an LLM oracle about overlapping windows
//! of the text, and falls back to a deterministic splitter whenever the
//! oracle's answer is unusable. The same windowing drives a character
//! relationship graph, and the emitted cuts feed character briefs, plot
//! variants and character sheets.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use komawari::{ChatCompletionsOracle, CutAssembler, KomawariConfig, SourceText};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = KomawariConfig::load()?;
//!     let oracle = ChatCompletionsOracle::from_config(config.oracle())?;
//!     let assembler = CutAssembler::new(oracle, config.segmentation().clone());
//!
//!     let source = komawari::read_source("night_train.txt")?;
//!     let cuts = assembler.assemble(&source).await?;
//!     println!("{}", serde_json::to_string_pretty(&cuts)?);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `komawari_error` - Error types
//! - `komawari_core` - Source text, spans, windows, cuts, graph types
//! - `komawari_interface` - `Oracle` and `ProgressSink` traits
//! - `komawari_config` - Layered TOML configuration
//! - `komawari_oracle` - OpenAI-compatible chat completions client
//! - `komawari_pipeline` - Windowing, reconciliation, fallback, assembly
//!
//! This crate (`komawari`) re-exports everything for convenience.

#![forbid(unsafe_code)]

mod input;
mod observability;

pub use input::{decode_source, read_json, read_source, write_output};
pub use observability::{ObservabilityConfig, init_observability};

pub use komawari_config::*;
pub use komawari_core::*;
pub use komawari_error::*;
pub use komawari_interface::*;
pub use komawari_oracle::*;
pub use komawari_pipeline::*;

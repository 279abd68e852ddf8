//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the komawari binary.

mod commands;
mod cut;
mod editorial;
mod graph;

pub use commands::{Cli, Commands, CutArgs, GraphFormat};
pub use cut::run_cut;
pub use editorial::{run_brief, run_sheet, run_variants};
pub use graph::run_graph;

//! Handlers for commands that work from finished cuts or passages.

use komawari::{
    ChatCompletionsOracle, Cut, JsonError, KomawariConfig, KomawariResult, character_brief,
    character_sheet, plot_variants, read_json, write_output,
};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

fn print_json<T: Serialize>(value: &T) -> KomawariResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    write_output(None, &json)
}

/// Print the cuts of `cuts_path` that mention `name`.
pub fn run_brief(cuts_path: &Path, name: &str, limit: usize) -> KomawariResult<()> {
    let cuts: Vec<Cut> = read_json(cuts_path)?;
    print_json(&character_brief(name, &cuts, limit))
}

/// Print rewrite suggestions for `text`.
pub async fn run_variants(
    text: &str,
    style_hint: &str,
    count: usize,
    config: &KomawariConfig,
) -> KomawariResult<()> {
    let oracle = ChatCompletionsOracle::from_config(config.oracle())?;
    let variants = plot_variants(&oracle, text, style_hint, count).await?;
    print_json(&variants)
}

/// Print a Markdown character sheet drafted from the cuts mentioning `name`.
pub async fn run_sheet(
    cuts_path: &Path,
    name: &str,
    limit: usize,
    style_hint: &str,
    config: &KomawariConfig,
) -> KomawariResult<()> {
    let cuts: Vec<Cut> = read_json(cuts_path)?;
    let brief = character_brief(name, &cuts, limit);
    if brief.cuts().is_empty() {
        warn!(name, "No cuts mention this character");
    }
    let oracle = ChatCompletionsOracle::from_config(config.oracle())?;
    let sheet = character_sheet(&oracle, name, brief.cuts(), style_hint).await?;
    write_output(None, &sheet)
}

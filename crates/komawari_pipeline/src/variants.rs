//! Paraphrase suggestions for a selected passage.

use crate::parse_array;
use komawari_core::{Message, OracleRequest};
use komawari_error::KomawariResult;
use komawari_interface::Oracle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

const VARIANTS_SYSTEM_PROMPT: &str = "You are an editorial assistant. Given a passage made of several cuts, rewrite only its expression, never its meaning or facts, into natural, readable alternatives. Return ONLY a JSON array whose elements are {\"variant\": \"...\", \"note\": \"...\"}. variant: the proposed text, about one paragraph. note: what the rewrite aims for (viewpoint, pacing, vocabulary, mood), briefly. Match the style of the input; do not exaggerate or add new facts.";

/// Note attached when the original text stands in for a failed answer.
pub const FALLBACK_NOTE: &str = "fallback: original text";
/// Note attached when the oracle returned fewer variants than requested.
pub const PADDING_NOTE: &str = "padding: original text";

/// One paraphrase suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotVariant {
    /// Proposed text
    pub variant: String,
    /// What the rewrite aims for
    pub note: String,
}

impl PlotVariant {
    fn original(text: &str, note: &str) -> Self {
        Self {
            variant: text.to_string(),
            note: note.to_string(),
        }
    }
}

/// Ask for `count` paraphrases of `text`.
///
/// Always returns exactly `count` variants: a failed call or unusable
/// answer yields the original text, short answers are padded with it, and
/// blank variants are replaced by it.
///
/// # Errors
///
/// Only a credential rejection is returned as an error.
#[instrument(skip(oracle, text, style_hint), fields(chars = text.chars().count()))]
pub async fn plot_variants<O: Oracle + ?Sized>(
    oracle: &O,
    text: &str,
    style_hint: &str,
    count: usize,
) -> KomawariResult<Vec<PlotVariant>> {
    let user_prompt = format!(
        "Passage:\n{text}\n\nStyle hint:\n{style_hint}\n\nRequirements:\n- Keep meaning and facts; change rhetoric, word order and pacing.\n- Write {count} clearly different variants (concise, emotional, fast-paced, ...).\n- Output only the JSON array."
    );
    let request = OracleRequest::new(vec![
        Message::system(VARIANTS_SYSTEM_PROMPT),
        Message::user(user_prompt),
    ]);

    let records = match oracle.complete(&request).await {
        Ok(response) => parse_array(response.text()).unwrap_or_default(),
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            warn!(error = %e, "Variant call failed, returning original text");
            Vec::new()
        }
    };

    if records.is_empty() {
        return Ok(vec![PlotVariant::original(text, FALLBACK_NOTE); count]);
    }

    let mut variants: Vec<PlotVariant> = records
        .iter()
        .take(count)
        .map(|record| PlotVariant {
            variant: string_field(record, "variant").unwrap_or_else(|| text.to_string()),
            note: string_field(record, "note").unwrap_or_default(),
        })
        .collect();
    variants.resize(count, PlotVariant::original(text, PADDING_NOTE));
    Ok(variants)
}

fn string_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

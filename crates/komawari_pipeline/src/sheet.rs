//! Character sheet drafting from selected cuts.

use komawari_core::{Cut, Message, OracleRequest};
use komawari_error::KomawariResult;
use komawari_interface::Oracle;
use tracing::instrument;

const PREVIEW_CHARS: usize = 220;

const SHEET_SYSTEM_PROMPT: &str = "You are an editor. From the given cuts, organize the profile of the named character and guidance for storyboarding. Answer in Markdown with these sections:
- # Character profile (name, role, estimated age range, way of speaking, values, weaknesses/conflicts)
- ## Scene summary (a few points, in order)
- ## Speech patterns (bullets)
- ## Expressions and actions (bullets)
- ## Key relationships (inferred from context only, no speculation)
- ## Storyboard guidance (3 to 5 items)
Base every statement on the given cuts; do not invent.";

/// The first `max_chars` characters of `text`, with `…` appended when cut.
///
/// # Examples
///
/// ```
/// use komawari_pipeline::text_preview;
///
/// assert_eq!(text_preview("銀河鉄道の夜", 4), "銀河鉄道…");
/// assert_eq!(text_preview("short", 10), "short");
/// ```
pub fn text_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut preview: String = text.chars().take(max_chars).collect();
        preview.push('…');
        preview
    }
}

/// Numbered listing of cuts used as sheet context.
pub fn sheet_context(cuts: &[Cut]) -> String {
    cuts.iter()
        .enumerate()
        .map(|(i, cut)| {
            format!(
                "[{}]({}) speaker={} type={} time={} tone={}\n{}",
                i + 1,
                cut.id(),
                cut.speaker(),
                cut.kind(),
                cut.labels().time,
                cut.labels().tone,
                text_preview(cut.text(), PREVIEW_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Ask the oracle for a Markdown character sheet grounded in `cuts`.
///
/// # Errors
///
/// Any oracle failure is returned; there is no fallback text.
#[instrument(skip(oracle, cuts, style_hint), fields(cuts = cuts.len()))]
pub async fn character_sheet<O: Oracle + ?Sized>(
    oracle: &O,
    name: &str,
    cuts: &[Cut],
    style_hint: &str,
) -> KomawariResult<String> {
    let user_prompt = format!(
        "Character: {}\nStyle hint: {}\nCuts (excerpts):\n{}\n\nUsing only the above, answer in the requested Markdown layout.",
        name,
        style_hint,
        sheet_context(cuts)
    );
    let request = OracleRequest::new(vec![
        Message::system(SHEET_SYSTEM_PROMPT),
        Message::user(user_prompt),
    ]);
    let response = oracle.complete(&request).await?;
    Ok(response.text().trim().to_string())
}

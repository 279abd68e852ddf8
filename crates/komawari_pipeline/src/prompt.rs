//! Instructions and request construction for oracle calls.

use komawari_core::{CutKind, CutLengths, Message, OracleRequest, TimeTag};
use strum::IntoEnumIterator;

/// Instruction for relationship extraction over one window.
pub const GRAPH_SYSTEM_PROMPT: &str = r#"You are an editorial assistant. From the given excerpt of a story, extract the characters and the relationships between them, and return exactly one JSON object:
{
  "characters": [{"name": "...", "description": "..."}],
  "relationships": [{"source": "...", "target": "...", "label": "..."}]
}

Constraints:
- Do not repeat a character name.
- Keep each list to about ten entries.
- If there are no relationships, return an empty "relationships" array.
- Never leave "label" empty; use a short word such as friend, mentor, rival, family."#;

/// Build the instruction that asks the oracle to split a window into cuts.
///
/// The instruction states the ideal length band and the hard bounds, and
/// lists the accepted classification and temporal tags.
///
/// # Examples
///
/// ```
/// use komawari_core::CutLengths;
/// use komawari_pipeline::label_system_prompt;
///
/// let prompt = label_system_prompt(&CutLengths::from_target(150));
/// assert!(prompt.contains("112 to 187 characters"));
/// assert!(prompt.contains("longer than 240"));
/// assert!(prompt.contains("stage_direction"));
/// ```
pub fn label_system_prompt(lengths: &CutLengths) -> String {
    let kinds = CutKind::iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" | ");
    let times = TimeTag::iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        r#"You are an editorial assistant. Split the given chunk of a story into cuts, each the text of roughly one comic panel, label every cut, and return ONLY a JSON array.

Splitting rules (strict):
- Aim for {ideal_min} to {ideal_max} characters per cut.
- A cut longer than {hard_max} characters must always be split.
- Sound effects, stage directions and standalone lines of dialogue may be shorter than {hard_min} characters.
- Good boundaries: a change of speaker, a switch between narration and dialogue, a change of time or place, a transition (next morning, a flashback), a sound effect.
- Measure cuts by characters, not by sentences.

Labels:
- type: {kinds}
- speaker: the speaker's name, or "unknown"
- time: {times}
- location: the place, or "unknown"
- tone: calm | tense | comedic | romantic | tragic | neutral
- emotion: optional, treated as neutral when omitted
- action: the main action as a short verb phrase, or ""
- entities: array of proper nouns (people, things, places)
- source_local_span: {{"start": offset, "end": offset}} character offsets within the chunk (approximate is fine)
- text: the cut text, copied from the source with minimal cleanup

Output format (strict):
[
  {{
    "id_local": "k001",
    "text": "...",
    "type": "...",
    "speaker": "...",
    "time": "...",
    "location": "...",
    "tone": "...",
    "emotion": "...",
    "action": "...",
    "entities": ["..."],
    "source_local_span": {{"start": 0, "end": 10}}
  }}
]"#,
        ideal_min = lengths.ideal_min(),
        ideal_max = lengths.ideal_max(),
        hard_min = lengths.hard_min(),
        hard_max = lengths.hard_max(),
        kinds = kinds,
        times = times,
    )
}

/// Request labeling of one window, with optional style and glossary context.
///
/// Blank hints are left out.
pub fn label_request(
    system_prompt: &str,
    window_text: &str,
    style_hint: Option<&str>,
    glossary: Option<&str>,
) -> OracleRequest {
    let mut messages = vec![Message::system(system_prompt)];
    if let Some(hint) = style_hint.filter(|h| !h.trim().is_empty()) {
        messages.push(Message::user(format!("Style hint (for reference):\n{}", hint)));
    }
    if let Some(glossary) = glossary.filter(|g| !g.trim().is_empty()) {
        messages.push(Message::user(format!(
            "Known characters (keep names consistent with this list):\n{}",
            glossary
        )));
    }
    messages.push(Message::user(format!(
        "Process the following chunk and return only the JSON array.\n---\n{}\n---",
        window_text
    )));
    OracleRequest::new(messages)
}

/// Request relationship extraction for one window.
pub fn graph_request(window_text: &str) -> OracleRequest {
    OracleRequest::new(vec![
        Message::system(GRAPH_SYSTEM_PROMPT),
        Message::user(format!("Excerpt:\n---\n{}\n---", window_text)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_request_skips_blank_context() {
        let req = label_request("sys", "本文", Some("  "), None);
        assert_eq!(req.messages().len(), 2);
        assert!(req.messages()[1].content().contains("本文"));
    }

    #[test]
    fn test_label_request_orders_context() {
        let req = label_request("sys", "本文", Some("hard-boiled"), Some("A: detective"));
        let contents: Vec<_> = req.messages().iter().map(|m| m.content().as_str()).collect();
        assert_eq!(contents[0], "sys");
        assert!(contents[1].contains("hard-boiled"));
        assert!(contents[2].contains("A: detective"));
        assert!(contents[3].contains("本文"));
    }

    #[test]
    fn test_graph_request_wraps_excerpt() {
        let req = graph_request("excerpt text");
        assert_eq!(req.messages()[0].content(), GRAPH_SYSTEM_PROMPT);
        assert!(req.messages()[1].content().contains("excerpt text"));
    }
}

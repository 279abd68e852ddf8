//! Tolerant extraction of JSON from free-form oracle responses.
//!
//! Oracle responses often wrap JSON in markdown code fences or surround it
//! with explanatory prose. Each parser tries, in order:
//!
//! 1. Strip a markdown code fence
//! 2. Decode the remaining text directly
//! 3. Decode the first region matching the expected shape
//! 4. Decode balanced bracketed/braced regions, left to right
//!
//! When the fenced body yields nothing, steps 3 and 4 run again over the
//! whole response.
//!
//! Failure is reported as `None`, never as an error.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

static ARRAY_OF_OBJECTS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").ok());

static OBJECT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#"(?s)\{\s*".*\}"#).ok());

/// Extract a JSON array from an oracle response.
///
/// # Examples
///
/// ```
/// use komawari_pipeline::parse_array;
///
/// let raw = "Here are the cuts:\n```json\n[{\"text\": \"汽車が来た。\"}]\n```";
/// let records = parse_array(raw).unwrap();
/// assert_eq!(records[0]["text"], "汽車が来た。");
///
/// assert!(parse_array("I could not process this chunk.").is_none());
/// ```
pub fn parse_array(raw: &str) -> Option<Vec<Value>> {
    let found = locate(raw, |text| {
        decode(text, Value::as_array)
            .or_else(|| {
                ARRAY_OF_OBJECTS
                    .as_ref()
                    .and_then(|re| re.find(text))
                    .and_then(|m| decode(m.as_str(), Value::as_array))
            })
            .or_else(|| scan_balanced(text, '[', ']', Value::as_array))
    });

    if found.is_none() {
        debug!(response_len = raw.len(), "No JSON array found in oracle response");
    }
    found
}

/// Extract a JSON object from an oracle response.
///
/// # Examples
///
/// ```
/// use komawari_pipeline::parse_object;
///
/// let raw = "Sure! {\"characters\": [], \"relationships\": []} Hope this helps.";
/// let object = parse_object(raw).unwrap();
/// assert!(object.contains_key("characters"));
/// ```
pub fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    let found = locate(raw, |text| {
        decode(text, Value::as_object)
            .or_else(|| {
                OBJECT
                    .as_ref()
                    .and_then(|re| re.find(text))
                    .and_then(|m| decode(m.as_str(), Value::as_object))
            })
            .or_else(|| scan_balanced(text, '{', '}', Value::as_object))
    });

    if found.is_none() {
        debug!(response_len = raw.len(), "No JSON object found in oracle response");
    }
    found
}

/// Run `search` over the fenced body first, then over the whole response.
///
/// A stray or example fence must not hide JSON sitting outside it.
fn locate<T>(raw: &str, search: impl Fn(&str) -> Option<T>) -> Option<T> {
    let body = strip_code_fence(raw);
    let trimmed = raw.trim();
    search(body).or_else(|| (body != trimmed).then(|| search(trimmed)).flatten())
}

/// Decode `text` and keep it only if `shape` accepts the value.
fn decode<T: Clone>(text: &str, shape: fn(&Value) -> Option<&T>) -> Option<T> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    shape(&value).cloned()
}

/// Contents of the first markdown code fence, or the trimmed input.
///
/// An unclosed fence (a truncated response) yields everything after it.
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after_marker = &trimmed[open + 3..];
    // Skip the language tag, if any, up to the end of the fence line.
    let content = match after_marker.find('\n') {
        Some(newline) => &after_marker[newline + 1..],
        None => after_marker,
    };
    match content.find("```") {
        Some(close) => content[..close].trim(),
        None => content.trim(),
    }
}

/// Try each balanced `open`..`close` region from left to right.
fn scan_balanced<T: Clone>(
    text: &str,
    open: char,
    close: char,
    shape: fn(&Value) -> Option<&T>,
) -> Option<T> {
    text.match_indices(open)
        .filter_map(|(start, _)| balanced_region(&text[start..], open, close))
        .find_map(|region| decode(region, shape))
}

/// The region from the leading `open` up to its matching `close`, skipping
/// delimiters inside JSON strings.
fn balanced_region(text: &str, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[..i + close.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_array() {
        let records = parse_array(r#"[{"text": "a"}, {"text": "b"}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_fence_without_language() {
        let records = parse_array("```\n[{\"text\": \"a\"}]\n```").unwrap();
        assert_eq!(records[0]["text"], "a");
    }

    #[test]
    fn test_unclosed_fence() {
        let records = parse_array("```json\n[{\"text\": \"a\"}]").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_array_embedded_in_prose() {
        let raw = "Result:\n[{\"text\": \"x\", \"entities\": [\"A\"]}]\nDone.";
        let records = parse_array(raw).unwrap();
        assert_eq!(records[0]["entities"][0], "A");
    }

    #[test]
    fn test_two_arrays_fall_back_to_balanced_scan() {
        // The greedy pattern spans both arrays and fails to decode.
        let raw = "[{\"text\": \"a\"}] and also [{\"text\": \"b\"}]";
        let records = parse_array(raw).unwrap();
        assert_eq!(records[0]["text"], "a");
    }

    #[test]
    fn test_brackets_inside_strings() {
        let raw = "note: [{\"text\": \"he said ] and [ \\\"quoted\\\"\"}]";
        let records = parse_array(raw).unwrap();
        assert_eq!(records[0]["text"], "he said ] and [ \"quoted\"");
    }

    #[test]
    fn test_object_is_not_an_array() {
        assert!(parse_array(r#"{"text": "a"}"#).is_none());
        assert!(parse_object(r#"[{"text": "a"}]"#).is_some());
    }

    #[test]
    fn test_object_in_fence() {
        let raw = "```json\n{\"characters\": [{\"name\": \"A\"}]}\n```";
        let object = parse_object(raw).unwrap();
        assert!(object["characters"].is_array());
    }

    #[test]
    fn test_stray_closing_fence_after_json() {
        let records = parse_array("[{\"text\": \"a\"}]\n```").unwrap();
        assert_eq!(records[0]["text"], "a");
    }

    #[test]
    fn test_example_fence_before_json() {
        let raw = "Format:\n```\n(example)\n```\n[{\"text\": \"a\"}]";
        let records = parse_array(raw).unwrap();
        assert_eq!(records[0]["text"], "a");

        let raw = "Schema:\n```\nsee below\n```\n{\"characters\": []}";
        assert!(parse_object(raw).unwrap().contains_key("characters"));
    }

    #[test]
    fn test_garbage() {
        assert!(parse_array("").is_none());
        assert!(parse_array("[oops").is_none());
        assert!(parse_object("{not json}").is_none());
    }
}

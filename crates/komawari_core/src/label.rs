//! Raw, untrusted records returned by the labeling oracle.
//!
//! The oracle is a generative system, so nothing about the record shape is
//! assumed: each field is pulled out on its own and falls back to a default
//! when it is missing or has an unexpected type.

use serde_json::{Map, Value};

/// One unit the oracle detected inside a window.
///
/// The reported span is ambiguous: it may be window-relative or already
/// absolute. Reconciliation happens later, in the pipeline.
///
/// # Examples
///
/// ```
/// use komawari_core::OracleLabel;
/// use serde_json::json;
///
/// let value = json!({
///     "text": "「行こう」",
///     "type": "dialogue",
///     "speaker": "ジョバンニ",
///     "source_local_span": {"start": "12", "end": 17.0}
/// });
/// let label = OracleLabel::from_value(&value).unwrap();
/// assert_eq!(label.speakers, vec!["ジョバンニ".to_string()]);
/// assert_eq!(label.span_start, Some(12));
/// assert_eq!(label.span_end, Some(17));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OracleLabel {
    /// Oracle's own local id, if any
    pub local_id: Option<String>,
    /// Cut text as reported
    pub text: String,
    /// Raw classification tag
    pub kind: Option<String>,
    /// Raw speaker names, from `speakers` or `speaker`, string or list
    pub speakers: Vec<String>,
    /// Raw temporal tag
    pub time: Option<String>,
    /// Location
    pub location: Option<String>,
    /// Scene
    pub scene: Option<String>,
    /// Tone
    pub tone: Option<String>,
    /// Emotion
    pub emotion: Option<String>,
    /// Action phrase
    pub action: Option<String>,
    /// Entity names
    pub entities: Vec<String>,
    /// Reported span start (local or absolute)
    pub span_start: Option<i64>,
    /// Reported span end (local or absolute)
    pub span_end: Option<i64>,
}

impl OracleLabel {
    /// Extract a label from one element of the oracle's JSON array.
    ///
    /// Returns `None` when the element is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let mut speakers = string_list(obj.get("speakers"));
        if speakers.is_empty() {
            speakers = string_list(obj.get("speaker"));
        }

        let span = ["source_local_span", "local_span", "span"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_object));

        Some(Self {
            local_id: string_field(obj, "id_local").or_else(|| string_field(obj, "id")),
            text: string_field(obj, "text").unwrap_or_default(),
            kind: string_field(obj, "type").or_else(|| string_field(obj, "kind")),
            speakers,
            time: string_field(obj, "time"),
            location: string_field(obj, "location"),
            scene: string_field(obj, "scene"),
            tone: string_field(obj, "tone"),
            emotion: string_field(obj, "emotion"),
            action: string_field(obj, "action"),
            entities: string_list(obj.get("entities")),
            span_start: span.and_then(|s| integer_field(s, "start")),
            span_end: span.and_then(|s| integer_field(s, "end")),
        })
    }
}

/// A string-like field. Numbers and booleans are rendered; null and
/// containers are treated as absent.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts a single string or a list of strings; anything else is empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Integers, floats (truncated) and numeric strings.
fn integer_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

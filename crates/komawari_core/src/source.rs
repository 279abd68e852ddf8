//! Immutable source text addressed by character offsets.

use crate::Span;

/// The narrative text a pipeline run operates on.
///
/// Line endings are normalized to `\n` on construction. All offsets used
/// anywhere in the pipeline are character (not byte) offsets into the
/// normalized text.
///
/// # Examples
///
/// ```
/// use komawari_core::{SourceText, Span};
///
/// let source = SourceText::new("夜の駅。\r\n汽車が来た。");
/// assert_eq!(source.len(), 11);
/// assert_eq!(source.slice(Span::new(0, 4)), "夜の駅。");
/// assert_eq!(source.slice(Span::new(4, 5)), "\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceText {
    chars: Vec<char>,
}

impl SourceText {
    /// Build source text, normalizing `\r\n` and lone `\r` to `\n`.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = normalize_line_endings(raw.as_ref());
        Self {
            chars: normalized.chars().collect(),
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether the text contains nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    /// Characters of the text.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Copy out the characters covered by `span`, clamped to the text bounds.
    pub fn slice(&self, span: Span) -> String {
        let end = span.end.min(self.chars.len());
        let start = span.start.min(end);
        self.chars[start..end].iter().collect()
    }
}

impl std::fmt::Display for SourceText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl From<&str> for SourceText {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for SourceText {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Replace `\r\n` and lone `\r` with `\n`.
pub fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

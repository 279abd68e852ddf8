//! Deterministic segmentation used when oracle output is unusable.

use komawari_core::{Span, normalize_line_endings};

/// Characters after which a fallback segment may end: paragraph breaks,
/// full stops and commas (CJK, full-width and ASCII forms).
const FULL_STOPS: [char; 3] = ['。', '．', '.'];
const COMMAS: [char; 3] = ['、', '，', ','];

/// One segment produced by [`fallback_split`].
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct FallbackSegment {
    /// Untrimmed span within the input text
    span: Span,
    /// Segment text with surrounding whitespace removed
    text: String,
}

/// Split `text` into segments of at most `max_len` characters.
///
/// Each segment ends after the rightmost paragraph break, full stop or comma
/// at index `min_len - 1` or later within the candidate; without one, it ends
/// at exactly `max_len` characters. Segments that are only whitespace are
/// skipped. The spans of the returned segments tile the (line-ending
/// normalized) input in order, except for skipped whitespace.
///
/// Never fails; `max_len` of zero is treated as one.
///
/// # Examples
///
/// ```
/// use komawari_pipeline::fallback_split;
///
/// let segments = fallback_split("ab。cd。ef", 2, 4);
/// let texts: Vec<_> = segments.iter().map(|s| s.text().as_str()).collect();
/// assert_eq!(texts, vec!["ab。", "cd。", "ef"]);
/// ```
pub fn fallback_split(text: &str, min_len: usize, max_len: usize) -> Vec<FallbackSegment> {
    let chars: Vec<char> = normalize_line_endings(text).chars().collect();
    let len = chars.len();
    let max_len = max_len.max(1);
    let min_index = min_len.saturating_sub(1);

    let mut segments = Vec::new();
    let mut cursor = 0;
    while cursor < len {
        let tentative_end = cursor.saturating_add(max_len).min(len);
        let mut split = tentative_end;
        if tentative_end < len
            && let Some(candidate) = last_break(&chars[cursor..tentative_end])
            && candidate >= min_index
        {
            split = cursor + candidate + 1;
        }

        let raw = &chars[cursor..split];
        if let Some(first) = raw.iter().position(|c| !c.is_whitespace()) {
            let last = raw
                .iter()
                .rposition(|c| !c.is_whitespace())
                .unwrap_or(first);
            segments.push(FallbackSegment {
                span: Span::new(cursor, split),
                text: raw[first..=last].iter().collect(),
            });
        }
        cursor = split;
    }
    segments
}

/// Rightmost break candidate in `chars`.
fn last_break(chars: &[char]) -> Option<usize> {
    let paragraph = chars.windows(2).rposition(|pair| pair == ['\n', '\n']);
    let stop = chars.iter().rposition(|c| FULL_STOPS.contains(c));
    let comma = chars.iter().rposition(|c| COMMAS.contains(c));
    [paragraph, stop, comma].into_iter().flatten().max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_split_without_candidates() {
        let segments = fallback_split("abcdefghij", 2, 4);
        let spans: Vec<_> = segments.iter().map(|s| *s.span()).collect();
        assert_eq!(
            spans,
            vec![Span::new(0, 4), Span::new(4, 8), Span::new(8, 10)]
        );
    }

    #[test]
    fn test_candidate_before_min_is_ignored() {
        // "。" at index 0 is below min_len - 1 = 2
        let segments = fallback_split("。bcdefg", 3, 4);
        assert_eq!(segments[0].text(), "。bcd");
    }

    #[test]
    fn test_whitespace_segments_are_skipped() {
        let segments = fallback_split("ab  \n    \n  cd", 1, 4);
        assert!(segments.iter().all(|s| !s.text().is_empty()));
        assert_eq!(segments.first().map(|s| s.text().as_str()), Some("ab"));
        assert_eq!(segments.last().map(|s| s.text().as_str()), Some("cd"));
    }

    #[test]
    fn test_zero_max_len_terminates() {
        assert_eq!(fallback_split("abc", 0, 0).len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(fallback_split("", 40, 240).is_empty());
        assert!(fallback_split(" \n ", 40, 240).is_empty());
    }
}

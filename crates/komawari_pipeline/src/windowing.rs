//! Overlapping, paragraph-aware windows over the source text.

use komawari_core::{SourceText, Window};
use komawari_error::{KomawariResult, PipelineError, PipelineErrorKind};
use tracing::{debug, instrument};

/// Split `source` into overlapping windows of at most `size` characters.
///
/// A window that does not reach the end of the text is shortened to the last
/// paragraph break (`\n\n`) inside it, provided the break lies at least
/// `size / 2` characters in. The next window starts `overlap` characters
/// before the previous end, and always at least one character after the
/// previous start.
///
/// Empty text yields no windows.
///
/// # Errors
///
/// `PipelineErrorKind::InvalidWindowing` unless `0 < overlap < size`.
///
/// # Examples
///
/// ```
/// use komawari_core::SourceText;
/// use komawari_pipeline::split_windows;
///
/// let source = SourceText::new("a".repeat(250));
/// let windows = split_windows(&source, 100, 20).unwrap();
/// let spans: Vec<_> = windows.iter().map(|w| (w.start(), w.end())).collect();
/// assert_eq!(spans, vec![(0, 100), (80, 180), (160, 250)]);
/// ```
#[instrument(skip(source), fields(len = source.len()))]
pub fn split_windows(
    source: &SourceText,
    size: usize,
    overlap: usize,
) -> KomawariResult<Vec<Window>> {
    if overlap == 0 || overlap >= size {
        return Err(PipelineError::new(PipelineErrorKind::InvalidWindowing { size, overlap }).into());
    }

    let chars = source.chars();
    let len = chars.len();
    let snap_threshold = size / 2;
    let mut windows = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = start.saturating_add(size).min(len);
        if end < len
            && let Some(brk) = last_paragraph_break(&chars[start..end])
            && brk >= snap_threshold
        {
            end = start + brk;
        }

        windows.push(Window::new(windows.len(), start, end));
        if end >= len {
            break;
        }
        start = (start + 1).max(end.saturating_sub(overlap));
    }

    debug!(windows = windows.len(), "Split source into windows");
    Ok(windows)
}

/// Index of the last `\n\n` in `chars`.
fn last_paragraph_break(chars: &[char]) -> Option<usize> {
    chars.windows(2).rposition(|pair| pair == ['\n', '\n'])
}

//! Mapping oracle-reported offsets onto absolute source positions.
//!
//! The oracle is asked for window-local offsets but sometimes echoes
//! absolute document offsets instead. There is no way to tell the two apart
//! reliably, so a magnitude heuristic is used: anything larger than one and a
//! half window lengths is taken as absolute. In a very short window a
//! legitimately local offset past that bound is misread as absolute; the
//! clamping in [`reconcile_span`] keeps the result inside the window anyway.

use komawari_core::{Span, Window};

/// Resolve one reported offset to an absolute offset.
///
/// - negative: unknown, mapped to the window start
/// - greater than `1.5 × window length`: already absolute, returned unchanged
/// - otherwise: window-local, shifted by the window start
///
/// The result is not clamped.
///
/// # Examples
///
/// ```
/// use komawari_core::Window;
/// use komawari_pipeline::resolve_offset;
///
/// let window = Window::new(3, 1000, 1300);
/// assert_eq!(resolve_offset(-1, &window), 1000);
/// assert_eq!(resolve_offset(40, &window), 1040);
/// assert_eq!(resolve_offset(1100, &window), 1100);
/// ```
pub fn resolve_offset(reported: i64, window: &Window) -> usize {
    if reported < 0 {
        return window.start();
    }
    let value = reported as u64;
    let size = window.len() as u64;
    if value.saturating_mul(2) > size.saturating_mul(3) {
        value as usize
    } else {
        window.start() + value as usize
    }
}

/// Resolve a reported span and clamp it to `window`.
///
/// A missing start counts as 0; a missing end as `start + text_len`. If the
/// resolved end does not follow the start it becomes `start + text_len`.
/// The result always satisfies `window.start ≤ start ≤ end ≤ window.end`.
///
/// # Examples
///
/// ```
/// use komawari_core::{Span, Window};
/// use komawari_pipeline::reconcile_span;
///
/// let window = Window::new(3, 1000, 1300);
/// assert_eq!(reconcile_span(Some(-1), Some(40), 12, &window), Span::new(1000, 1040));
/// assert_eq!(reconcile_span(Some(250), None, 100, &window), Span::new(1250, 1300));
/// ```
pub fn reconcile_span(
    start: Option<i64>,
    end: Option<i64>,
    text_len: usize,
    window: &Window,
) -> Span {
    let local_start = start.unwrap_or(0);
    let local_end = end.unwrap_or_else(|| local_start.saturating_add(text_len as i64));

    let abs_start = resolve_offset(local_start, window);
    let mut abs_end = resolve_offset(local_end, window);
    if abs_end <= abs_start {
        abs_end = abs_start.saturating_add(text_len);
    }

    let abs_start = abs_start.clamp(window.start(), window.end());
    let abs_end = abs_end.clamp(abs_start, window.end());
    Span::new(abs_start, abs_end)
}

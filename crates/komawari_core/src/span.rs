//! Half-open character spans over a [`SourceText`](crate::SourceText).

use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of character offsets.
///
/// # Examples
///
/// ```
/// use komawari_core::Span;
///
/// let span = Span::new(10, 25);
/// assert_eq!(span.len(), 15);
/// assert!(span.contains(10));
/// assert!(!span.contains(25));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    derive_more::Display,
)]
#[display("[{}, {})", start, end)]
pub struct Span {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl Span {
    /// Create a span. `end` is raised to `start` if it would precede it.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Whether `offset` falls inside the span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether `other` lies entirely inside this span.
    pub fn encloses(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Shift a window-local span into absolute coordinates.
    pub fn offset_by(&self, base: usize) -> Span {
        Span::new(base + self.start, base + self.end)
    }
}

/// A bounded span of the source text submitted to the oracle in one call.
///
/// Windows may overlap; consecutive windows leave no gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    /// 0-based position in the window sequence
    pub index: usize,
    /// Absolute span covered by the window
    pub span: Span,
}

impl Window {
    /// Create a window at `index` covering `[start, end)`.
    pub fn new(index: usize, start: usize, end: usize) -> Self {
        Self {
            index,
            span: Span::new(start, end),
        }
    }

    /// Absolute start offset.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Absolute end offset (exclusive).
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Window length in characters.
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

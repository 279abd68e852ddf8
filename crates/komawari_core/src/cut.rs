//! Cuts: the validated, labeled output units of the pipeline.

use crate::Span;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Stable, monotonically increasing cut identifier, rendered as `c0001`.
///
/// # Examples
///
/// ```
/// use komawari_core::CutId;
///
/// let id = CutId::new(7);
/// assert_eq!(id.to_string(), "c0007");
/// assert_eq!("c0007".parse::<CutId>().unwrap(), id);
/// assert!(CutId::new(7) < CutId::new(12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CutId(u32);

impl CutId {
    /// Create an identifier from its sequence number (1-based).
    pub fn new(sequence: u32) -> Self {
        Self(sequence)
    }

    /// Sequence number of this identifier.
    pub fn sequence(&self) -> u32 {
        self.0
    }

    /// The identifier that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for CutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{:04}", self.0)
    }
}

impl FromStr for CutId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('c')
            .and_then(|digits| digits.parse::<u32>().ok())
            .map(CutId)
            .ok_or_else(|| format!("invalid cut id: {}", s))
    }
}

impl From<CutId> for String {
    fn from(id: CutId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CutId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Classification of a cut.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CutKind {
    /// Spoken line
    Dialogue,
    /// Narrative prose
    Narration,
    /// Inner voice
    Monologue,
    /// Sound effect
    Sfx,
    /// Stage direction
    StageDirection,
    /// Not classified
    #[default]
    Unknown,
}

impl CutKind {
    /// Parse an oracle-supplied tag, mapping anything unrecognized to `Unknown`.
    ///
    /// # Examples
    ///
    /// ```
    /// use komawari_core::CutKind;
    ///
    /// assert_eq!(CutKind::parse_lenient("Dialogue"), CutKind::Dialogue);
    /// assert_eq!(CutKind::parse_lenient("stage direction"), CutKind::StageDirection);
    /// assert_eq!(CutKind::parse_lenient("chorus"), CutKind::Unknown);
    /// ```
    pub fn parse_lenient(raw: &str) -> Self {
        canonical_tag(raw).parse().unwrap_or_default()
    }
}

/// Temporal placement of a cut.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TimeTag {
    /// Story present
    Present,
    /// Recollection of earlier events
    Flashback,
    /// Hint at later events
    Foreshadow,
    /// Jump forward in time
    TimeSkip,
    /// Not classified
    #[default]
    Unknown,
}

impl TimeTag {
    /// Parse an oracle-supplied tag, mapping anything unrecognized to `Unknown`.
    pub fn parse_lenient(raw: &str) -> Self {
        canonical_tag(raw).parse().unwrap_or_default()
    }
}

fn canonical_tag(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Labels attached to a cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutLabels {
    /// Classification tag
    #[serde(rename = "type")]
    pub kind: CutKind,
    /// Ordered, deduplicated speaker names (may be empty)
    pub speakers: Vec<String>,
    /// Temporal tag
    pub time: TimeTag,
    /// Free-text location
    pub location: String,
    /// Free-text scene
    pub scene: String,
    /// Tone tag
    pub tone: String,
    /// Emotion tag
    pub emotion: String,
    /// Short action phrase
    pub action: String,
    /// Named entities
    pub entities: Vec<String>,
}

impl Default for CutLabels {
    fn default() -> Self {
        Self {
            kind: CutKind::Unknown,
            speakers: Vec::new(),
            time: TimeTag::Unknown,
            location: String::new(),
            scene: String::new(),
            tone: "neutral".to_string(),
            emotion: "neutral".to_string(),
            action: String::new(),
            entities: Vec::new(),
        }
    }
}

impl CutLabels {
    /// Labels given to cuts produced by the fallback splitter.
    pub fn fallback() -> Self {
        Self {
            kind: CutKind::Narration,
            ..Self::default()
        }
    }
}

/// A finalized, labeled text segment.
///
/// The checksum is computed from the text at construction, so the two
/// never disagree.
///
/// # Examples
///
/// ```
/// use komawari_core::{Cut, CutId, CutLabels, Span};
///
/// let cut = Cut::new(CutId::new(1), "汽車が来た。", CutLabels::fallback(), Span::new(5, 11));
/// assert_eq!(cut.id().to_string(), "c0001");
/// assert_eq!(cut.speaker(), "unknown");
/// assert!(cut.checksum().starts_with("sha256:"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Cut {
    /// Global identifier
    id: CutId,
    /// Cut text
    text: String,
    /// Labels
    #[serde(flatten)]
    labels: CutLabels,
    /// Absolute span in the source text
    #[serde(rename = "source_span")]
    span: Span,
    /// Content checksum of `text`
    checksum: String,
}

impl Cut {
    /// Build a cut and compute its checksum.
    pub fn new(id: CutId, text: impl Into<String>, labels: CutLabels, span: Span) -> Self {
        let text = text.into();
        let checksum = content_checksum(&text);
        Self {
            id,
            text,
            labels,
            span,
            checksum,
        }
    }

    /// Classification tag.
    pub fn kind(&self) -> CutKind {
        self.labels.kind
    }

    /// All speakers, in first-seen order.
    pub fn speakers(&self) -> &[String] {
        &self.labels.speakers
    }

    /// Primary speaker, or `"unknown"` when none was reported.
    pub fn speaker(&self) -> &str {
        self.labels
            .speakers
            .first()
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    /// Named entities.
    pub fn entities(&self) -> &[String] {
        &self.labels.entities
    }
}

/// Content checksum of a cut text: `sha256:<hex>`.
pub fn content_checksum(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}

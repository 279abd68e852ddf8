//! Per-window labeling loop that turns source text into cuts.

use crate::{
    Roster, fallback_split, label_request, label_system_prompt, normalize_name, normalize_speakers,
    parse_array, reconcile_span, split_windows,
};
use komawari_core::{
    Cut, CutId, CutKind, CutLabels, CutLengths, FallbackReason, OracleLabel, SegmentationConfig,
    SourceText, Span, TimeTag, Window, WindowOutcome, WindowProgress,
};
use komawari_error::{KomawariResult, PipelineError, PipelineErrorKind};
use komawari_interface::{Oracle, ProgressSink};
use std::collections::HashSet;
use tracing::{debug, error, info, instrument, warn};

/// Result of asking the oracle about one window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowLabeling {
    /// Usable records, each with non-blank text
    Labeled(Vec<OracleLabel>),
    /// The window must be segmented by the fallback splitter
    Failed(FallbackReason),
}

/// Numbers cuts in emission order.
#[derive(Debug)]
struct CutEmitter {
    next: CutId,
    cuts: Vec<Cut>,
}

impl CutEmitter {
    fn new() -> Self {
        Self {
            next: CutId::new(1),
            cuts: Vec::new(),
        }
    }

    fn emit(&mut self, text: String, labels: CutLabels, span: Span) {
        let id = self.next;
        self.next = id.next();
        self.cuts.push(Cut::new(id, text, labels, span));
    }

    /// Emit one narration cut per fallback segment of `window_text`.
    fn emit_fallback(&mut self, window_text: &str, window: &Window, lengths: &CutLengths) -> usize {
        let segments = fallback_split(window_text, *lengths.hard_min(), *lengths.hard_max());
        for segment in &segments {
            self.emit(
                segment.text().clone(),
                CutLabels::fallback(),
                segment.span().offset_by(window.start()),
            );
        }
        segments.len()
    }

    fn into_cuts(self) -> Vec<Cut> {
        self.cuts
    }
}

/// Drives windowing, oracle calls, parsing, reconciliation and fallback.
///
/// Windows are processed strictly in order; cut identifiers are assigned in
/// emission order across all windows. Any failure in one window (network,
/// timeout, unusable response) degrades that window to the fallback
/// splitter. Only a credential rejection aborts the run.
///
/// # Examples
///
/// ```no_run
/// use komawari_config::KomawariConfig;
/// use komawari_core::SourceText;
/// use komawari_oracle::ChatCompletionsOracle;
/// use komawari_pipeline::CutAssembler;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = KomawariConfig::load()?;
/// let oracle = ChatCompletionsOracle::from_config(config.oracle())?;
/// let assembler = CutAssembler::new(oracle, config.segmentation().clone())
///     .with_style_hint("quiet, melancholic");
/// let cuts = assembler.assemble(&SourceText::new("...")).await?;
/// # Ok(())
/// # }
/// ```
pub struct CutAssembler<O: Oracle> {
    oracle: O,
    segmentation: SegmentationConfig,
    style_hint: Option<String>,
    glossary: Option<String>,
    roster: Option<Roster>,
    progress: Option<Box<dyn ProgressSink>>,
}

impl<O: Oracle> CutAssembler<O> {
    /// Create an assembler around `oracle`.
    pub fn new(oracle: O, segmentation: SegmentationConfig) -> Self {
        Self {
            oracle,
            segmentation,
            style_hint: None,
            glossary: None,
            roster: None,
            progress: None,
        }
    }

    /// Style hint sent with every window.
    pub fn with_style_hint(mut self, style_hint: impl Into<String>) -> Self {
        self.style_hint = Some(style_hint.into());
        self
    }

    /// Character glossary sent with every window.
    pub fn with_glossary(mut self, glossary: impl Into<String>) -> Self {
        self.glossary = Some(glossary.into());
        self
    }

    /// Canonicalize reported speakers against `roster`.
    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Notify `sink` after each window.
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Some(Box::new(sink));
        self
    }

    /// The wrapped oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Turn `source` into an ordered sequence of cuts.
    ///
    /// Blank input yields no cuts.
    ///
    /// # Errors
    ///
    /// - `PipelineErrorKind::InvalidWindowing` / `InvalidTargetLength` for
    ///   unusable segmentation settings
    /// - `PipelineErrorKind::Aborted` when the oracle rejects credentials
    #[instrument(
        skip_all,
        fields(
            len = source.len(),
            provider = self.oracle.provider_name(),
            model = self.oracle.model_name()
        )
    )]
    pub async fn assemble(&self, source: &SourceText) -> KomawariResult<Vec<Cut>> {
        self.segmentation.validate()?;
        if source.is_blank() {
            info!("Source text is blank, nothing to label");
            return Ok(Vec::new());
        }

        let windows = split_windows(
            source,
            *self.segmentation.window_size(),
            *self.segmentation.overlap(),
        )?;
        let lengths = self.segmentation.lengths();
        let system_prompt = label_system_prompt(&lengths);
        let total = windows.len();
        info!(windows = total, target = lengths.target(), "Starting cut assembly");

        let mut emitter = CutEmitter::new();
        for window in &windows {
            let window_text = source.slice(window.span);
            let labeling = if window_text.trim().is_empty() {
                WindowLabeling::Labeled(Vec::new())
            } else {
                self.label_window(&system_prompt, &window_text, window, total)
                    .await?
            };

            let outcome = match labeling {
                WindowLabeling::Labeled(labels) => {
                    let cuts = self.emit_labels(&mut emitter, labels, window, &lengths);
                    info!(window = window.index, span_start = window.start(), cuts, "Window labeled");
                    WindowOutcome::Labeled { cuts }
                }
                WindowLabeling::Failed(reason) => {
                    let cuts = emitter.emit_fallback(&window_text, window, &lengths);
                    warn!(
                        window = window.index,
                        span_start = window.start(),
                        cuts,
                        reason = %reason,
                        "Oracle output unusable, fell back to deterministic split"
                    );
                    WindowOutcome::Fallback { cuts, reason }
                }
            };

            if let Some(sink) = &self.progress {
                sink.window_finished(&WindowProgress {
                    completed: window.index + 1,
                    total,
                    window: window.index,
                    outcome,
                });
            }
        }

        let cuts = emitter.into_cuts();
        info!(cuts = cuts.len(), "Cut assembly finished");
        Ok(cuts)
    }

    /// Call the oracle for one window and parse its answer.
    ///
    /// Returns an error only for a credential rejection.
    #[instrument(skip(self, system_prompt, window_text), fields(window = window.index))]
    pub async fn label_window(
        &self,
        system_prompt: &str,
        window_text: &str,
        window: &Window,
        total: usize,
    ) -> KomawariResult<WindowLabeling> {
        let request = label_request(
            system_prompt,
            window_text,
            self.style_hint.as_deref(),
            self.glossary.as_deref(),
        );

        let response = match self.oracle.complete(&request).await {
            Ok(response) => response,
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Oracle rejected credentials, aborting run");
                return Err(PipelineError::new(PipelineErrorKind::Aborted {
                    window: window.index + 1,
                    total,
                    reason: e.to_string(),
                })
                .into());
            }
            Err(e) => {
                return Ok(WindowLabeling::Failed(FallbackReason::CallFailed(
                    e.to_string(),
                )));
            }
        };

        let Some(records) = parse_array(response.text()) else {
            return Ok(WindowLabeling::Failed(FallbackReason::ParseFailed));
        };

        let labels: Vec<OracleLabel> = records
            .iter()
            .filter_map(OracleLabel::from_value)
            .filter(|label| !label.text.trim().is_empty())
            .collect();
        debug!(records = records.len(), usable = labels.len(), "Parsed oracle records");

        if labels.is_empty() {
            Ok(WindowLabeling::Failed(FallbackReason::Empty))
        } else {
            Ok(WindowLabeling::Labeled(labels))
        }
    }

    fn emit_labels(
        &self,
        emitter: &mut CutEmitter,
        labels: Vec<OracleLabel>,
        window: &Window,
        lengths: &CutLengths,
    ) -> usize {
        let mut emitted = 0;
        for label in labels {
            let text = truncate_chars(label.text.trim(), *lengths.hard_max());
            if text.is_empty() {
                continue;
            }
            let text_len = text.chars().count();
            let span = reconcile_span(label.span_start, label.span_end, text_len, window);
            let cut_labels = cut_labels(&label, self.roster.as_ref());
            emitter.emit(text, cut_labels, span);
            emitted += 1;
        }
        emitted
    }
}

/// Segment the whole source with the fallback splitter, window by window,
/// without consulting any oracle.
///
/// # Examples
///
/// ```
/// use komawari_core::{SegmentationConfig, SourceText};
/// use komawari_pipeline::assemble_offline;
///
/// let source = SourceText::new("夜の駅。汽車が来た。");
/// let cuts = assemble_offline(&source, &SegmentationConfig::default()).unwrap();
/// assert_eq!(cuts.len(), 1);
/// assert_eq!(cuts[0].text(), "夜の駅。汽車が来た。");
/// ```
#[instrument(skip_all, fields(len = source.len()))]
pub fn assemble_offline(
    source: &SourceText,
    segmentation: &SegmentationConfig,
) -> KomawariResult<Vec<Cut>> {
    segmentation.validate()?;
    if source.is_blank() {
        return Ok(Vec::new());
    }
    let windows = split_windows(source, *segmentation.window_size(), *segmentation.overlap())?;
    let lengths = segmentation.lengths();

    let mut emitter = CutEmitter::new();
    for window in &windows {
        let window_text = source.slice(window.span);
        emitter.emit_fallback(&window_text, window, &lengths);
    }
    let cuts = emitter.into_cuts();
    info!(windows = windows.len(), cuts = cuts.len(), "Offline segmentation finished");
    Ok(cuts)
}

/// Canonical labels for one oracle record.
fn cut_labels(label: &OracleLabel, roster: Option<&Roster>) -> CutLabels {
    let location = non_blank(label.location.as_deref());
    let scene = non_blank(label.scene.as_deref());

    CutLabels {
        kind: label
            .kind
            .as_deref()
            .map(CutKind::parse_lenient)
            .unwrap_or_default(),
        speakers: normalize_speakers(&label.speakers, roster),
        time: label
            .time
            .as_deref()
            .map(TimeTag::parse_lenient)
            .unwrap_or_default(),
        location: location.clone().or_else(|| scene.clone()).unwrap_or_default(),
        scene: scene.or(location).unwrap_or_default(),
        tone: non_blank(label.tone.as_deref()).unwrap_or_else(|| "neutral".to_string()),
        emotion: non_blank(label.emotion.as_deref()).unwrap_or_else(|| "neutral".to_string()),
        action: non_blank(label.action.as_deref()).unwrap_or_default(),
        entities: unique_names(&label.entities),
    }
}

/// Trimmed non-blank names, deduplicated by [`normalize_name`] with the
/// first-seen spelling kept.
fn unique_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty() && seen.insert(normalize_name(name)))
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First `max_chars` characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_chars("銀河鉄道の夜", 2), "銀河");
        assert_eq!(truncate_chars("ab", 5), "ab");
    }

    #[test]
    fn test_location_and_scene_default_to_each_other() {
        let label = OracleLabel {
            location: Some("station".into()),
            ..OracleLabel::default()
        };
        let labels = cut_labels(&label, None);
        assert_eq!(labels.location, "station");
        assert_eq!(labels.scene, "station");
        assert_eq!(labels.tone, "neutral");
        assert_eq!(labels.kind, CutKind::Unknown);
    }

    #[test]
    fn test_blank_fields_use_defaults() {
        let label = OracleLabel {
            kind: Some("Dialogue".into()),
            emotion: Some("  ".into()),
            entities: vec![" ".into(), "Lamp".into()],
            ..OracleLabel::default()
        };
        let labels = cut_labels(&label, None);
        assert_eq!(labels.kind, CutKind::Dialogue);
        assert_eq!(labels.emotion, "neutral");
        assert_eq!(labels.entities, vec!["Lamp"]);
    }

    #[test]
    fn test_entities_are_unique() {
        let names: Vec<String> = ["Alice", " Alice", "alice", "Bob"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(unique_names(&names), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_emitter_numbers_sequentially() {
        let mut emitter = CutEmitter::new();
        let window = Window::new(0, 0, 20);
        let lengths = CutLengths::from_target(80);
        emitter.emit("a".into(), CutLabels::default(), Span::new(0, 1));
        emitter.emit_fallback("b。c", &window, &lengths);
        let ids: Vec<_> = emitter.into_cuts().iter().map(|c| c.id().to_string()).collect();
        assert_eq!(ids, vec!["c0001", "c0002"]);
    }
}

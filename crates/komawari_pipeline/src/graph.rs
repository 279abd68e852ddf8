//! Relationship extraction loop over the whole source.

use crate::{RelationshipReducer, graph_request, parse_object, split_windows};
use komawari_core::{CharacterExtraction, CharacterGraph, SourceText, Window};
use komawari_error::{KomawariResult, PipelineError, PipelineErrorKind};
use komawari_interface::Oracle;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

const DEFAULT_WINDOW_SIZE: usize = 2000;
const DEFAULT_OVERLAP: usize = 150;

/// Builds a character graph by asking the oracle about each window and
/// reducing the answers.
///
/// Windows whose call fails or whose answer cannot be parsed are skipped.
/// A credential rejection aborts.
pub struct GraphExtractor<O: Oracle> {
    oracle: O,
    window_size: usize,
    overlap: usize,
}

impl<O: Oracle> GraphExtractor<O> {
    /// Extractor with 2000-character windows overlapping by 150.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            window_size: DEFAULT_WINDOW_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }

    /// Use different window parameters.
    pub fn with_windowing(mut self, window_size: usize, overlap: usize) -> Self {
        self.window_size = window_size;
        self.overlap = overlap;
        self
    }

    /// Extract and merge the character graph of `source`.
    ///
    /// Blank input, or input where no window produced an extraction, yields
    /// an empty graph.
    #[instrument(
        skip_all,
        fields(len = source.len(), model = self.oracle.model_name())
    )]
    pub async fn extract(&self, source: &SourceText) -> KomawariResult<CharacterGraph> {
        if source.is_blank() {
            return Ok(CharacterGraph::default());
        }
        let windows = split_windows(source, self.window_size, self.overlap)?;
        let total = windows.len();

        let mut reducer = RelationshipReducer::new();
        let mut extracted = 0;
        for window in &windows {
            let window_text = source.slice(window.span);
            if window_text.trim().is_empty() {
                continue;
            }
            let extraction = self.extract_window(&window_text, window, total).await?;
            extracted += usize::from(extraction.is_some());
            reducer.absorb_optional(extraction.as_ref());
        }

        let graph = reducer.finish();
        info!(
            windows = total,
            extracted,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Character graph extracted"
        );
        Ok(graph)
    }

    async fn extract_window(
        &self,
        window_text: &str,
        window: &Window,
        total: usize,
    ) -> KomawariResult<Option<CharacterExtraction>> {
        match self.oracle.complete(&graph_request(window_text)).await {
            Ok(response) => {
                let extraction = parse_object(response.text())
                    .map(|object| CharacterExtraction::from_value(&Value::Object(object)));
                if extraction.is_none() {
                    warn!(window = window.index, "Relationship response could not be parsed");
                }
                Ok(extraction)
            }
            Err(e) if e.is_fatal() => {
                error!(window = window.index, error = %e, "Oracle rejected credentials, aborting");
                Err(PipelineError::new(PipelineErrorKind::Aborted {
                    window: window.index + 1,
                    total,
                    reason: e.to_string(),
                })
                .into())
            }
            Err(e) => {
                warn!(window = window.index, error = %e, "Relationship call failed, skipping window");
                Ok(None)
            }
        }
    }
}

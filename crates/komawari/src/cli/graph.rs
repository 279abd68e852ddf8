//! `graph` command handler.

use super::GraphFormat;
use komawari::{
    ChatCompletionsOracle, GraphExtractor, JsonError, KomawariConfig, KomawariResult, read_source,
    write_output,
};
use std::path::Path;

/// Extract the character graph of `input` and write it as DOT or JSON.
pub async fn run_graph(
    input: &Path,
    format: GraphFormat,
    output: Option<&Path>,
    config: &KomawariConfig,
) -> KomawariResult<()> {
    let source = read_source(input)?;
    let oracle = ChatCompletionsOracle::from_config(config.oracle())?;
    let segmentation = config.segmentation();
    let graph = GraphExtractor::new(oracle)
        .with_windowing(*segmentation.window_size(), *segmentation.overlap())
        .extract(&source)
        .await?;

    let rendered = match format {
        GraphFormat::Dot => graph.to_dot(),
        GraphFormat::Json => {
            serde_json::to_string_pretty(&graph).map_err(|e| JsonError::new(e.to_string()))?
        }
    };
    write_output(output, &rendered)
}

//! `cut` command handler.

use super::CutArgs;
use komawari::{
    ChatCompletionsOracle, CutAssembler, GlossaryEntry, JsonError, KomawariConfig, KomawariResult,
    Roster, SegmentationConfig, WindowProgress, assemble_offline, character_glossary, read_json,
    read_source, write_output,
};
use tracing::info;

/// Configured segmentation with command-line overrides applied.
pub fn segmentation_for(args: &CutArgs, configured: &SegmentationConfig) -> SegmentationConfig {
    let mut segmentation = configured.clone();
    if let Some(window) = args.window {
        segmentation = segmentation.with_window_size(window);
    }
    if let Some(overlap) = args.overlap {
        segmentation = segmentation.with_overlap(overlap);
    }
    if let Some(target) = args.target {
        segmentation = segmentation.with_target_length(target);
    }
    segmentation
}

/// Split the input into cuts and write them as JSON.
pub async fn run_cut(args: &CutArgs, config: &KomawariConfig) -> KomawariResult<()> {
    let segmentation = segmentation_for(args, config.segmentation());
    segmentation.validate()?;
    let source = read_source(&args.input)?;

    let cuts = if args.offline {
        assemble_offline(&source, &segmentation)?
    } else {
        let oracle = ChatCompletionsOracle::from_config(config.oracle())?;
        let mut assembler =
            CutAssembler::new(oracle, segmentation).with_progress(|p: &WindowProgress| {
                info!(
                    completed = p.completed,
                    total = p.total,
                    cuts = p.outcome.cuts(),
                    fallback = p.outcome.is_fallback(),
                    "Window finished"
                );
            });

        if let Some(hint) = &args.style_hint {
            assembler = assembler.with_style_hint(hint.clone());
        }
        if let Some(path) = &args.glossary {
            let entries: Vec<GlossaryEntry> = read_json(path)?;
            assembler = assembler.with_glossary(character_glossary(&entries));
            if args.roster.is_none() {
                assembler = assembler.with_roster(Roster::from(entries.as_slice()));
            }
        }
        if let Some(path) = &args.roster {
            let names: Vec<String> = read_json(path)?;
            assembler = assembler.with_roster(Roster::new(names));
        }
        assembler.assemble(&source).await?
    };

    info!(cuts = cuts.len(), "Writing cuts");
    let json = serde_json::to_string_pretty(&cuts).map_err(|e| JsonError::new(e.to_string()))?;
    write_output(args.output.as_deref(), &json)
}

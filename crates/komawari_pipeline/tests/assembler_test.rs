mod test_utils;

use komawari_core::{
    CutKind, FallbackReason, SegmentationConfig, SourceText, Span, WindowOutcome, WindowProgress,
};
use komawari_error::OracleErrorKind;
use komawari_pipeline::{CutAssembler, Roster, assemble_offline};
use serde_json::json;
use std::sync::{Arc, Mutex};
use test_utils::{MockOracle, MockResponse, five_hundred_chars, repeat_char};

fn small_windows() -> SegmentationConfig {
    SegmentationConfig::new(300, 50, 150)
}

fn first_window_labels() -> String {
    json!([
        {
            "text": repeat_char('あ', 100),
            "type": "narration",
            "time": "present",
            "source_local_span": {"start": 0, "end": 100}
        },
        {
            "text": repeat_char('あ', 160),
            "type": "dialogue",
            "speaker": "Giovanni",
            "source_local_span": {"start": 100, "end": 260}
        }
    ])
    .to_string()
}

#[tokio::test]
async fn malformed_second_window_falls_back() {
    let oracle = MockOracle::new_sequence(vec![
        MockResponse::Success(first_window_labels()),
        MockResponse::Success("Sorry, I can't split this chunk.".to_string()),
    ]);
    let assembler = CutAssembler::new(oracle.clone(), small_windows());
    let source = SourceText::new(five_hundred_chars());

    let cuts = assembler.assemble(&source).await.unwrap();
    assert_eq!(oracle.call_count(), 2);
    assert_eq!(cuts.len(), 4);

    assert_eq!(cuts[0].kind(), CutKind::Narration);
    assert_eq!(*cuts[0].span(), Span::new(0, 100));
    assert_eq!(cuts[1].kind(), CutKind::Dialogue);
    assert_eq!(cuts[1].speaker(), "Giovanni");
    assert_eq!(*cuts[1].span(), Span::new(100, 260));

    let fallback = &cuts[2..];
    for cut in fallback {
        assert_eq!(cut.kind(), CutKind::Narration);
        assert_eq!(cut.speaker(), "unknown");
        assert!(cut.speakers().is_empty());
    }
    // Together the fallback cuts span exactly the second window [210, 500).
    assert_eq!(fallback[0].span().start, 210);
    assert_eq!(fallback[0].span().end, fallback[1].span().start);
    assert_eq!(fallback[1].span().end, 500);
    let rebuilt: String = fallback.iter().map(|c| source.slice(*c.span())).collect();
    assert_eq!(rebuilt, source.slice(Span::new(210, 500)));
}

#[tokio::test]
async fn ids_increase_without_gaps() {
    let text = "静かな夜だった。".repeat(300);
    let oracle = MockOracle::new_success(
        json!([
            {"text": "静かな夜だった。", "source_local_span": {"start": 0, "end": 8}},
            {"text": "静かな夜だった。", "source_local_span": {"start": 8, "end": 16}}
        ])
        .to_string(),
    );
    let assembler = CutAssembler::new(oracle.clone(), SegmentationConfig::new(500, 50, 100));
    let cuts = assembler.assemble(&SourceText::new(text)).await.unwrap();

    assert_eq!(cuts.len(), oracle.call_count() * 2);
    for (i, cut) in cuts.iter().enumerate() {
        assert_eq!(cut.id().sequence(), i as u32 + 1);
        assert_eq!(cut.checksum(), &komawari_core::content_checksum(cut.text()));
    }
}

#[tokio::test]
async fn credential_rejection_aborts_the_run() {
    let oracle = MockOracle::new_sequence(vec![
        MockResponse::Success(first_window_labels()),
        MockResponse::Error(OracleErrorKind::Unauthorized {
            status_code: 401,
            message: "invalid api key".to_string(),
        }),
    ]);
    let assembler = CutAssembler::new(oracle.clone(), small_windows());

    let err = assembler
        .assemble(&SourceText::new(five_hundred_chars()))
        .await
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("window 2 of 2"));
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn transient_failures_fall_back_per_window() {
    let oracle = MockOracle::new_sequence(vec![
        MockResponse::Error(OracleErrorKind::Timeout(120)),
        MockResponse::Success(first_window_labels()),
    ]);
    let assembler = CutAssembler::new(oracle, small_windows());
    let cuts = assembler
        .assemble(&SourceText::new(five_hundred_chars()))
        .await
        .unwrap();

    // Window 1 [0, 260) fell back; window 2 used the oracle labels.
    assert!(cuts.iter().any(|c| c.span().start == 0 && c.speaker() == "unknown"));
    assert!(cuts.iter().any(|c| c.speaker() == "Giovanni"));
    for cut in &cuts {
        assert!(cut.span().end <= 500);
    }
}

#[tokio::test]
async fn empty_or_textless_arrays_fall_back() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let oracle = MockOracle::new_sequence(vec![
        MockResponse::Success("[]".to_string()),
        MockResponse::Success(json!([{"text": "  "}, {"type": "sfx"}]).to_string()),
    ]);
    let assembler = CutAssembler::new(oracle, small_windows()).with_progress(tx);
    let cuts = assembler
        .assemble(&SourceText::new(five_hundred_chars()))
        .await
        .unwrap();
    assert!(cuts.iter().all(|c| c.kind() == CutKind::Narration));

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert!(matches!(
        first.outcome,
        WindowOutcome::Fallback { reason: FallbackReason::Empty, .. }
    ));
    assert!(matches!(
        second.outcome,
        WindowOutcome::Fallback { reason: FallbackReason::Empty, .. }
    ));
    assert_eq!((second.completed, second.total), (2, 2));
}

#[tokio::test]
async fn progress_closure_sees_every_window() {
    let seen: Arc<Mutex<Vec<WindowProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = seen.clone();
        move |p: &WindowProgress| seen.lock().unwrap().push(p.clone())
    };
    let oracle = MockOracle::new_success("not json at all");
    let assembler = CutAssembler::new(oracle, small_windows()).with_progress(sink);
    assembler
        .assemble(&SourceText::new(five_hundred_chars()))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].window, 0);
    assert_eq!(seen[1].ratio(), 1.0);
    assert!(seen.iter().all(|p| p.outcome.is_fallback()));
    assert!(matches!(
        seen[0].outcome,
        WindowOutcome::Fallback { reason: FallbackReason::ParseFailed, .. }
    ));
}

#[tokio::test]
async fn long_texts_are_truncated_to_hard_max() {
    let oracle = MockOracle::new_success(
        json!([{"text": repeat_char('x', 400), "source_local_span": {"start": 0, "end": 400}}])
            .to_string(),
    );
    let assembler = CutAssembler::new(oracle, SegmentationConfig::new(2000, 150, 150));
    let cuts = assembler
        .assemble(&SourceText::new(repeat_char('x', 500)))
        .await
        .unwrap();
    assert_eq!(cuts[0].text().chars().count(), 240);
    assert_eq!(*cuts[0].span(), Span::new(0, 400));
}

#[tokio::test]
async fn speakers_are_normalized_and_canonicalized() {
    let oracle = MockOracle::new_success(
        json!([{
            "text": "「行こう」",
            "type": "Dialogue",
            "speakers": ["ジョバンニくん", " ジョバンニ ", "", "unknown", "カムパネルラ"],
            "local_span": {"start": 0, "end": 5}
        }])
        .to_string(),
    );
    let assembler = CutAssembler::new(oracle, SegmentationConfig::default())
        .with_roster(Roster::new(["ジョバンニ", "カムパネルラ"]));
    let cuts = assembler
        .assemble(&SourceText::new("「行こう」とジョバンニが言った。"))
        .await
        .unwrap();
    assert_eq!(cuts[0].speakers(), ["ジョバンニ", "カムパネルラ"]);
}

#[tokio::test]
async fn entities_are_deduplicated_case_insensitively() {
    let oracle = MockOracle::new_success(
        json!([{
            "text": "Alice waved at Bob.",
            "entities": ["Alice", "Alice", "alice", " Bob ", ""],
            "local_span": {"start": 0, "end": 19}
        }])
        .to_string(),
    );
    let assembler = CutAssembler::new(oracle, SegmentationConfig::default());
    let cuts = assembler
        .assemble(&SourceText::new("Alice waved at Bob."))
        .await
        .unwrap();
    assert_eq!(cuts[0].entities(), ["Alice", "Bob"]);
}

#[tokio::test]
async fn style_hint_and_glossary_are_sent() {
    let oracle = MockOracle::new_success("[]");
    let assembler = CutAssembler::new(oracle.clone(), SegmentationConfig::default())
        .with_style_hint("hard-boiled")
        .with_glossary("Marlowe: detective");
    assembler
        .assemble(&SourceText::new("Rain fell on the city."))
        .await
        .unwrap();

    let requests = oracle.requests();
    assert_eq!(requests.len(), 1);
    let contents: Vec<_> = requests[0]
        .messages()
        .iter()
        .map(|m| m.content().clone())
        .collect();
    assert!(contents[0].contains("JSON array"));
    assert!(contents.iter().any(|c| c.contains("hard-boiled")));
    assert!(contents.iter().any(|c| c.contains("Marlowe: detective")));
    assert!(contents.last().unwrap().contains("Rain fell on the city."));
}

#[tokio::test]
async fn blank_input_makes_no_calls() {
    let oracle = MockOracle::new_success("[]");
    let assembler = CutAssembler::new(oracle.clone(), SegmentationConfig::default());
    let cuts = assembler.assemble(&SourceText::new(" \n\n ")).await.unwrap();
    assert!(cuts.is_empty());
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn invalid_segmentation_is_rejected_before_calls() {
    let oracle = MockOracle::new_success("[]");
    let assembler = CutAssembler::new(oracle.clone(), SegmentationConfig::new(100, 100, 150));
    assert!(assembler.assemble(&SourceText::new("text")).await.is_err());
    assert_eq!(oracle.call_count(), 0);
}

#[test]
fn offline_cuts_cover_the_source() {
    let text = "「おい」と彼は言った。\n\n　雨が降っていた、冷たい雨だった。\n".repeat(80);
    let source = SourceText::new(&text);
    let config = SegmentationConfig::new(400, 60, 80);
    let cuts = assemble_offline(&source, &config).unwrap();

    let mut covered = vec![false; source.len()];
    for cut in &cuts {
        assert_eq!(cut.kind(), CutKind::Narration);
        for flag in &mut covered[cut.span().start..cut.span().end] {
            *flag = true;
        }
    }
    for (i, c) in source.chars().iter().enumerate() {
        assert!(covered[i] || c.is_whitespace(), "offset {} not covered", i);
    }
    for (i, cut) in cuts.iter().enumerate() {
        assert_eq!(cut.id().sequence(), i as u32 + 1);
    }
}

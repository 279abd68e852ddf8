use komawari_core::{Cut, CutId, CutKind, CutLabels, Span};
use komawari_pipeline::character_brief;

fn cut(id: u32, text: &str, speakers: &[&str], entities: &[&str], start: usize) -> Cut {
    let labels = CutLabels {
        kind: CutKind::Dialogue,
        speakers: speakers.iter().map(|s| s.to_string()).collect(),
        entities: entities.iter().map(|s| s.to_string()).collect(),
        ..CutLabels::default()
    };
    let end = start + text.chars().count();
    Cut::new(CutId::new(id), text, labels, Span::new(start, end))
}

fn corpus() -> Vec<Cut> {
    vec![
        cut(1, "The train left.", &[], &["Giovanni"], 300),
        cut(2, "\"Wait!\"", &["giovanni"], &[], 100),
        cut(3, "Campanella smiled.", &[], &[], 0),
        cut(4, "Giovanni ran.", &[], &[], 200),
    ]
}

#[test]
fn matches_speakers_text_and_entities_in_source_order() {
    let brief = character_brief("Giovanni", &corpus(), 10);
    assert_eq!(brief.name(), "Giovanni");
    assert_eq!(*brief.count(), 3);
    let ids: Vec<_> = brief.cuts().iter().map(|c| c.id().sequence()).collect();
    assert_eq!(ids, vec![2, 4, 1]);
}

#[test]
fn limit_caps_cuts_but_not_count() {
    let brief = character_brief("giovanni", &corpus(), 2);
    assert_eq!(*brief.count(), 3);
    assert_eq!(brief.cuts().len(), 2);
    assert_eq!(brief.cuts()[0].span().start, 100);
}

#[test]
fn duplicate_ids_are_listed_once() {
    let mut cuts = corpus();
    cuts.push(cuts[3].clone());
    let brief = character_brief("Giovanni", &cuts, 10);
    assert_eq!(*brief.count(), 3);
}

#[test]
fn blank_or_unknown_names_match_nothing() {
    assert_eq!(*character_brief("  ", &corpus(), 10).count(), 0);
    assert!(character_brief("Zanelli", &corpus(), 10).cuts().is_empty());
}

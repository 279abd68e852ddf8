//! Character-indexed lookup over emitted cuts.

use komawari_core::Cut;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cuts that mention one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CharacterBrief {
    /// Name searched for
    name: String,
    /// Matches before the limit was applied
    count: usize,
    /// Matching cuts, sorted by span start
    cuts: Vec<Cut>,
}

/// Collect the cuts whose speakers, text or entities contain `name`
/// (case-insensitive), sorted by span start and capped at `limit`.
///
/// A blank name matches nothing.
///
/// # Examples
///
/// ```
/// use komawari_core::{Cut, CutId, CutLabels, Span};
/// use komawari_pipeline::character_brief;
///
/// let cuts = vec![
///     Cut::new(CutId::new(1), "Alice waved.", CutLabels::default(), Span::new(20, 32)),
///     Cut::new(CutId::new(2), "Nobody came.", CutLabels::default(), Span::new(0, 12)),
///     Cut::new(CutId::new(3), "ALICE!", CutLabels::default(), Span::new(5, 11)),
/// ];
/// let brief = character_brief("alice", &cuts, 10);
/// assert_eq!(*brief.count(), 2);
/// assert_eq!(brief.cuts()[0].id().to_string(), "c0003");
/// ```
pub fn character_brief(name: &str, cuts: &[Cut], limit: usize) -> CharacterBrief {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return CharacterBrief {
            name: name.trim().to_string(),
            count: 0,
            cuts: Vec::new(),
        };
    }

    let mut seen = HashSet::new();
    let mut hits: Vec<&Cut> = cuts
        .iter()
        .filter(|cut| mentions(cut, &needle))
        .filter(|cut| seen.insert(*cut.id()))
        .collect();
    hits.sort_by_key(|cut| cut.span().start);

    CharacterBrief {
        name: name.trim().to_string(),
        count: hits.len(),
        cuts: hits.into_iter().take(limit).cloned().collect(),
    }
}

fn mentions(cut: &Cut, needle: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(needle);
    cut.speakers().iter().any(|s| contains(s))
        || contains(cut.text())
        || cut.entities().iter().any(|e| contains(e))
}

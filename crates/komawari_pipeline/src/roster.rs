//! Speaker name canonicalization against a known character roster.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Known character names, matched loosely against oracle-reported speakers.
///
/// # Examples
///
/// ```
/// use komawari_pipeline::Roster;
///
/// let roster = Roster::new(["ジョバンニ", "Campanella"]);
/// assert_eq!(roster.canonicalize("campanella"), "Campanella");
/// assert_eq!(roster.canonicalize("ジョバンニくん"), "ジョバンニ");
/// assert_eq!(roster.canonicalize(" 先生 "), "先生");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    /// (normalized key, canonical name), in roster order
    names: Vec<(String, String)>,
}

impl Roster {
    /// Build a roster. Blank names are ignored; the first of several names
    /// with the same key wins.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .filter_map(|name| {
                let canonical = name.as_ref().trim().to_string();
                let key = normalize_name(&canonical);
                (!key.is_empty() && seen.insert(key.clone())).then_some((key, canonical))
            })
            .collect();
        Self { names }
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the roster has no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Map a reported speaker to a roster name.
    ///
    /// Exact match on the normalized form first, then containment in either
    /// direction (so honorifics and partial names resolve), else the trimmed
    /// input unchanged.
    pub fn canonicalize(&self, speaker: &str) -> String {
        let key = normalize_name(speaker);
        if key.is_empty() {
            return speaker.trim().to_string();
        }
        if let Some((_, canonical)) = self.names.iter().find(|(k, _)| *k == key) {
            return canonical.clone();
        }
        self.names
            .iter()
            .find(|(k, _)| key.contains(k.as_str()) || k.contains(key.as_str()))
            .map(|(_, canonical)| canonical.clone())
            .unwrap_or_else(|| speaker.trim().to_string())
    }
}

/// Lowercase with all whitespace removed.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Clean an oracle speaker list.
///
/// Names are trimmed and, with a roster, canonicalized. Empty names and
/// `"unknown"` are dropped; duplicates (by [`normalize_name`]) keep their
/// first-seen spelling.
///
/// # Examples
///
/// ```
/// use komawari_pipeline::normalize_speakers;
///
/// let raw = vec![" Alice ".to_string(), "alice".to_string(), "".to_string(), "Bob".to_string()];
/// assert_eq!(normalize_speakers(&raw, None), vec!["Alice", "Bob"]);
/// ```
pub fn normalize_speakers(raw: &[String], roster: Option<&Roster>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .filter_map(|name| {
            let name = match roster {
                Some(roster) => roster.canonicalize(name),
                None => name.trim().to_string(),
            };
            let key = normalize_name(&name);
            let keep = !key.is_empty() && key != "unknown" && seen.insert(key);
            keep.then_some(name)
        })
        .collect()
}

/// A character known ahead of time, used as glossary context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    /// Character name
    #[serde(alias = "Name")]
    pub name: String,
    /// Role or notes
    #[serde(default, alias = "Details", alias = "role", alias = "Role")]
    pub details: String,
}

/// Render glossary entries as `name: details` lines.
///
/// Entries without a name are skipped; entries without details render as
/// the bare name.
///
/// # Examples
///
/// ```
/// use komawari_pipeline::{GlossaryEntry, character_glossary};
///
/// let entries = vec![
///     GlossaryEntry { name: "ジョバンニ".into(), details: "主人公".into() },
///     GlossaryEntry { name: "カムパネルラ".into(), details: String::new() },
/// ];
/// assert_eq!(character_glossary(&entries), "ジョバンニ: 主人公\nカムパネルラ");
/// ```
pub fn character_glossary(entries: &[GlossaryEntry]) -> String {
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.name.trim();
            if name.is_empty() {
                return None;
            }
            let details = entry.details.trim();
            Some(if details.is_empty() {
                name.to_string()
            } else {
                format!("{}: {}", name, details)
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<&[GlossaryEntry]> for Roster {
    fn from(entries: &[GlossaryEntry]) -> Self {
        Roster::new(entries.iter().map(|e| e.name.as_str()))
    }
}

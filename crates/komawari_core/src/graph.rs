//! Character relationship graph types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Label used when the oracle reports a relationship without one.
pub const DEFAULT_RELATIONSHIP_LABEL: &str = "related";

/// A character mentioned in one window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterMention {
    /// Display name
    pub name: String,
    /// Description, possibly empty
    pub description: String,
}

/// A directed relationship mentioned in one window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationshipMention {
    /// Name of the character the relationship starts from
    pub source: String,
    /// Name of the character the relationship points to
    pub target: String,
    /// Relationship label
    pub label: String,
}

/// Characters and relationships extracted from a single window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterExtraction {
    /// Characters mentioned
    pub characters: Vec<CharacterMention>,
    /// Relationships mentioned
    pub relationships: Vec<RelationshipMention>,
}

impl CharacterExtraction {
    /// Extract from the oracle's JSON object, field by field.
    ///
    /// Entries without a name (or without both endpoints) are dropped;
    /// a missing relationship label becomes `"related"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use komawari_core::CharacterExtraction;
    /// use serde_json::json;
    ///
    /// let extraction = CharacterExtraction::from_value(&json!({
    ///     "characters": [{"name": "ジョバンニ", "description": "少年"}, {"description": "nameless"}],
    ///     "relationships": [{"source": "ジョバンニ", "target": "カムパネルラ"}]
    /// }));
    /// assert_eq!(extraction.characters.len(), 1);
    /// assert_eq!(extraction.relationships[0].label, "related");
    /// ```
    pub fn from_value(value: &Value) -> Self {
        let characters = array(value, "characters")
            .filter_map(|item| {
                let name = text(item, "name")?;
                Some(CharacterMention {
                    name,
                    description: text(item, "description").unwrap_or_default(),
                })
            })
            .collect();

        let relationships = array(value, "relationships")
            .filter_map(|item| {
                let source = text(item, "source")?;
                let target = text(item, "target")?;
                let label = text(item, "label")
                    .unwrap_or_else(|| DEFAULT_RELATIONSHIP_LABEL.to_string());
                Some(RelationshipMention {
                    source,
                    target,
                    label,
                })
            })
            .collect();

        Self {
            characters,
            relationships,
        }
    }

    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.relationships.is_empty()
    }
}

fn array<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

/// Trimmed, non-empty string field.
fn text(value: &Value, key: &str) -> Option<String> {
    let s = value.get(key)?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// A character in the merged graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterNode {
    /// Display name (first-seen casing)
    pub name: String,
    /// Longest description seen
    pub description: String,
}

/// A directed edge with every label reported for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Start node name
    pub source: String,
    /// End node name
    pub target: String,
    /// Merged labels
    pub labels: BTreeSet<String>,
}

/// Merged character graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterGraph {
    /// Nodes sorted by name
    pub nodes: Vec<CharacterNode>,
    /// Edges in first-seen order
    pub edges: Vec<RelationshipEdge>,
}

impl CharacterGraph {
    /// Whether the graph has neither nodes nor edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Render as a Graphviz DOT digraph.
    ///
    /// Labels of an edge are joined with `" / "`.
    ///
    /// # Examples
    ///
    /// ```
    /// use komawari_core::{CharacterGraph, CharacterNode, RelationshipEdge};
    ///
    /// let graph = CharacterGraph {
    ///     nodes: vec![
    ///         CharacterNode { name: "A".into(), description: String::new() },
    ///         CharacterNode { name: "B".into(), description: String::new() },
    ///     ],
    ///     edges: vec![RelationshipEdge {
    ///         source: "A".into(),
    ///         target: "B".into(),
    ///         labels: ["friend".to_string(), "rival".to_string()].into(),
    ///     }],
    /// };
    /// assert!(graph.to_dot().contains("\"A\" -> \"B\" [label=\"friend / rival\"];"));
    /// ```
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph characters {\n");
        for node in &self.nodes {
            if node.description.is_empty() {
                out.push_str(&format!("  \"{}\";\n", escape(&node.name)));
            } else {
                out.push_str(&format!(
                    "  \"{}\" [tooltip=\"{}\"];\n",
                    escape(&node.name),
                    escape(&node.description)
                ));
            }
        }
        for edge in &self.edges {
            let label = edge
                .labels
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" / ");
            out.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                escape(&edge.source),
                escape(&edge.target),
                escape(&label)
            ));
        }
        out.push_str("}\n");
        out
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

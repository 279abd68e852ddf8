//! Merging per-window character extractions into one graph.

use komawari_core::{
    CharacterExtraction, CharacterGraph, CharacterNode, DEFAULT_RELATIONSHIP_LABEL,
    RelationshipEdge,
};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Accumulates extractions window by window.
///
/// Names are matched case-insensitively; the first-seen spelling is kept
/// for display. Each character keeps the longest description reported for
/// it. Self-relationships are dropped.
///
/// # Examples
///
/// ```
/// use komawari_core::{CharacterExtraction, RelationshipMention};
/// use komawari_pipeline::RelationshipReducer;
///
/// let window = |label: &str| CharacterExtraction {
///     characters: Vec::new(),
///     relationships: vec![RelationshipMention {
///         source: "A".into(),
///         target: "B".into(),
///         label: label.into(),
///     }],
/// };
///
/// let mut reducer = RelationshipReducer::new();
/// reducer.absorb(&window("friend"));
/// reducer.absorb(&window("rival"));
/// let graph = reducer.finish();
/// assert_eq!(graph.edges.len(), 1);
/// assert_eq!(graph.edges[0].labels.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RelationshipReducer {
    nodes: Vec<CharacterNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<(String, String, BTreeSet<String>)>,
    edge_index: HashMap<(String, String), usize>,
}

impl RelationshipReducer {
    /// Empty reducer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one window's extraction.
    pub fn absorb(&mut self, extraction: &CharacterExtraction) {
        for character in &extraction.characters {
            self.touch_node(&character.name, &character.description);
        }

        for relationship in &extraction.relationships {
            let source = relationship.source.trim();
            let target = relationship.target.trim();
            if source.is_empty() || target.is_empty() {
                continue;
            }
            let source_key = name_key(source);
            let target_key = name_key(target);
            if source_key == target_key {
                debug!(name = source, "Dropping self-relationship");
                continue;
            }

            self.touch_node(source, "");
            self.touch_node(target, "");

            let label = match relationship.label.trim() {
                "" => DEFAULT_RELATIONSHIP_LABEL,
                label => label,
            };
            let key = (source_key, target_key);
            let index = match self.edge_index.get(&key) {
                Some(index) => *index,
                None => {
                    self.edges
                        .push((key.0.clone(), key.1.clone(), BTreeSet::new()));
                    self.edge_index.insert(key, self.edges.len() - 1);
                    self.edges.len() - 1
                }
            };
            self.edges[index].2.insert(label.to_string());
        }
    }

    /// Merge an extraction that may have failed.
    pub fn absorb_optional(&mut self, extraction: Option<&CharacterExtraction>) {
        if let Some(extraction) = extraction {
            self.absorb(extraction);
        }
    }

    /// Produce the graph: nodes sorted by name, edges in first-seen order.
    pub fn finish(self) -> CharacterGraph {
        let display = |key: &str| {
            self.node_index
                .get(key)
                .map(|i| self.nodes[*i].name.clone())
                .unwrap_or_else(|| key.to_string())
        };
        let edges = self
            .edges
            .iter()
            .map(|(source, target, labels)| RelationshipEdge {
                source: display(source),
                target: display(target),
                labels: labels.clone(),
            })
            .collect();

        let mut nodes = self.nodes.clone();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        CharacterGraph { nodes, edges }
    }

    fn touch_node(&mut self, name: &str, description: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let description = description.trim();
        let key = name_key(name);
        match self.node_index.get(&key) {
            Some(index) => {
                let node = &mut self.nodes[*index];
                if description.chars().count() > node.description.chars().count() {
                    node.description = description.to_string();
                }
            }
            None => {
                self.nodes.push(CharacterNode {
                    name: name.to_string(),
                    description: description.to_string(),
                });
                self.node_index.insert(key, self.nodes.len() - 1);
            }
        }
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Reduce a sequence of per-window extractions; failed windows (`None`)
/// are skipped.
pub fn reduce<I>(extractions: I) -> CharacterGraph
where
    I: IntoIterator<Item = Option<CharacterExtraction>>,
{
    let mut reducer = RelationshipReducer::new();
    for extraction in extractions {
        reducer.absorb_optional(extraction.as_ref());
    }
    reducer.finish()
}

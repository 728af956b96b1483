//! Root resolver: picks where the generation traversal starts.

use serde::Serialize;
use tracing::{debug, warn};

use super::family::FamilyGraph;
use super::node::PersonId;

/// How the root was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RootSource {
    /// No people; the root identifier is empty.
    #[default]
    Empty,
    /// The first person, in input order, with no recorded parents.
    Parentless,
    /// Fallback: nobody is parentless; lowest generation hint wins.
    GenerationHint,
    /// Fallback: nobody is parentless and nobody has a hint.
    FirstRecord,
}

/// Result of root resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootSelection {
    /// The traversal root; empty means "no data".
    pub root_id: PersonId,
    pub source: RootSource,
    /// Every parentless person in input order (the forest roots).
    pub candidates: Vec<PersonId>,
}

impl RootSelection {
    /// Whether the root came from a fallback rule.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self.source,
            RootSource::GenerationHint | RootSource::FirstRecord
        )
    }

    /// Whether there is no root at all.
    pub fn is_empty(&self) -> bool {
        self.root_id.is_empty()
    }
}

/// Choose the root of the family graph.
///
/// A person is a root candidate when they carry no parent identifiers at
/// all; a dangling parent reference still counts as a parent. The first
/// candidate in input order becomes the root. Without candidates, the
/// person with the numerically lowest generation hint is chosen (first in
/// input order on ties), and without hints the first person is.
pub fn resolve_root(graph: &FamilyGraph) -> RootSelection {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return RootSelection::default();
    }

    let candidates: Vec<PersonId> = nodes
        .iter()
        .filter(|n| !n.has_parents())
        .map(|n| n.id.clone())
        .collect();

    let selection = if let Some(first) = candidates.first() {
        RootSelection {
            root_id: first.clone(),
            source: RootSource::Parentless,
            candidates,
        }
    } else if let Some(hinted) = nodes
        .iter()
        .filter_map(|n| n.generation_hint.map(|g| (g, n)))
        .min_by_key(|&(g, _)| g)
    {
        RootSelection {
            root_id: hinted.1.id.clone(),
            source: RootSource::GenerationHint,
            candidates,
        }
    } else {
        RootSelection {
            root_id: nodes[0].id.clone(),
            source: RootSource::FirstRecord,
            candidates,
        }
    };

    if selection.is_fallback() {
        warn!(
            root = %selection.root_id,
            source = ?selection.source,
            "no parentless person, using fallback root"
        );
    } else {
        debug!(root = %selection.root_id, roots = selection.candidates.len(), "resolved root");
    }
    selection
}

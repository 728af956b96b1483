//! Structural diagnostics for a family graph.
//!
//! None of these conditions are errors. They are reported so callers can
//! tell degraded input apart from clean input by looking at the result.

use petgraph::algo::tarjan_scc;
use petgraph::unionfind::UnionFind;
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use super::edge::RelationSlot;
use super::family::FamilyGraph;
use super::generation::GenerationReport;
use super::node::PersonId;

/// A reference to an identifier that is not in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingReference {
    /// The person holding the reference.
    pub holder: PersonId,
    pub slot: RelationSlot,
    pub missing: PersonId,
}

/// Findings about one graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub dangling: Vec<DanglingReference>,
    pub duplicates: Vec<PersonId>,
    /// Groups of people that are each other's ancestors, in input order.
    pub cycles: Vec<Vec<PersonId>>,
    /// Connected components over parent and spouse links.
    pub components: usize,
    /// People the generation traversal did not reach.
    pub unreached: Vec<PersonId>,
}

impl Diagnostics {
    /// Whether the snapshot is free of every reported irregularity.
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
            && self.duplicates.is_empty()
            && self.cycles.is_empty()
            && self.unreached.is_empty()
            && self.components <= 1
    }
}

/// Inspect a graph after generation assignment.
pub fn diagnose(graph: &FamilyGraph, generations: &GenerationReport) -> Diagnostics {
    let mut diagnostics = Diagnostics {
        dangling: dangling_references(graph),
        duplicates: graph.duplicates().to_vec(),
        unreached: generations.unreached.clone(),
        ..Default::default()
    };

    let kinship = graph.kinship_graph();

    let lineage = kinship.filter_map(
        |_, &slot| Some(slot),
        |_, &kind| kind.is_lineage().then_some(kind),
    );
    for component in tarjan_scc(&lineage) {
        if component.len() < 2 {
            continue;
        }
        let mut slots: Vec<usize> = component.iter().map(|index| index.index()).collect();
        slots.sort_unstable();
        let nodes = graph.nodes();
        diagnostics
            .cycles
            .push(slots.into_iter().map(|slot| nodes[slot].id.clone()).collect());
    }
    diagnostics.cycles.sort();

    let mut sets = UnionFind::<usize>::new(graph.len());
    for edge in kinship.edge_indices() {
        if let Some((a, b)) = kinship.edge_endpoints(edge) {
            sets.union(a.index(), b.index());
        }
    }
    let labels: HashSet<usize> = sets.into_labeling().into_iter().collect();
    diagnostics.components = labels.len();

    if !diagnostics.cycles.is_empty() {
        warn!(cycles = diagnostics.cycles.len(), "lineage cycles in relation data");
    }
    if !diagnostics.dangling.is_empty() {
        warn!(count = diagnostics.dangling.len(), "references to unknown people");
    }

    diagnostics
}

fn dangling_references(graph: &FamilyGraph) -> Vec<DanglingReference> {
    let mut found = Vec::new();
    for node in graph.nodes() {
        let slots = [
            (RelationSlot::Parent, &node.parents),
            (RelationSlot::Child, &node.children),
            (RelationSlot::Spouse, &node.spouses),
        ];
        for (slot, ids) in slots {
            for id in ids.iter().filter(|id| !graph.contains(id)) {
                found.push(DanglingReference {
                    holder: node.id.clone(),
                    slot,
                    missing: id.clone(),
                });
            }
        }
    }
    found
}

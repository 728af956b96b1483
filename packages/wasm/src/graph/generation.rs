//! Generation assigner: breadth-first generation levels from the root.
//!
//! The root gets generation 1. A person dequeued at generation `g` hands
//! `g` to each unvisited spouse and `g + 1` to each unvisited child. A
//! person is stamped at most once, so the first discovery wins and cyclic
//! relation data cannot loop forever. People the traversal never reaches
//! keep their input hint, or get `DEFAULT_GENERATION`.
//!
//! The visited set is an explicit value passed through the traversal, never
//! module state.

use std::collections::{HashSet, VecDeque};
use tracing::debug;

use super::family::FamilyGraph;
use super::node::{DEFAULT_GENERATION, GenerationSource, PersonId};

/// Generation of the root person.
pub const ROOT_GENERATION: i32 = 1;

/// Slots already stamped by a traversal.
pub type Visited = HashSet<usize>;

/// What the assigner did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// People stamped by the traversal, in breadth-first order.
    pub reached: Vec<PersonId>,
    /// People the traversal never reached, in input order.
    pub unreached: Vec<PersonId>,
}

/// Assign a final generation to every person.
///
/// Returns a new graph; relation lists are not touched.
pub fn assign_generations(graph: &FamilyGraph) -> (FamilyGraph, GenerationReport) {
    let mut visited = Visited::with_capacity(graph.len());
    let stamps = match graph.slot(graph.root_id()) {
        Some(root) => traverse(graph, root, &mut visited),
        None => Vec::new(),
    };

    let mut nodes = graph.nodes().to_vec();
    let mut report = GenerationReport::default();

    for &(slot, generation) in &stamps {
        let node = &mut nodes[slot];
        node.generation = generation;
        node.generation_source = GenerationSource::Traversal;
        report.reached.push(node.id.clone());
    }

    for (slot, node) in nodes.iter_mut().enumerate() {
        if visited.contains(&slot) {
            continue;
        }
        match node.generation_hint {
            Some(hint) => {
                node.generation = hint;
                node.generation_source = GenerationSource::Hint;
            }
            None => {
                node.generation = DEFAULT_GENERATION;
                node.generation_source = GenerationSource::Default;
            }
        }
        report.unreached.push(node.id.clone());
    }

    debug!(
        reached = report.reached.len(),
        unreached = report.unreached.len(),
        "assigned generations"
    );

    (graph.with_nodes(nodes), report)
}

/// Breadth-first walk from `root`, returning `(slot, generation)` stamps in
/// visiting order. Slots already in `visited` are never stamped, and every
/// stamped slot is added to it.
pub fn traverse(graph: &FamilyGraph, root: usize, visited: &mut Visited) -> Vec<(usize, i32)> {
    let mut stamps = Vec::new();
    if !visited.insert(root) {
        return stamps;
    }

    let nodes = graph.nodes();
    let mut queue = VecDeque::from([(root, ROOT_GENERATION)]);

    while let Some((slot, generation)) = queue.pop_front() {
        stamps.push((slot, generation));
        let node = &nodes[slot];

        for spouse in &node.spouses {
            if let Some(next) = graph.slot(spouse) {
                if visited.insert(next) {
                    queue.push_back((next, generation));
                }
            }
        }
        for child in &node.children {
            if let Some(next) = graph.slot(child) {
                if visited.insert(next) {
                    queue.push_back((next, generation + 1));
                }
            }
        }
    }

    stamps
}

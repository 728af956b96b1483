//! FamilyGraph - the kinship graph for one record snapshot.
//!
//! Nodes are kept in input order (first occurrence of each identifier) and
//! looked up through an identifier map. Relations live on the nodes as
//! identifier lists; a petgraph `StableGraph` view can be derived on demand
//! for whole-graph algorithms.
//!
//! A graph is never edited after construction. Each pipeline stage hands
//! back a new graph.

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use std::collections::HashMap;

use super::edge::Kinship;
use super::node::{FamilyNode, PersonId, push_unique};
use super::roots::RootSelection;

/// The kinship graph.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    /// Nodes in stable input order.
    nodes: Vec<FamilyNode>,

    /// Map from identifier to position in `nodes`.
    index: HashMap<PersonId, usize>,

    /// Identifiers that occurred more than once in the input.
    duplicates: Vec<PersonId>,

    /// The chosen traversal root.
    root: RootSelection,
}

impl FamilyGraph {
    /// Create a graph from already-resolved nodes.
    ///
    /// Identifiers are expected to be unique; a repeated identifier keeps the
    /// later node.
    pub fn from_nodes(nodes: Vec<FamilyNode>, duplicates: Vec<PersonId>) -> Self {
        let mut graph = Self {
            nodes: Vec::with_capacity(nodes.len()),
            index: HashMap::with_capacity(nodes.len()),
            duplicates,
            root: RootSelection::default(),
        };
        for node in nodes {
            match graph.index.get(&node.id) {
                Some(&slot) => graph.nodes[slot] = node,
                None => {
                    graph.index.insert(node.id.clone(), graph.nodes.len());
                    graph.nodes.push(node);
                }
            }
        }
        graph
    }

    /// Return a copy of this graph with the given root selection.
    pub fn with_root(&self, root: RootSelection) -> Self {
        Self {
            root,
            ..self.clone()
        }
    }

    /// Return a copy of this graph with its nodes replaced.
    ///
    /// The replacement must keep the same identifiers in the same order.
    pub(crate) fn with_nodes(&self, nodes: Vec<FamilyNode>) -> Self {
        debug_assert_eq!(nodes.len(), self.nodes.len());
        Self {
            nodes,
            index: self.index.clone(),
            duplicates: self.duplicates.clone(),
            root: self.root.clone(),
        }
    }

    // =========================================================================
    // Node Access
    // =========================================================================

    /// Get the number of people.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the graph holds no people.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> &[FamilyNode] {
        &self.nodes
    }

    /// Look up a node by identifier. Dangling identifiers yield `None`.
    pub fn get(&self, id: &PersonId) -> Option<&FamilyNode> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    /// Position of an identifier in input order.
    pub fn slot(&self, id: &PersonId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Check whether an identifier resolves to a node.
    pub fn contains(&self, id: &PersonId) -> bool {
        self.index.contains_key(id)
    }

    /// Identifiers that were repeated in the input.
    pub fn duplicates(&self) -> &[PersonId] {
        &self.duplicates
    }

    // =========================================================================
    // Root
    // =========================================================================

    /// The root selection.
    pub fn root(&self) -> &RootSelection {
        &self.root
    }

    /// The root identifier; empty when the graph is empty.
    pub fn root_id(&self) -> &PersonId {
        &self.root.root_id
    }

    // =========================================================================
    // Relation Queries
    // =========================================================================

    /// Resolvable parents of a node.
    pub fn parents_of(&self, id: &PersonId) -> Vec<&FamilyNode> {
        self.resolve(self.get(id).map(|n| n.parents.as_slice()))
    }

    /// Resolvable children of a node, in input order.
    pub fn children_of(&self, id: &PersonId) -> Vec<&FamilyNode> {
        self.resolve(self.get(id).map(|n| n.children.as_slice()))
    }

    /// Resolvable spouses of a node, in input order.
    pub fn spouses_of(&self, id: &PersonId) -> Vec<&FamilyNode> {
        self.resolve(self.get(id).map(|n| n.spouses.as_slice()))
    }

    /// Siblings: every other person sharing at least one parent identifier.
    ///
    /// Computed on each call, not stored. Dangling parent identifiers still
    /// count, since two people naming the same unknown father are siblings.
    pub fn siblings_of(&self, id: &PersonId) -> Vec<&FamilyNode> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|other| other.id != node.id)
            .filter(|other| other.parents.iter().any(|p| node.parents.contains(p)))
            .collect()
    }

    /// Sibling identifiers of a node.
    pub fn sibling_ids(&self, id: &PersonId) -> Vec<PersonId> {
        let mut ids = Vec::new();
        for sibling in self.siblings_of(id) {
            push_unique(&mut ids, &sibling.id);
        }
        ids
    }

    fn resolve(&self, ids: Option<&[PersonId]>) -> Vec<&FamilyNode> {
        ids.unwrap_or_default()
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    // =========================================================================
    // Petgraph View
    // =========================================================================

    /// Build a petgraph view of the resolvable relations.
    ///
    /// Node weights are input-order slots; `NodeIndex::new(slot)` addresses
    /// the node at `slot`. Each parent link becomes one `ParentOf` edge and
    /// each spouse pair one `SpouseOf` edge. Dangling references are skipped.
    pub fn kinship_graph(&self) -> StableGraph<usize, Kinship, Directed> {
        let edge_hint: usize = self
            .nodes
            .iter()
            .map(|n| n.children.len() + n.spouses.len())
            .sum();
        let mut graph = StableGraph::with_capacity(self.nodes.len(), edge_hint);
        for slot in 0..self.nodes.len() {
            graph.add_node(slot);
        }

        for (slot, node) in self.nodes.iter().enumerate() {
            let source = NodeIndex::new(slot);
            for child in &node.children {
                if let Some(target) = self.slot(child) {
                    graph.add_edge(source, NodeIndex::new(target), Kinship::ParentOf);
                }
            }
            for spouse in &node.spouses {
                if let Some(target) = self.slot(spouse) {
                    if target > slot {
                        graph.add_edge(source, NodeIndex::new(target), Kinship::SpouseOf);
                    }
                }
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parents: &[&str]) -> FamilyNode {
        let mut node = FamilyNode::new(PersonId::new(id));
        node.parents = parents.iter().map(|p| PersonId::new(*p)).collect();
        node
    }

    #[test]
    fn test_from_nodes_last_write_wins() {
        let mut first = node("a", &[]);
        first.details.name = "first".into();
        let mut second = node("a", &[]);
        second.details.name = "second".into();

        let graph = FamilyGraph::from_nodes(
            vec![first, node("b", &[]), second],
            vec![PersonId::new("a")],
        );
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.slot(&PersonId::new("a")), Some(0));
        assert_eq!(graph.get(&PersonId::new("a")).unwrap().details.name, "second");
        assert_eq!(graph.duplicates(), &[PersonId::new("a")]);
    }

    #[test]
    fn test_siblings_share_a_parent() {
        let graph = FamilyGraph::from_nodes(
            vec![
                node("a", &["f", "m"]),
                node("b", &["f"]),
                node("c", &["x"]),
                node("d", &["m", "y"]),
            ],
            Vec::new(),
        );
        let siblings = graph.sibling_ids(&PersonId::new("a"));
        assert_eq!(siblings, vec![PersonId::new("b"), PersonId::new("d")]);
        assert!(graph.sibling_ids(&PersonId::new("c")).is_empty());
        assert!(graph.sibling_ids(&PersonId::new("missing")).is_empty());
    }

    #[test]
    fn test_dangling_lookups_resolve_to_nothing() {
        let mut a = node("a", &["ghost"]);
        a.spouses.push(PersonId::new("nobody"));
        let graph = FamilyGraph::from_nodes(vec![a], Vec::new());

        assert!(graph.parents_of(&PersonId::new("a")).is_empty());
        assert!(graph.spouses_of(&PersonId::new("a")).is_empty());
        assert!(graph.get(&PersonId::new("ghost")).is_none());
    }

    #[test]
    fn test_kinship_graph_edges() {
        let mut a = node("a", &[]);
        a.children.push(PersonId::new("c"));
        a.spouses.push(PersonId::new("b"));
        let mut b = node("b", &[]);
        b.children.push(PersonId::new("c"));
        b.spouses.push(PersonId::new("a"));
        let c = node("c", &["a", "b"]);

        let graph = FamilyGraph::from_nodes(vec![a, b, c], Vec::new());
        let view = graph.kinship_graph();
        assert_eq!(view.node_count(), 3);
        // Two parent edges plus one spouse edge for the pair.
        assert_eq!(view.edge_count(), 3);
    }
}

//! Output model of the pedigree layout.
//!
//! A layout is a list of positioned nodes and a list of connector edges.
//! Positioned nodes are either people or synthetic union connectors; the
//! two are separate variants so consumers match on kind instead of probing
//! optional fields.

use serde::Serialize;
use std::fmt;

use crate::graph::{PersonDetails, PersonId, Sex};

/// Identifier of a positioned node: a person id or a union id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LayoutKey(pub String);

impl LayoutKey {
    /// Key of a person node.
    pub fn person(id: &PersonId) -> Self {
        Self(id.as_str().to_owned())
    }

    /// Key of the union connector for a parent pair.
    ///
    /// The pair is ordered, so both parents derive the same key.
    pub fn union(a: &PersonId, b: &PersonId) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("union:{first}+{second}"))
    }

    /// Get the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A placed person.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPosition {
    pub id: PersonId,
    pub x: f64,
    pub y: f64,
    pub generation: i32,
    pub sex: Sex,
    #[serde(flatten)]
    pub details: PersonDetails,
}

/// A placed union connector joining two parents to their shared children.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionNode {
    pub id: LayoutKey,
    pub x: f64,
    pub y: f64,
    pub parents: [PersonId; 2],
    pub children: Vec<PersonId>,
}

/// A positioned node of either kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PositionedNode {
    Person(PersonPosition),
    Union(UnionNode),
}

impl PositionedNode {
    /// The node's layout key.
    pub fn key(&self) -> LayoutKey {
        match self {
            Self::Person(person) => LayoutKey::person(&person.id),
            Self::Union(union) => union.id.clone(),
        }
    }

    /// Horizontal center.
    pub fn x(&self) -> f64 {
        match self {
            Self::Person(person) => person.x,
            Self::Union(union) => union.x,
        }
    }

    /// Vertical center.
    pub fn y(&self) -> f64 {
        match self {
            Self::Person(person) => person.y,
            Self::Union(union) => union.y,
        }
    }

    /// The person, if this is a person node.
    pub fn as_person(&self) -> Option<&PersonPosition> {
        match self {
            Self::Person(person) => Some(person),
            Self::Union(_) => None,
        }
    }

    /// The union connector, if this is a union node.
    pub fn as_union(&self) -> Option<&UnionNode> {
        match self {
            Self::Person(_) => None,
            Self::Union(union) => Some(union),
        }
    }
}

/// Kind of a connector edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Parent to the union connector of a couple.
    ParentUnion,
    /// Union connector to one shared child.
    UnionChild,
    /// Parent straight to a child, without a union connector.
    DirectParentChild,
    /// Between the two people of a couple.
    Spousal,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParentUnion => "parent-union",
            Self::UnionChild => "union-child",
            Self::DirectParentChild => "direct-parent-child",
            Self::Spousal => "spousal",
        };
        f.write_str(name)
    }
}

/// A connector edge between two positioned nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    pub source: LayoutKey,
    pub target: LayoutKey,
    pub kind: EdgeKind,
}

impl LayoutEdge {
    /// Create a new edge.
    pub fn new(source: LayoutKey, target: LayoutKey, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }
}

/// Horizontal extent reserved for one family unit and its descendants.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSpan {
    /// The unit's primary person.
    pub person: PersonId,
    /// Index of the parent unit's span, `None` for the root unit.
    pub parent: Option<usize>,
    pub center: f64,
    pub width: f64,
}

impl UnitSpan {
    /// Left edge of the span.
    pub fn left(&self) -> f64 {
        self.center - self.width / 2.0
    }

    /// Right edge of the span.
    pub fn right(&self) -> f64 {
        self.center + self.width / 2.0
    }
}

/// The complete layout of one family graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Root person identifier; empty when there is no data.
    pub root_id: PersonId,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<LayoutEdge>,
    /// Subtree width of the root unit.
    pub width: f64,
    /// People not reachable from the root, left unplaced.
    pub detached: Vec<PersonId>,
    /// One span per family unit, in placement order.
    #[serde(skip)]
    pub spans: Vec<UnitSpan>,
}

impl LayoutResult {
    /// Whether the layout holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a positioned node by key.
    pub fn node(&self, key: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.key().as_str() == key)
    }

    /// Find a placed person by identifier.
    pub fn person(&self, id: &str) -> Option<&PersonPosition> {
        self.nodes
            .iter()
            .filter_map(PositionedNode::as_person)
            .find(|p| p.id.as_str() == id)
    }

    /// All union connectors.
    pub fn unions(&self) -> impl Iterator<Item = &UnionNode> {
        self.nodes.iter().filter_map(PositionedNode::as_union)
    }

    /// Edges of one kind.
    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &LayoutEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` of node centers.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for node in &self.nodes {
            min_x = min_x.min(node.x());
            max_x = max_x.max(node.x());
            min_y = min_y.min(node.y());
            max_y = max_y.max(node.y());
        }
        Some((min_x, min_y, max_x, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_key_is_order_independent() {
        let a = PersonId::new("alice");
        let b = PersonId::new("bob");
        assert_eq!(LayoutKey::union(&a, &b), LayoutKey::union(&b, &a));
        assert_eq!(LayoutKey::union(&a, &b).as_str(), "union:alice+bob");
    }

    #[test]
    fn test_edge_kind_wire_names() {
        let json = serde_json::to_string(&EdgeKind::DirectParentChild).unwrap();
        assert_eq!(json, "\"direct-parent-child\"");
        assert_eq!(EdgeKind::ParentUnion.to_string(), "parent-union");
    }

    #[test]
    fn test_positioned_node_tagged() {
        let node = PositionedNode::Union(UnionNode {
            id: LayoutKey("union:a+b".into()),
            x: 1.0,
            y: 2.0,
            parents: [PersonId::new("a"), PersonId::new("b")],
            children: vec![PersonId::new("c")],
        });
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["kind"], "union");
        assert_eq!(value["id"], "union:a+b");
        assert_eq!(node.key().as_str(), "union:a+b");
        assert!(node.as_person().is_none());
    }

    #[test]
    fn test_bounds() {
        let mut result = LayoutResult::default();
        assert_eq!(result.bounds(), None);
        for (x, y) in [(-10.0, 0.0), (30.0, 160.0)] {
            result.nodes.push(PositionedNode::Person(PersonPosition {
                id: PersonId::new(format!("{x}")),
                x,
                y,
                generation: 1,
                sex: Sex::Unknown,
                details: PersonDetails::default(),
            }));
        }
        assert_eq!(result.bounds(), Some((-10.0, 0.0, 30.0, 160.0)));
    }
}

//! R-tree based hit testing over a finished layout, using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Nearest node
//! - Nodes within a radius
//! - Nodes inside a rectangle

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::layout::{LayoutKey, LayoutResult, PositionedNode};

/// A positioned node's center in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedNode {
    pub key: LayoutKey,
    pub is_union: bool,
    pub x: f64,
    pub y: f64,
}

impl IndexedNode {
    fn from_node(node: &PositionedNode) -> Self {
        Self {
            key: node.key(),
            is_union: node.as_union().is_some(),
            x: node.x(),
            y: node.y(),
        }
    }
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over the nodes of one layout.
///
/// Union connectors are indexed too but can be skipped by person-only
/// queries.
pub struct LayoutIndex {
    tree: RTree<IndexedNode>,
}

impl LayoutIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load an index from a layout.
    pub fn from_layout(layout: &LayoutResult) -> Self {
        let points = layout.nodes.iter().map(IndexedNode::from_node).collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Find the nearest node to a point.
    pub fn nearest(&self, x: f64, y: f64) -> Option<&LayoutKey> {
        self.tree.nearest_neighbor(&[x, y]).map(|point| &point.key)
    }

    /// Find the nearest person (not union connector) to a point.
    pub fn nearest_person(&self, x: f64, y: f64) -> Option<&LayoutKey> {
        self.tree
            .nearest_neighbor_iter(&[x, y])
            .find(|point| !point.is_union)
            .map(|point| &point.key)
    }

    /// Find the nearest person within a maximum distance.
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<&LayoutKey> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor_iter(&[x, y])
            .find(|point| !point.is_union)
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| &point.key)
    }

    /// Find all nodes inside a rectangle.
    pub fn in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<&LayoutKey> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|point| &point.key)
            .collect()
    }

    /// Find all nodes within a radius of a point.
    pub fn in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<&LayoutKey> {
        self.tree
            .locate_within_distance([x, y], radius * radius)
            .map(|point| &point.key)
            .collect()
    }

    /// Get the number of indexed nodes.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for LayoutIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{PersonDetails, PersonId, Sex};
    use crate::layout::{PersonPosition, UnionNode};

    fn person(id: &str, x: f64, y: f64) -> PositionedNode {
        PositionedNode::Person(PersonPosition {
            id: PersonId::new(id),
            x,
            y,
            generation: 1,
            sex: Sex::Unknown,
            details: PersonDetails::default(),
        })
    }

    fn layout() -> LayoutResult {
        LayoutResult {
            nodes: vec![
                person("a", 0.0, 0.0),
                person("b", 10.0, 10.0),
                person("c", 5.0, 5.0),
                PositionedNode::Union(UnionNode {
                    id: LayoutKey("union:a+b".into()),
                    x: 9.0,
                    y: 9.0,
                    parents: [PersonId::new("a"), PersonId::new("b")],
                    children: Vec::new(),
                }),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_nearest() {
        let index = LayoutIndex::from_layout(&layout());
        assert_eq!(index.len(), 4);
        assert_eq!(index.nearest(0.0, 0.0).unwrap().as_str(), "a");
        assert_eq!(index.nearest(6.0, 6.0).unwrap().as_str(), "c");
        assert_eq!(index.nearest(9.0, 9.0).unwrap().as_str(), "union:a+b");
    }

    #[test]
    fn test_nearest_person_skips_unions() {
        let index = LayoutIndex::from_layout(&layout());
        assert_eq!(index.nearest_person(9.0, 9.0).unwrap().as_str(), "b");
    }

    #[test]
    fn test_nearest_within_distance_limit() {
        let index = LayoutIndex::from_layout(&layout());
        assert_eq!(index.nearest_within(0.0, 0.0, 1.0).unwrap().as_str(), "a");
        assert!(index.nearest_within(-20.0, -20.0, 5.0).is_none());
    }

    #[test]
    fn test_in_rect_window() {
        let index = LayoutIndex::from_layout(&layout());
        let found = index.in_rect(-1.0, -1.0, 6.0, 6.0);
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|k| k.as_str() == "a"));
        assert!(found.iter().any(|k| k.as_str() == "c"));
    }

    #[test]
    fn test_in_radius_around_origin() {
        let index = LayoutIndex::from_layout(&layout());
        let found = index.in_radius(0.0, 0.0, 8.0);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_empty() {
        let index = LayoutIndex::new();
        assert!(index.is_empty());
        assert!(index.nearest(0.0, 0.0).is_none());
    }
}

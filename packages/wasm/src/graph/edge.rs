//! Kinship relation kinds.
//!
//! Only two relations are stored on the graph's edges: parent to child and
//! spouse to spouse. Sibling links are derived from shared parents and are
//! never materialized as edges.

use serde::Serialize;
use std::fmt;

/// Kind of a stored kinship relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Kinship {
    /// Directed: source is a parent of target.
    ParentOf,
    /// Symmetric: stored once per pair, source first in input order.
    SpouseOf,
}

impl Kinship {
    /// Whether this relation defines descent.
    #[inline]
    pub fn is_lineage(self) -> bool {
        matches!(self, Self::ParentOf)
    }
}

impl fmt::Display for Kinship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentOf => f.write_str("parent"),
            Self::SpouseOf => f.write_str("spouse"),
        }
    }
}

/// The relation slot a dangling reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationSlot {
    Parent,
    Child,
    Spouse,
}

impl fmt::Display for RelationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str("parent"),
            Self::Child => f.write_str("child"),
            Self::Spouse => f.write_str("spouse"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinship_display() {
        assert_eq!(Kinship::ParentOf.to_string(), "parent");
        assert_eq!(Kinship::SpouseOf.to_string(), "spouse");
        assert!(Kinship::ParentOf.is_lineage());
        assert!(!Kinship::SpouseOf.is_lineage());
    }

    #[test]
    fn test_relation_slot_display() {
        assert_eq!(RelationSlot::Child.to_string(), "child");
    }
}

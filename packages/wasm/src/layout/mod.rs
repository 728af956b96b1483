//! Pedigree layout.
//!
//! This module computes positions for people and union connectors from a
//! generation-stamped family graph. The work is split into a plan (family
//! units and child groups), a bottom-up width pass and a top-down placement
//! pass.

pub mod pedigree;
pub mod plan;
pub mod types;
pub mod width;

pub use pedigree::{LayoutConfig, PedigreeLayout};
pub use plan::{ChildGroup, FamilyUnit, GroupParents, LayoutPlan};
pub use types::{
    EdgeKind, LayoutEdge, LayoutKey, LayoutResult, PersonPosition, PositionedNode, UnionNode,
    UnitSpan,
};
pub use width::{SubtreeWidths, own_width};

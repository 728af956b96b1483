//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree based spatial index for nearest-neighbor
//! and range queries over a computed layout.

mod rtree;

pub use rtree::{IndexedNode, LayoutIndex};

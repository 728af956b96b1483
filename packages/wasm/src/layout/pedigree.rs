//! Pedigree layout engine.
//!
//! Turns a generation-stamped family graph into positioned nodes and
//! connector edges for a top-down pedigree diagram.
//!
//! # Algorithm Overview
//!
//! 1. **Plan:** Cut the graph reachable from the root into family units
//!    (a person plus spouses) with grouped children. See `plan`.
//! 2. **Measure (bottom-up):** Compute each unit's subtree width. See
//!    `width`.
//! 3. **Place (top-down):** Starting with the root unit centered on x = 0,
//!    place each unit's people in a row around its center, split the unit's
//!    width among its children in proportion to their subtree widths, and
//!    recurse. People sit at `y = generation * level_spacing`.
//! 4. **Connect:** Couples with shared children get a union connector in
//!    the gap beside the spouse, part way down to the children's row. Single
//!    parents, and couples with one shared child, connect straight to the
//!    child.
//!
//! All arithmetic runs in a fixed order, so identical input gives identical
//! coordinates.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::plan::{FamilyUnit, GroupParents, LayoutPlan};
use super::types::{
    EdgeKind, LayoutEdge, LayoutKey, LayoutResult, PersonPosition, PositionedNode, UnionNode,
    UnitSpan,
};
use super::width::SubtreeWidths;
use crate::error::{PedigreeError, Result};
use crate::graph::FamilyGraph;

/// Configuration for the pedigree layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Footprint of one person node (W).
    pub node_width: f64,
    /// Gap between the two people of a couple (S).
    pub spouse_spacing: f64,
    /// Minimum gap between sibling subtrees.
    pub sibling_spacing: f64,
    /// Vertical distance between generations.
    pub level_spacing: f64,
    /// Where union connectors sit between the parents' row (0.0) and the
    /// children's row (1.0).
    pub union_offset: f64,
    /// Route a couple's only shared child through a union connector too.
    pub union_for_single_child: bool,
    /// Lower bound for the width the root unit spreads its children over.
    pub canvas_width: Option<f64>,
    /// Emit the nested tree alongside the flat layout.
    pub include_tree: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 120.0,
            spouse_spacing: 40.0,
            sibling_spacing: 40.0,
            level_spacing: 160.0,
            union_offset: 0.5,
            union_for_single_child: false,
            canvas_width: None,
            include_tree: true,
        }
    }
}

impl LayoutConfig {
    /// Reject non-finite or negative spacing values.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("nodeWidth", self.node_width),
            ("spouseSpacing", self.spouse_spacing),
            ("siblingSpacing", self.sibling_spacing),
            ("levelSpacing", self.level_spacing),
            ("unionOffset", self.union_offset),
            ("canvasWidth", self.canvas_width.unwrap_or(0.0)),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PedigreeError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }

    /// Center-to-center distance between neighbours in a couple row.
    #[inline]
    pub fn spouse_offset(&self) -> f64 {
        self.node_width + self.spouse_spacing
    }
}

/// The pedigree layout engine.
pub struct PedigreeLayout {
    config: LayoutConfig,
}

impl PedigreeLayout {
    /// Create a new layout engine with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Create a layout engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    /// The engine's configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a generation-stamped graph.
    pub fn compute(&self, graph: &FamilyGraph) -> LayoutResult {
        let plan = LayoutPlan::build(graph);
        self.compute_plan(graph, &plan)
    }

    /// Lay out a graph using an already-built plan of it.
    pub fn compute_plan(&self, graph: &FamilyGraph, plan: &LayoutPlan) -> LayoutResult {
        let mut result = LayoutResult {
            root_id: graph.root_id().clone(),
            detached: plan
                .detached
                .iter()
                .map(|&slot| graph.nodes()[slot].id.clone())
                .collect(),
            ..Default::default()
        };

        if !result.detached.is_empty() {
            warn!(
                count = result.detached.len(),
                "people not connected to the root are left out of the layout"
            );
        }

        let Some(root) = plan.root() else {
            return result;
        };

        let widths = SubtreeWidths::measure(plan, &self.config);
        let available = widths
            .subtree(root)
            .max(self.config.canvas_width.unwrap_or(0.0));
        result.width = widths.subtree(root);

        let mut placer = Placer {
            config: &self.config,
            graph,
            plan,
            widths: &widths,
            result: &mut result,
        };
        placer.place_unit(root, 0.0, available, None);

        debug!(
            nodes = result.nodes.len(),
            edges = result.edges.len(),
            width = result.width,
            "computed pedigree layout"
        );
        result
    }
}

/// Recursion state for the top-down placement walk.
struct Placer<'a> {
    config: &'a LayoutConfig,
    graph: &'a FamilyGraph,
    plan: &'a LayoutPlan,
    widths: &'a SubtreeWidths,
    result: &'a mut LayoutResult,
}

impl Placer<'_> {
    /// Place a unit centered on `center` within `available` width, then its
    /// descendants.
    fn place_unit(&mut self, index: usize, center: f64, available: f64, parent_span: Option<usize>) {
        let plan = self.plan;
        let unit = &plan.units[index];
        let span = self.result.spans.len();
        self.result.spans.push(UnitSpan {
            person: self.graph.nodes()[unit.primary].id.clone(),
            parent: parent_span,
            center,
            width: self.widths.subtree(index),
        });

        let xs = self.place_people(unit, center);
        let parent_y = self.person_y(unit.primary);

        let children: Vec<usize> = unit.child_units().collect();
        if children.is_empty() {
            return;
        }

        let centers = self.split(&children, center, available);

        for group in &unit.groups {
            self.connect_group(unit, &xs, parent_y, group.parents, &group.children);
        }

        for (&child, &child_center) in children.iter().zip(&centers) {
            let child_width = self.widths.subtree(child);
            self.place_unit(child, child_center, child_width, Some(span));
        }
    }

    /// Place the unit's row of people and its spousal edges. Returns the x
    /// of each person: primary first, then partners.
    fn place_people(&mut self, unit: &FamilyUnit, center: f64) -> Vec<f64> {
        let nodes = self.graph.nodes();
        let offset = self.config.spouse_offset();
        let row = (unit.people() - 1) as f64 * offset;
        let first = center - row / 2.0;

        let slots: Vec<usize> = std::iter::once(unit.primary)
            .chain(unit.partners.iter().copied())
            .collect();
        let mut xs = Vec::with_capacity(slots.len());

        for (i, &slot) in slots.iter().enumerate() {
            let x = first + i as f64 * offset;
            let y = self.person_y(slot);
            let node = &nodes[slot];
            self.result.nodes.push(PositionedNode::Person(PersonPosition {
                id: node.id.clone(),
                x,
                y,
                generation: node.generation,
                sex: node.sex,
                details: node.details.clone(),
            }));
            xs.push(x);
        }

        let primary = LayoutKey::person(&nodes[unit.primary].id);
        for &partner in &unit.partners {
            let edge = LayoutEdge::new(
                primary.clone(),
                LayoutKey::person(&nodes[partner].id),
                EdgeKind::Spousal,
            );
            self.result.edges.push(edge);
        }
        xs
    }

    /// Divide `available` among children in proportion to their subtree
    /// widths, keeping sibling spacing between them. Returns child centers.
    fn split(&self, children: &[usize], center: f64, available: f64) -> Vec<f64> {
        let spacing = self.config.sibling_spacing;
        let gaps = (children.len() - 1) as f64 * spacing;
        let needed: f64 = children.iter().map(|&c| self.widths.subtree(c)).sum();
        let span = available.max(needed + gaps);
        let free = span - gaps;

        let mut cursor = center - span / 2.0;
        let mut centers = Vec::with_capacity(children.len());
        for &child in children {
            let width = self.widths.subtree(child);
            let slot = if needed > 0.0 {
                width * free / needed
            } else {
                free / children.len() as f64
            };
            centers.push(cursor + slot / 2.0);
            cursor += slot + spacing;
        }
        centers
    }

    /// Emit union nodes and edges for one child group.
    fn connect_group(
        &mut self,
        unit: &FamilyUnit,
        xs: &[f64],
        parent_y: f64,
        parents: GroupParents,
        children: &[usize],
    ) {
        let nodes = self.graph.nodes();
        let plan = self.plan;
        let child_ids: Vec<_> = children
            .iter()
            .map(|&c| nodes[plan.units[c].primary].id.clone())
            .collect();
        let child_keys: Vec<LayoutKey> = child_ids.iter().map(LayoutKey::person).collect();

        let mut edges = Vec::new();
        match parents {
            GroupParents::Single(parent) => {
                let source = LayoutKey::person(&nodes[parent].id);
                for target in child_keys {
                    edges.push(LayoutEdge::new(source.clone(), target, EdgeKind::DirectParentChild));
                }
            }
            GroupParents::Couple(a, b) => {
                let key_a = LayoutKey::person(&nodes[a].id);
                let key_b = LayoutKey::person(&nodes[b].id);
                let use_union = children.len() >= 2 || self.config.union_for_single_child;

                if use_union {
                    let union = LayoutKey::union(&nodes[a].id, &nodes[b].id);
                    let offset = self.config.union_offset.clamp(0.0, 1.0);
                    let x = union_x(unit, xs, b);
                    let y = parent_y + offset * self.config.level_spacing;

                    self.result.nodes.push(PositionedNode::Union(UnionNode {
                        id: union.clone(),
                        x,
                        y,
                        parents: [nodes[a].id.clone(), nodes[b].id.clone()],
                        children: child_ids,
                    }));
                    edges.push(LayoutEdge::new(key_a, union.clone(), EdgeKind::ParentUnion));
                    edges.push(LayoutEdge::new(key_b, union.clone(), EdgeKind::ParentUnion));
                    for target in child_keys {
                        edges.push(LayoutEdge::new(union.clone(), target, EdgeKind::UnionChild));
                    }
                } else {
                    for target in child_keys {
                        edges.push(LayoutEdge::new(
                            key_a.clone(),
                            target.clone(),
                            EdgeKind::DirectParentChild,
                        ));
                        edges.push(LayoutEdge::new(key_b.clone(), target, EdgeKind::DirectParentChild));
                    }
                }
            }
        }
        self.result.edges.extend(edges);
    }

    fn person_y(&self, slot: usize) -> f64 {
        self.graph.nodes()[slot].generation as f64 * self.config.level_spacing
    }
}

/// X of the union between the primary and one partner.
///
/// The union sits in the gap left of the partner, so with several spouses
/// it never lands under another person of the row.
fn union_x(unit: &FamilyUnit, xs: &[f64], partner: usize) -> f64 {
    unit.partners
        .iter()
        .position(|&p| p == partner)
        .map_or(xs[0], |i| (xs[i] + xs[i + 1]) / 2.0)
}

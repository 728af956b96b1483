//! Nested tree output for consumers that expect a plain hierarchy.
//!
//! The tree is walked from the same layout plan the layout engine uses, so
//! child order and generation values agree with the flat layout.

use serde::Serialize;

use crate::graph::{FamilyGraph, FamilyNode, PersonDetails, PersonId, Sex};
use crate::layout::LayoutPlan;

/// A spouse shown next to a tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSpouse {
    pub id: PersonId,
    pub sex: Sex,
    pub generation: i32,
    #[serde(flatten)]
    pub details: PersonDetails,
}

/// One person with their descendants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: PersonId,
    pub sex: Sex,
    pub generation: i32,
    #[serde(flatten)]
    pub details: PersonDetails,
    pub spouses: Vec<TreeSpouse>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of people in this subtree, spouses included.
    pub fn size(&self) -> usize {
        1 + self.spouses.len() + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Depth of the subtree counted in generations below this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }
}

/// Build the nested tree rooted at the plan's root unit.
///
/// Returns `None` for an empty graph.
pub fn build_tree(graph: &FamilyGraph, plan: &LayoutPlan) -> Option<TreeNode> {
    plan.root().map(|root| tree_node(graph, plan, root))
}

fn tree_node(graph: &FamilyGraph, plan: &LayoutPlan, index: usize) -> TreeNode {
    let nodes = graph.nodes();
    let unit = &plan.units[index];
    let primary = &nodes[unit.primary];

    TreeNode {
        id: primary.id.clone(),
        sex: primary.sex,
        generation: primary.generation,
        details: primary.details.clone(),
        spouses: unit
            .partners
            .iter()
            .map(|&slot| spouse(&nodes[slot]))
            .collect(),
        children: unit
            .child_units()
            .map(|child| tree_node(graph, plan, child))
            .collect(),
    }
}

fn spouse(node: &FamilyNode) -> TreeSpouse {
    TreeSpouse {
        id: node.id.clone(),
        sex: node.sex,
        generation: node.generation,
        details: node.details.clone(),
    }
}

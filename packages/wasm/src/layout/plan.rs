//! Layout plan: family units and their child groups.
//!
//! Before anything is measured or placed, the graph reachable from the root
//! is cut into a tree of **family units**. A unit is one primary person plus
//! their spouses. Its children are split into groups by which parents they
//! share with the unit:
//!
//! 1. children of the primary alone
//! 2. for each spouse in turn: children shared with that spouse, then
//!    children of that spouse alone
//!
//! Every person is claimed by exactly one unit, either as a primary or as a
//! spouse, so a child with two parents in the same unit is visited once and
//! not once per parent. A unit claims all of its direct children before
//! descending, which keeps people as close to the root as the data allows.
//!
//! Units are stored in pre-order: a unit's index is always smaller than the
//! indices of its child units.

use std::collections::HashSet;
use tracing::debug;

use crate::graph::{FamilyGraph, FamilyNode};

/// The parents a child group hangs from, as graph slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupParents {
    /// Children of one recorded parent of the unit.
    Single(usize),
    /// Children shared by the primary and one spouse.
    Couple(usize, usize),
}

/// Children of a unit that hang from the same parent(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildGroup {
    pub parents: GroupParents,
    /// Indices of the child units, left to right.
    pub children: Vec<usize>,
}

/// One primary person plus spouses, with child groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyUnit {
    /// Graph slot of the primary person.
    pub primary: usize,
    /// Graph slots of spouses placed beside the primary, in input order.
    pub partners: Vec<usize>,
    pub groups: Vec<ChildGroup>,
    /// Index of the parent unit, `None` for the root unit.
    pub parent: Option<usize>,
}

impl FamilyUnit {
    /// Number of people drawn in the unit's row.
    pub fn people(&self) -> usize {
        1 + self.partners.len()
    }

    /// All child unit indices, left to right across groups.
    pub fn child_units(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().flat_map(|g| g.children.iter().copied())
    }

    /// Number of child units across all groups.
    pub fn child_count(&self) -> usize {
        self.groups.iter().map(|g| g.children.len()).sum()
    }
}

/// The unit tree for one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Units in pre-order; index 0 is the root unit when present.
    pub units: Vec<FamilyUnit>,
    /// Graph slots of people the plan does not place, in input order.
    pub detached: Vec<usize>,
}

impl LayoutPlan {
    /// Cut the graph into family units, starting at its root.
    pub fn build(graph: &FamilyGraph) -> Self {
        let mut plan = Self::default();
        let mut claimed: HashSet<usize> = HashSet::with_capacity(graph.len());

        if let Some(root) = graph.slot(graph.root_id()) {
            claimed.insert(root);
            plan.build_unit(graph, root, None, &mut claimed);
        }

        plan.detached = (0..graph.len()).filter(|s| !claimed.contains(s)).collect();

        debug!(
            units = plan.units.len(),
            detached = plan.detached.len(),
            "planned family units"
        );
        plan
    }

    /// Whether the plan has no root unit.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The root unit index, if any.
    pub fn root(&self) -> Option<usize> {
        (!self.units.is_empty()).then_some(0)
    }

    /// Build the unit for an already-claimed primary and its descendants.
    fn build_unit(
        &mut self,
        graph: &FamilyGraph,
        primary: usize,
        parent: Option<usize>,
        claimed: &mut HashSet<usize>,
    ) -> usize {
        let nodes = graph.nodes();
        let index = self.units.len();
        let primary_node = &nodes[primary];

        let partners: Vec<usize> = primary_node
            .spouses
            .iter()
            .filter_map(|id| graph.slot(id))
            .filter(|&slot| claimed.insert(slot))
            .collect();

        let pending = claim_children(graph, primary, &partners, claimed);

        self.units.push(FamilyUnit {
            primary,
            partners,
            groups: Vec::with_capacity(pending.len()),
            parent,
        });

        for (parents, slots) in pending {
            let children = slots
                .into_iter()
                .map(|child| self.build_unit(graph, child, Some(index), claimed))
                .collect();
            self.units[index].groups.push(ChildGroup { parents, children });
        }

        index
    }
}

/// Group and claim the unclaimed children of a unit.
///
/// Returns non-empty groups in display order, each as graph slots.
fn claim_children(
    graph: &FamilyGraph,
    primary: usize,
    partners: &[usize],
    claimed: &mut HashSet<usize>,
) -> Vec<(GroupParents, Vec<usize>)> {
    let nodes = graph.nodes();
    let primary_node = &nodes[primary];
    let children_of = |node: &FamilyNode| -> Vec<usize> {
        node.children.iter().filter_map(|id| graph.slot(id)).collect()
    };
    // Parent and child lists are symmetric after building.
    let shares_parent = |child: usize, parent: usize| nodes[child].is_child_of(&nodes[parent].id);

    let mut groups: Vec<(GroupParents, Vec<usize>)> = Vec::new();
    let primary_children = children_of(primary_node);

    let alone: Vec<usize> = primary_children
        .iter()
        .copied()
        .filter(|&c| !partners.iter().any(|&p| shares_parent(c, p)))
        .collect();
    groups.push((GroupParents::Single(primary), alone));

    for &partner in partners {
        let shared: Vec<usize> = primary_children
            .iter()
            .copied()
            .filter(|&c| shares_parent(c, partner))
            .collect();
        groups.push((GroupParents::Couple(primary, partner), shared));

        let partner_alone: Vec<usize> = children_of(&nodes[partner])
            .into_iter()
            .filter(|&c| !shares_parent(c, primary))
            .collect();
        groups.push((GroupParents::Single(partner), partner_alone));
    }

    // Claim in display order; a child seen in an earlier group or unit
    // stays where it was first claimed.
    for (_, slots) in &mut groups {
        slots.retain(|&slot| claimed.insert(slot));
    }
    groups.retain(|(_, slots)| !slots.is_empty());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{PersonRecord, build_family_graph, resolve_root};

    fn plan(records: &[PersonRecord]) -> (FamilyGraph, LayoutPlan) {
        let graph = build_family_graph(records);
        let graph = graph.with_root(resolve_root(&graph));
        let plan = LayoutPlan::build(&graph);
        (graph, plan)
    }

    fn name(graph: &FamilyGraph, slot: usize) -> &str {
        graph.nodes()[slot].id.as_str()
    }

    #[test]
    fn test_empty_plan() {
        let (_, plan) = plan(&[]);
        assert!(plan.is_empty());
        assert_eq!(plan.root(), None);
    }

    #[test]
    fn test_couple_with_shared_children() {
        let (graph, plan) = plan(&[
            PersonRecord::new("f", "F").with_spouse("m"),
            PersonRecord::new("m", "M"),
            PersonRecord::new("a", "A").with_father("f").with_mother("m"),
            PersonRecord::new("b", "B").with_father("f").with_mother("m"),
        ]);

        assert_eq!(plan.units.len(), 3);
        let root = &plan.units[0];
        assert_eq!(name(&graph, root.primary), "f");
        assert_eq!(root.partners.len(), 1);
        assert_eq!(name(&graph, root.partners[0]), "m");
        assert_eq!(root.groups.len(), 1);
        assert!(matches!(root.groups[0].parents, GroupParents::Couple(_, _)));
        assert_eq!(root.child_count(), 2);
        assert!(plan.detached.is_empty());
    }

    #[test]
    fn test_shared_child_visited_once() {
        // Both parents list the child explicitly and the child names both.
        let (_, plan) = plan(&[
            PersonRecord::new("f", "F").with_spouse("m").with_children(["c"]),
            PersonRecord::new("m", "M").with_children(["c"]),
            PersonRecord::new("c", "C").with_father("f").with_mother("m"),
        ]);
        assert_eq!(plan.units.len(), 2);
        assert_eq!(plan.units[0].child_count(), 1);
    }

    #[test]
    fn test_group_order_half_siblings() {
        let (graph, plan) = plan(&[
            PersonRecord::new("f", "F").with_spouse("m"),
            PersonRecord::new("m", "M"),
            PersonRecord::new("x", "X").with_father("f"),
            PersonRecord::new("y", "Y").with_father("f").with_mother("m"),
            PersonRecord::new("z", "Z").with_mother("m").with_father("other"),
        ]);
        let root = &plan.units[0];
        let order: Vec<&str> = root
            .child_units()
            .map(|u| name(&graph, plan.units[u].primary))
            .collect();
        assert_eq!(order, vec!["x", "y", "z"]);
        assert!(matches!(root.groups[0].parents, GroupParents::Single(p) if p == root.primary));
        assert!(matches!(root.groups[1].parents, GroupParents::Couple(_, _)));
        assert!(matches!(root.groups[2].parents, GroupParents::Single(p) if p == root.partners[0]));
    }

    #[test]
    fn test_units_in_pre_order() {
        let (_, plan) = plan(&[
            PersonRecord::new("a", "A"),
            PersonRecord::new("b", "B").with_father("a"),
            PersonRecord::new("c", "C").with_father("b"),
            PersonRecord::new("d", "D").with_father("a"),
        ]);
        for (index, unit) in plan.units.iter().enumerate() {
            for child in unit.child_units() {
                assert!(child > index);
                assert_eq!(plan.units[child].parent, Some(index));
            }
        }
    }

    #[test]
    fn test_detached_people() {
        let (graph, plan) = plan(&[
            PersonRecord::new("a", "A"),
            PersonRecord::new("x", "X"),
        ]);
        assert_eq!(plan.detached.len(), 1);
        assert_eq!(name(&graph, plan.detached[0]), "x");
    }

    #[test]
    fn test_cycle_does_not_repeat_people() {
        let (_, plan) = plan(&[
            PersonRecord::new("a", "A").with_father("b"),
            PersonRecord::new("b", "B").with_father("a"),
        ]);
        assert_eq!(plan.units.len(), 2);
    }
}

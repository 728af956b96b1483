//! Subtree width calculator.
//!
//! Bottom-up sizing over the layout plan. A unit's own width is the row of
//! people it draws: `W` for a single person, `2W + S` for a couple, and in
//! general `(1 + n)W + nS` for `n` spouses. With children, the subtree width
//! is the larger of the own width and the children's subtree widths laid
//! side by side with sibling spacing between them.
//!
//! The recursion runs over plan units, where each child belongs to exactly
//! one unit, so shared children are counted once.

use super::pedigree::LayoutConfig;
use super::plan::{FamilyUnit, LayoutPlan};

/// Measured widths, indexed like `LayoutPlan::units`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtreeWidths {
    own: Vec<f64>,
    subtree: Vec<f64>,
}

impl SubtreeWidths {
    /// Measure every unit of a plan.
    pub fn measure(plan: &LayoutPlan, config: &LayoutConfig) -> Self {
        let mut widths = Self {
            own: vec![0.0; plan.units.len()],
            subtree: vec![0.0; plan.units.len()],
        };
        if let Some(root) = plan.root() {
            widths.measure_unit(plan, root, config);
        }
        widths
    }

    /// Width of the unit's own row of people.
    pub fn own(&self, unit: usize) -> f64 {
        self.own[unit]
    }

    /// Width of the unit and all of its descendants.
    pub fn subtree(&self, unit: usize) -> f64 {
        self.subtree[unit]
    }

    fn measure_unit(&mut self, plan: &LayoutPlan, index: usize, config: &LayoutConfig) -> f64 {
        let unit = &plan.units[index];
        let own = own_width(unit, config);

        let mut total = 0.0;
        let mut count = 0usize;
        for child in unit.child_units() {
            total += self.measure_unit(plan, child, config);
            count += 1;
        }

        let subtree = if count == 0 {
            own
        } else {
            own.max(total + (count - 1) as f64 * config.sibling_spacing)
        };

        self.own[index] = own;
        self.subtree[index] = subtree;
        subtree
    }
}

/// Width of a unit's row of people.
pub fn own_width(unit: &FamilyUnit, config: &LayoutConfig) -> f64 {
    let spouses = unit.partners.len() as f64;
    (1.0 + spouses) * config.node_width + spouses * config.spouse_spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FamilyGraph, PersonRecord, build_family_graph, resolve_root};

    fn config() -> LayoutConfig {
        LayoutConfig {
            node_width: 100.0,
            spouse_spacing: 20.0,
            sibling_spacing: 30.0,
            ..Default::default()
        }
    }

    fn measure(records: &[PersonRecord]) -> (FamilyGraph, LayoutPlan, SubtreeWidths) {
        let graph = build_family_graph(records);
        let graph = graph.with_root(resolve_root(&graph));
        let plan = LayoutPlan::build(&graph);
        let widths = SubtreeWidths::measure(&plan, &config());
        (graph, plan, widths)
    }

    #[test]
    fn test_single_person() {
        let (_, _, widths) = measure(&[PersonRecord::new("a", "A")]);
        assert_eq!(widths.own(0), 100.0);
        assert_eq!(widths.subtree(0), 100.0);
    }

    #[test]
    fn test_childless_couple_keeps_couple_width() {
        let (_, _, widths) = measure(&[
            PersonRecord::new("a", "A").with_spouse("b"),
            PersonRecord::new("b", "B"),
        ]);
        assert_eq!(widths.own(0), 220.0);
        assert_eq!(widths.subtree(0), 220.0);
    }

    #[test]
    fn test_children_wider_than_parent() {
        let (_, _, widths) = measure(&[
            PersonRecord::new("p", "P"),
            PersonRecord::new("a", "A").with_father("p"),
            PersonRecord::new("b", "B").with_father("p"),
            PersonRecord::new("c", "C").with_father("p"),
        ]);
        // 3 * 100 + 2 * 30
        assert_eq!(widths.subtree(0), 360.0);
    }

    #[test]
    fn test_parent_wider_than_children() {
        let (_, _, widths) = measure(&[
            PersonRecord::new("f", "F").with_spouse("m"),
            PersonRecord::new("m", "M"),
            PersonRecord::new("c", "C").with_father("f").with_mother("m"),
        ]);
        assert_eq!(widths.subtree(0), 220.0);
        assert_eq!(widths.subtree(1), 100.0);
    }

    #[test]
    fn test_shared_children_counted_once() {
        let (_, plan, widths) = measure(&[
            PersonRecord::new("f", "F").with_spouse("m").with_children(["a", "b"]),
            PersonRecord::new("m", "M").with_children(["a", "b"]),
            PersonRecord::new("a", "A"),
            PersonRecord::new("b", "B"),
        ]);
        assert_eq!(plan.units[0].child_count(), 2);
        // Two children side by side, not four.
        assert_eq!(widths.subtree(0), 230.0);
    }

    #[test]
    fn test_nested_couples() {
        let (_, _, widths) = measure(&[
            PersonRecord::new("g", "G"),
            PersonRecord::new("a", "A").with_father("g").with_spouse("as"),
            PersonRecord::new("as", "AS"),
            PersonRecord::new("b", "B").with_father("g"),
        ]);
        // Couple (220) plus single (100) plus spacing (30).
        assert_eq!(widths.subtree(0), 350.0);
    }
}

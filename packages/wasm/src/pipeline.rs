//! End-to-end pedigree pipeline.
//!
//! records → family graph → root → generations → plan → widths → layout
//!
//! Every stage is a pure function of the previous stage's output. Running
//! the pipeline again on the same records gives the same result, so callers
//! simply re-run it whenever the record set changes.

use serde::Serialize;
use tracing::debug_span;

use crate::error::Result;
use crate::graph::{
    Diagnostics, PersonId, PersonRecord, RootSelection, assign_generations, build_family_graph,
    diagnose, parse_records, resolve_root,
};
use crate::hierarchy::{TreeNode, build_tree};
use crate::layout::{LayoutConfig, LayoutPlan, LayoutResult, PedigreeLayout};
use crate::spatial::LayoutIndex;

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PedigreeOutput {
    /// How the root was chosen.
    pub root: RootSelection,
    /// Positioned nodes and connector edges.
    #[serde(flatten)]
    pub layout: LayoutResult,
    /// Nested hierarchy, when requested and the input is not empty.
    pub tree: Option<TreeNode>,
    pub diagnostics: Diagnostics,
}

impl PedigreeOutput {
    /// The resolved root; empty when there was no data.
    pub fn root_id(&self) -> &PersonId {
        &self.layout.root_id
    }

    /// Whether the run had no people to place.
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Node centers as `[x0, y0, x1, y1, ...]` in node order.
    pub fn flat_positions(&self) -> Vec<f64> {
        let mut positions = Vec::with_capacity(self.layout.nodes.len() * 2);
        for node in &self.layout.nodes {
            positions.push(node.x());
            positions.push(node.y());
        }
        positions
    }

    /// Build a hit-testing index over the positioned nodes.
    pub fn index(&self) -> LayoutIndex {
        LayoutIndex::from_layout(&self.layout)
    }
}

/// Run the full pipeline over decoded records.
///
/// Fails only on an unusable configuration. Data problems are reported in
/// the output's diagnostics.
pub fn compute_pedigree(records: &[PersonRecord], config: &LayoutConfig) -> Result<PedigreeOutput> {
    config.validate()?;
    let _span = debug_span!("compute_pedigree", records = records.len()).entered();

    let graph = build_family_graph(records);
    let graph = graph.with_root(resolve_root(&graph));
    let (graph, report) = assign_generations(&graph);
    let diagnostics = diagnose(&graph, &report);

    let plan = LayoutPlan::build(&graph);
    let layout = PedigreeLayout::new(config.clone()).compute_plan(&graph, &plan);
    let tree = if config.include_tree {
        build_tree(&graph, &plan)
    } else {
        None
    };

    Ok(PedigreeOutput {
        root: graph.root().clone(),
        layout,
        tree,
        diagnostics,
    })
}

/// Decode a JSON array of records and run the full pipeline.
pub fn compute_pedigree_json(json: &str, config: &LayoutConfig) -> Result<PedigreeOutput> {
    let records = parse_records(json)?;
    compute_pedigree(&records, config)
}

//! Pedigree - WASM Module
//!
//! This module turns flat family member records into a positioned pedigree
//! diagram. It is compiled to WebAssembly and exposes a JavaScript-friendly
//! API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Family graph building, root resolution, generation assignment
//! - `layout`: Family units, subtree widths and node placement
//! - `hierarchy`: Nested tree output built from the same layout plan
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing
//! - `pipeline`: The end-to-end run over one record set

use js_sys::{Array, Float64Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod layout;
pub mod pipeline;
pub mod spatial;

pub use error::{PedigreeError, Result};
pub use pipeline::{PedigreeOutput, compute_pedigree, compute_pedigree_json};

use graph::PersonRecord;
use layout::LayoutConfig;
use spatial::LayoutIndex;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the pedigree layout.
///
/// Holds the configuration, the records of the last load and the result of
/// running the pipeline over them. Every load replaces the previous result.
#[wasm_bindgen]
pub struct PedigreeWasm {
    config: LayoutConfig,
    records: Vec<PersonRecord>,
    loaded: bool,
    output: PedigreeOutput,
    index: LayoutIndex,
}

#[wasm_bindgen]
impl PedigreeWasm {
    /// Create a new layout with an optional config object.
    ///
    /// Missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<PedigreeWasm, JsError> {
        let config = decode_config(config)?;
        Self::with_config(config).map_err(JsError::from)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Run the pipeline over an array of person records.
    ///
    /// Non-array input is rejected. Data problems do not fail the load; they
    /// are reported through `diagnostics()` and logged to the console.
    #[wasm_bindgen(js_name = loadRecords)]
    pub fn load_records(&mut self, records: JsValue) -> std::result::Result<(), JsError> {
        if !Array::is_array(&records) {
            return Err(PedigreeError::NotAnArray(describe(&records)).into());
        }
        let records: Vec<PersonRecord> =
            serde_wasm_bindgen::from_value(records).map_err(PedigreeError::from)?;
        self.load(records)?;

        let diagnostics = &self.output.diagnostics;
        if !diagnostics.is_clean() {
            web_sys::console::warn_1(
                &format!(
                    "pedigree: {} dangling, {} duplicate, {} cycle(s), {} unreached",
                    diagnostics.dangling.len(),
                    diagnostics.duplicates.len(),
                    diagnostics.cycles.len(),
                    diagnostics.unreached.len(),
                )
                .into(),
            );
        }
        Ok(())
    }

    /// Replace the configuration and recompute the last loaded records.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> std::result::Result<(), JsError> {
        let config = decode_config(config)?;
        self.reconfigure(config).map_err(JsError::from)
    }

    /// Drop the loaded records and the result.
    pub fn clear(&mut self) {
        self.records.clear();
        self.loaded = false;
        self.output = PedigreeOutput::default();
        self.index = LayoutIndex::new();
    }

    // =========================================================================
    // Result Access
    // =========================================================================

    /// The resolved root identifier; empty when there is no data.
    #[wasm_bindgen(js_name = rootId)]
    pub fn root_id(&self) -> String {
        self.output.root_id().as_str().to_owned()
    }

    /// Get the number of positioned nodes, union connectors included.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.output.layout.nodes.len() as u32
    }

    /// Get the number of connector edges.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.output.layout.edges.len() as u32
    }

    /// Whether the last load produced no nodes.
    ///
    /// Distinguishes an empty family from "nothing loaded yet" together with
    /// `isLoaded()`.
    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Whether any record set has been loaded since creation or `clear()`.
    #[wasm_bindgen(js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Positioned nodes as plain objects, tagged by `kind`.
    pub fn nodes(&self) -> std::result::Result<JsValue, JsError> {
        to_js(&self.output.layout.nodes)
    }

    /// Connector edges as plain objects.
    pub fn edges(&self) -> std::result::Result<JsValue, JsError> {
        to_js(&self.output.layout.edges)
    }

    /// The nested tree, or `null` when empty or disabled by config.
    pub fn tree(&self) -> std::result::Result<JsValue, JsError> {
        to_js(&self.output.tree)
    }

    /// Structural findings of the last load.
    pub fn diagnostics(&self) -> std::result::Result<JsValue, JsError> {
        to_js(&self.output.diagnostics)
    }

    /// The whole result as one object.
    pub fn output(&self) -> std::result::Result<JsValue, JsError> {
        to_js(&self.output)
    }

    /// Node centers as a Float64Array of [x0, y0, x1, y1, ...] in node order.
    pub fn positions(&self) -> Float64Array {
        Float64Array::from(&self.output.flat_positions()[..])
    }

    /// Subtree width of the root unit.
    pub fn width(&self) -> f64 {
        self.output.layout.width
    }

    /// Get the bounding box of all node centers.
    ///
    /// Returns [min_x, min_y, max_x, max_y], or None if the layout is empty.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f64>> {
        self.output
            .layout
            .bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the person nearest to a point, within a maximum distance.
    #[wasm_bindgen(js_name = findNodeAt)]
    pub fn find_node_at(&self, x: f64, y: f64, max_distance: f64) -> Option<String> {
        self.index
            .nearest_within(x, y, max_distance)
            .map(|key| key.as_str().to_owned())
    }

    /// Find all nodes, union connectors included, inside a rectangle.
    #[wasm_bindgen(js_name = findNodesInRect)]
    pub fn find_nodes_in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<String> {
        self.index
            .in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|key| key.as_str().to_owned())
            .collect()
    }
}

impl PedigreeWasm {
    /// Create a layout from an already-decoded configuration.
    pub fn with_config(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            records: Vec::new(),
            loaded: false,
            output: PedigreeOutput::default(),
            index: LayoutIndex::new(),
        })
    }

    /// Run the pipeline over decoded records, replacing the last result.
    pub fn load(&mut self, records: Vec<PersonRecord>) -> Result<()> {
        let output = compute_pedigree(&records, &self.config)?;
        self.index = output.index();
        self.output = output;
        self.records = records;
        self.loaded = true;
        Ok(())
    }

    /// Swap the configuration and recompute the current records.
    pub fn reconfigure(&mut self, config: LayoutConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        let records = std::mem::take(&mut self.records);
        self.load(records)
    }

    /// The result of the last load.
    pub fn result(&self) -> &PedigreeOutput {
        &self.output
    }

    /// The active configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

impl Default for PedigreeWasm {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
            records: Vec::new(),
            loaded: false,
            output: PedigreeOutput::default(),
            index: LayoutIndex::new(),
        }
    }
}

fn decode_config(value: JsValue) -> std::result::Result<LayoutConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(LayoutConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(value).map_err(PedigreeError::from)?)
}

/// Serialize with maps as plain objects, which flattened fields need.
fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer).map_err(PedigreeError::from)?)
}

fn describe(value: &JsValue) -> &'static str {
    if value.is_undefined() {
        "undefined"
    } else if value.is_null() {
        "null"
    } else if value.is_string() {
        "a string"
    } else if value.as_bool().is_some() {
        "a boolean"
    } else if value.as_f64().is_some() {
        "a number"
    } else {
        "an object"
    }
}

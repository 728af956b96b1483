//! Error types for the pedigree pipeline.
//!
//! Only shape errors are reported here. Data problems such as dangling
//! references, lineage cycles or a missing root are tolerated by the
//! pipeline and surface through the result (see `graph::diagnostics`).

use thiserror::Error;

/// Errors raised when input is not of the expected shape at all.
#[derive(Debug, Error)]
pub enum PedigreeError {
    /// The input could not be decoded as person records.
    #[error("failed to decode person records: {0}")]
    Decode(#[from] serde_json::Error),

    /// The input parsed, but its top level is not an array.
    #[error("expected an array of person records, found {0}")]
    NotAnArray(&'static str),

    /// A value crossing the WebAssembly boundary could not be converted.
    #[error("binding conversion failed: {0}")]
    Binding(String),

    /// A layout configuration value is unusable.
    #[error("invalid layout config: {field} must be finite and non-negative (got {value})")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl From<serde_wasm_bindgen::Error> for PedigreeError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Binding(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PedigreeError>;

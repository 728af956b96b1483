//! Family graph data structures and operations.
//!
//! Records are normalized into a `FamilyGraph` of people with symmetric
//! parent, child and spouse lists. Traversals (root resolution, generation
//! assignment, diagnostics) work on that graph and return new values instead
//! of mutating it in place.

mod builder;
mod diagnostics;
mod edge;
mod family;
mod generation;
mod node;
mod record;
mod roots;

pub use builder::build_family_graph;
pub use diagnostics::{DanglingReference, Diagnostics, diagnose};
pub use edge::{Kinship, RelationSlot};
pub use family::FamilyGraph;
pub use generation::{GenerationReport, ROOT_GENERATION, Visited, assign_generations, traverse};
pub use node::{
    DEFAULT_GENERATION, FamilyNode, GenerationSource, LifeDate, PersonDetails, PersonId, Sex,
};
pub use record::{PersonRecord, parse_records};
pub use roots::{RootSelection, RootSource, resolve_root};

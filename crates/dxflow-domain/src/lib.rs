//! dxflow Domain Layer
//!
//! Core data model for turning a clinical note into a diagnostic workflow
//! graph. Every other crate in the workspace builds on these types.
//!
//! ## Key Concepts
//!
//! - **Concept**: a tagged medical term extracted or synthesized from note text
//! - **GraphNode / GraphEdge**: the renderable workflow graph
//! - **ProblemListItem**: a coded, documentation-oriented diagnosis entry
//! - **AnalysisResult**: the aggregate produced by one analysis run
//! - **LayoutPlan**: the chosen drawing algorithm and its parameters
//!
//! ## Architecture
//!
//! - Pure data and invariants only, no I/O
//! - `serde` derives define the JSON shape consumed by the renderer
//! - Trait definitions for external interactions (the inference service)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod concept;
pub mod graph;
pub mod layout;
pub mod problem;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisId, AnalysisMetadata, AnalysisResult, AnalysisSource};
pub use concept::{Concept, ConceptCategory};
pub use graph::{
    EdgeStrength, GraphEdge, GraphNode, NodeDetail, NodeKind, Position, Priority,
    RelationshipKind,
};
pub use layout::{ClusterCenter, LayoutAlgorithm, LayoutPlan};
pub use problem::{ProblemListItem, ProblemStatus};

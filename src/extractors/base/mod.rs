// Base Extractor Types for umlscan
//
// - types.rs: data model (TypeDeclaration, Field, Operation, Relationship, ...)
// - extractor.rs: BaseExtractor, the per-unit state every front-end wraps

pub mod extractor;
pub mod types;

// Re-export key types for external use
pub use extractor::BaseExtractor;
pub use types::{
    ExtractionResults, Field, Member, Operation, Parameter, Relationship, RelationshipKind,
    TypeDeclaration, TypeKind, Visibility, VOID,
};

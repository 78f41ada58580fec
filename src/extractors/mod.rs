//! Source front-ends.
//!
//! Each front-end turns the raw text of one source unit into type
//! declarations. None of them keeps state between units.
//!
//! # Architecture
//!
//! - `base` - data model and the per-unit `BaseExtractor`
//! - `scanner` - literal-aware comment stripping and brace matching
//! - `java` - object-oriented source front-end (line-shape recognizers)
//! - `plantuml` - textual class-diagram reader
//! - `manager` - `ExtractorManager` public API and format detection

pub mod base;
pub mod java;
pub mod manager;
pub mod plantuml;
pub mod scanner;

// Re-export the public API
pub use base::{
    ExtractionResults, Field, Member, Operation, Parameter, Relationship, RelationshipKind,
    TypeDeclaration, TypeKind, Visibility,
};
pub use manager::{ExtractorManager, SourceFormat, UnitExtraction};

// PyO3 Bindings Module
//
// Python surface over the conversion pipeline. Built only with the `python`
// cargo feature.

mod api;
mod conversion_result;
mod relationship;

// Re-export for lib.rs
pub use api::{convert_directory, convert_sources, detect_format};
pub use conversion_result::PyConversionResult;
pub use relationship::PyRelationship;

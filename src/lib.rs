// umlscan core - class-model extraction from object-oriented source
//
// Pipeline: source units -> front-ends (`extractors`) -> `model::Model`
// -> relationship inference (`inference`) -> `model::Assembler`
// -> renderers (`serializer`). `pipeline` drives one run end to end.

pub mod discovery;
pub mod error;
pub mod extractors;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod serializer;
pub mod typeref;
pub mod utils;

// PyO3 bindings layer
#[cfg(feature = "python")]
pub mod bindings;

pub use error::{Diagnostic, DiagnosticKind, ExtractionError};
pub use extractors::{ExtractorManager, SourceFormat};
pub use inference::{
    ClassificationOrder, DependencyInference, InferenceConfig, RelationshipEngine,
};
pub use model::{AssembledModel, Assembler, Model};
pub use pipeline::{
    convert, convert_directory, Conversion, ConversionConfig, ConversionOutput, SourceUnit,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// umlscan core Python module
///
/// Converts Java sources and PlantUML class diagrams into XMI, PlantUML and
/// JSON class models.
#[cfg(feature = "python")]
#[pymodule]
fn umlscan_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Add Python functions
    m.add_function(wrap_pyfunction!(bindings::convert_sources, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::convert_directory, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::detect_format, m)?)?;

    // Add Python classes
    m.add_class::<bindings::PyConversionResult>()?;
    m.add_class::<bindings::PyRelationship>()?;

    Ok(())
}

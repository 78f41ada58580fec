// API Functions - PyO3-exposed functions for Python
//
// Thin wrappers over `pipeline`. The GIL is released while a run is in
// progress; runs share no state, so concurrent calls are independent.

use super::PyConversionResult;
use crate::discovery::DiscoveryOptions;
use crate::extractors::SourceFormat;
use crate::pipeline::{self, ConversionConfig, SourceUnit};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::path::PathBuf;

fn run_config(model_name: Option<String>, package_filter: Option<String>) -> ConversionConfig {
    let mut config = ConversionConfig::default();
    if let Some(name) = model_name {
        config.model_name = name;
    }
    config.package_filter = package_filter;
    config
}

/// Convert in-memory sources into a class model
///
/// Args:
///     units (list[tuple[str, str]]): (identifier, text) pairs in traversal order
///     model_name (str | None): Model name, "Class Model" by default
///     package_filter (str | None): Keep only types in packages with this prefix
///
/// Returns:
///     ConversionResult: rendered documents, relationships and diagnostics
#[pyfunction]
#[pyo3(signature = (units, model_name=None, package_filter=None))]
pub fn convert_sources(
    py: Python<'_>,
    units: Vec<(String, String)>,
    model_name: Option<String>,
    package_filter: Option<String>,
) -> PyResult<PyConversionResult> {
    let config = run_config(model_name, package_filter);
    let result = py.detach(move || {
        let units: Vec<SourceUnit> = units
            .into_iter()
            .map(|(id, text)| SourceUnit::new(id, text))
            .collect();
        PyConversionResult::from_output(pipeline::convert(&units, &config))
    });
    result.map_err(|e| PyValueError::new_err(format!("Conversion failed: {}", e)))
}

/// Discover sources under a directory and convert them
///
/// Args:
///     path (str): Root directory
///     extensions (list[str] | None): Extensions to read, ["java"] by default
///     model_name (str | None): Model name
///     package_filter (str | None): Package prefix filter
///
/// Raises:
///     ValueError: If the root is not a directory
#[pyfunction]
#[pyo3(signature = (path, extensions=None, model_name=None, package_filter=None))]
pub fn convert_directory(
    py: Python<'_>,
    path: String,
    extensions: Option<Vec<String>>,
    model_name: Option<String>,
    package_filter: Option<String>,
) -> PyResult<PyConversionResult> {
    let config = run_config(model_name, package_filter);
    let mut options = DiscoveryOptions::default();
    if let Some(extensions) = extensions {
        options.extensions = extensions;
    }
    let root = PathBuf::from(path);
    let result = py.detach(move || {
        pipeline::convert_directory(&root, &options, &config)
            .and_then(PyConversionResult::from_output)
    });
    result.map_err(|e| PyValueError::new_err(format!("Conversion failed: {}", e)))
}

/// Front-end that would read a unit: "java" or "plantuml"
#[pyfunction]
#[pyo3(signature = (id, text))]
pub fn detect_format(id: &str, text: &str) -> String {
    SourceFormat::detect(id, text).to_string()
}

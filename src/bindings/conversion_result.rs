// PyConversionResult - PyO3 wrapper for a finished conversion run
//
// Documents are rendered once, when the result is built, so Python callers
// can read them repeatedly without re-running the serializers.

use super::PyRelationship;
use crate::error::Diagnostic;
use crate::model::assembler::AssembledRelationship;
use crate::pipeline::ConversionOutput;
use pyo3::prelude::*;
use std::collections::HashMap;

/// Python-accessible conversion result
#[pyclass(name = "ConversionResult")]
pub struct PyConversionResult {
    model_name: String,
    xmi: String,
    plantuml: String,
    json: String,
    type_count: usize,
    relationships: Vec<AssembledRelationship>,
    diagnostics: Vec<Diagnostic>,
}

impl PyConversionResult {
    pub fn from_output(output: ConversionOutput) -> anyhow::Result<Self> {
        Ok(PyConversionResult {
            model_name: output.model.name().to_string(),
            xmi: output.to_xmi(),
            plantuml: output.to_plantuml(),
            json: output.to_json()?,
            type_count: output.model.types().len(),
            relationships: output.model.relationships().to_vec(),
            diagnostics: output.diagnostics(),
        })
    }
}

#[pymethods]
impl PyConversionResult {
    #[getter]
    fn model_name(&self) -> String {
        self.model_name.clone()
    }

    #[getter]
    fn xmi(&self) -> String {
        self.xmi.clone()
    }

    #[getter]
    fn plantuml(&self) -> String {
        self.plantuml.clone()
    }

    #[getter]
    fn json(&self) -> String {
        self.json.clone()
    }

    #[getter]
    fn type_count(&self) -> usize {
        self.type_count
    }

    #[getter]
    fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    #[getter]
    fn relationships(&self) -> Vec<PyRelationship> {
        self.relationships
            .iter()
            .map(|r| PyRelationship::from_relationship(r.clone()))
            .collect()
    }

    /// Each diagnostic as `{"kind": ..., "unit": ..., "message": ...}`
    #[getter]
    fn diagnostics(&self) -> Vec<HashMap<String, String>> {
        self.diagnostics
            .iter()
            .map(|d| {
                HashMap::from([
                    ("kind".to_string(), d.kind.to_string()),
                    ("unit".to_string(), d.unit.clone()),
                    ("message".to_string(), d.message.clone()),
                ])
            })
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "ConversionResult(model='{}', types={}, relationships={}, diagnostics={})",
            self.model_name,
            self.type_count,
            self.relationships.len(),
            self.diagnostics.len()
        )
    }
}

// PyRelationship - PyO3 wrapper for an assembled relationship
//
// Endpoints are exposed both by name and by the element ids used in the
// interchange document.

use crate::model::assembler::AssembledRelationship;
use pyo3::prelude::*;

/// Python-accessible Relationship wrapper
#[pyclass(name = "Relationship")]
pub struct PyRelationship {
    inner: AssembledRelationship,
}

impl PyRelationship {
    pub fn from_relationship(relationship: AssembledRelationship) -> Self {
        PyRelationship {
            inner: relationship,
        }
    }
}

#[pymethods]
impl PyRelationship {
    #[getter]
    fn id(&self) -> String {
        self.inner.id.clone()
    }

    #[getter]
    fn kind(&self) -> String {
        self.inner.kind.to_string()
    }

    #[getter]
    fn source(&self) -> String {
        self.inner.source.clone()
    }

    #[getter]
    fn target(&self) -> String {
        self.inner.target.clone()
    }

    #[getter]
    fn source_id(&self) -> String {
        self.inner.source_id.clone()
    }

    #[getter]
    fn target_id(&self) -> String {
        self.inner.target_id.clone()
    }

    #[getter]
    fn label(&self) -> Option<String> {
        self.inner.label.clone()
    }

    #[getter]
    fn multiplicity(&self) -> Option<String> {
        self.inner.multiplicity.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "Relationship(kind='{}', source='{}', target='{}', label={:?})",
            self.inner.kind,
            self.inner.source,
            self.inner.target,
            self.inner.label
        )
    }
}

//! Recoverable extraction errors.
//!
//! Nothing in here aborts a conversion run. Every error is attached to the
//! source unit it came from and collected as a diagnostic, so the caller still
//! gets the partial model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a recoverable condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A line or body matched no recognition grammar
    MalformedInput,
    /// A referenced type name is not part of the model
    UnresolvedReference,
    /// An opening brace has no matching close
    StructuralMismatch,
    /// A source unit could not be read
    Io,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::MalformedInput => write!(f, "malformed-input"),
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved-reference"),
            DiagnosticKind::StructuralMismatch => write!(f, "structural-mismatch"),
            DiagnosticKind::Io => write!(f, "io"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{unit}: malformed input: {detail}")]
    MalformedInput { unit: String, detail: String },

    #[error("{unit}: unresolved reference from `{from}` to `{name}`")]
    UnresolvedReference {
        unit: String,
        from: String,
        name: String,
    },

    #[error("{unit}: unbalanced braces in body of `{type_name}`")]
    StructuralMismatch { unit: String, type_name: String },

    #[error("{unit}: {source}")]
    Io {
        unit: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractionError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ExtractionError::MalformedInput { .. } => DiagnosticKind::MalformedInput,
            ExtractionError::UnresolvedReference { .. } => DiagnosticKind::UnresolvedReference,
            ExtractionError::StructuralMismatch { .. } => DiagnosticKind::StructuralMismatch,
            ExtractionError::Io { .. } => DiagnosticKind::Io,
        }
    }

    /// Identifier of the source unit the condition was found in
    pub fn unit(&self) -> &str {
        match self {
            ExtractionError::MalformedInput { unit, .. }
            | ExtractionError::UnresolvedReference { unit, .. }
            | ExtractionError::StructuralMismatch { unit, .. }
            | ExtractionError::Io { unit, .. } => unit,
        }
    }
}

/// Serializable snapshot of an [`ExtractionError`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub unit: String,
    pub message: String,
}

impl From<&ExtractionError> for Diagnostic {
    fn from(err: &ExtractionError) -> Self {
        Self {
            kind: err.kind(),
            unit: err.unit().to_string(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_unit() {
        let err = ExtractionError::StructuralMismatch {
            unit: "src/Cart.java".to_string(),
            type_name: "Cart".to_string(),
        };
        assert_eq!(err.kind(), DiagnosticKind::StructuralMismatch);
        assert_eq!(err.unit(), "src/Cart.java");
        assert_eq!(
            err.to_string(),
            "src/Cart.java: unbalanced braces in body of `Cart`"
        );
    }

    #[test]
    fn test_diagnostic_snapshot() {
        let err = ExtractionError::Io {
            unit: "missing.java".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.kind, DiagnosticKind::Io);
        assert_eq!(diag.to_string(), "[io] missing.java: not found");
    }
}

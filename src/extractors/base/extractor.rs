// BaseExtractor implementation for umlscan
//
// Per-unit state shared by every front-end: the unit identifier, its raw
// text, and the recoverable errors found while reading it.

use tracing::{debug, warn};

use crate::error::ExtractionError;

/// Base implementation for source front-ends
pub struct BaseExtractor {
    pub unit_id: String,
    pub content: String,
    errors: Vec<ExtractionError>,
}

impl BaseExtractor {
    pub fn new(unit_id: String, content: String) -> Self {
        debug!("BaseExtractor unit '{}' ({} bytes)", unit_id, content.len());
        Self {
            unit_id,
            content,
            errors: Vec::new(),
        }
    }

    /// Record a recoverable condition and keep going
    pub fn report(&mut self, error: ExtractionError) {
        warn!("{}", error);
        self.errors.push(error);
    }

    pub fn malformed(&mut self, detail: impl Into<String>) {
        let error = ExtractionError::MalformedInput {
            unit: self.unit_id.clone(),
            detail: detail.into(),
        };
        self.report(error);
    }

    pub fn structural_mismatch(&mut self, type_name: &str) {
        let error = ExtractionError::StructuralMismatch {
            unit: self.unit_id.clone(),
            type_name: type_name.to_string(),
        };
        self.report(error);
    }

    pub fn errors(&self) -> &[ExtractionError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<ExtractionError> {
        std::mem::take(&mut self.errors)
    }

    /// Safely truncate a string to a maximum number of characters (not bytes)
    pub fn truncate_string(text: &str, max_chars: usize) -> String {
        let char_count = text.chars().count();
        if char_count <= max_chars {
            text.to_string()
        } else {
            text.chars().take(max_chars).collect::<String>() + "..."
        }
    }
}

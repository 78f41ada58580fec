//! ExtractorManager - Public API for type extraction
//!
//! Decides which front-end reads a source unit (object-oriented source or a
//! textual class diagram) and hands back its declarations together with the
//! recoverable errors found on the way.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ExtractionError;
use crate::extractors::base::ExtractionResults;
use crate::extractors::java::JavaExtractor;
use crate::extractors::plantuml::{self, PlantUmlExtractor};

/// Extensions read by the diagram front-end
const DIAGRAM_EXTENSIONS: &[&str] = &["puml", "plantuml", "pu", "iuml"];

/// Input grammar of a source unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Java,
    PlantUml,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Java => write!(f, "java"),
            SourceFormat::PlantUml => write!(f, "plantuml"),
        }
    }
}

impl SourceFormat {
    pub fn from_extension(unit_id: &str) -> Option<Self> {
        let extension = Path::new(unit_id).extension()?.to_str()?.to_lowercase();
        if DIAGRAM_EXTENSIONS.contains(&extension.as_str()) {
            Some(SourceFormat::PlantUml)
        } else if extension == "java" {
            Some(SourceFormat::Java)
        } else {
            None
        }
    }

    /// Pick the front-end for a unit. A known extension decides; otherwise a
    /// `@startuml` marker or any diagram-shaped member line, on its own or
    /// inside a one-line block, selects the diagram reader.
    pub fn detect(unit_id: &str, text: &str) -> Self {
        if let Some(format) = Self::from_extension(unit_id) {
            return format;
        }
        let diagram_shaped = |line: &str| {
            plantuml::is_diagram_member_line(line) || plantuml::is_inline_diagram_block(line)
        };
        if text.contains("@startuml") || text.lines().any(diagram_shaped) {
            SourceFormat::PlantUml
        } else {
            SourceFormat::Java
        }
    }
}

/// Output of one front-end run over one unit
#[derive(Debug, Default)]
pub struct UnitExtraction {
    pub results: ExtractionResults,
    pub errors: Vec<ExtractionError>,
}

/// Manager for the source front-ends
pub struct ExtractorManager {
    // Stateless: each call builds a fresh front-end for its unit
}

impl Default for ExtractorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorManager {
    pub fn new() -> Self {
        Self {}
    }

    pub fn supported_formats(&self) -> Vec<SourceFormat> {
        vec![SourceFormat::Java, SourceFormat::PlantUml]
    }

    /// Extract type declarations from one unit, detecting its format
    pub fn extract(&self, unit_id: &str, content: &str) -> UnitExtraction {
        let format = SourceFormat::detect(unit_id, content);
        self.extract_as(format, unit_id, content)
    }

    /// Extract type declarations from one unit with a known format
    pub fn extract_as(&self, format: SourceFormat, unit_id: &str, content: &str) -> UnitExtraction {
        let (results, errors) = match format {
            SourceFormat::Java => {
                let mut extractor = JavaExtractor::new(unit_id.to_string(), content.to_string());
                let results = extractor.extract();
                (results, extractor.take_errors())
            }
            SourceFormat::PlantUml => {
                let mut extractor =
                    PlantUmlExtractor::new(unit_id.to_string(), content.to_string());
                let results = extractor.extract();
                (results, extractor.take_errors())
            }
        };

        tracing::debug!(
            "Extracted {} types from {} unit: {} ({} errors)",
            results.types.len(),
            format,
            unit_id,
            errors.len()
        );
        UnitExtraction { results, errors }
    }
}

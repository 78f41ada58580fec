//! Conversion run driver.
//!
//! One [`Conversion`] owns the model for a single run: units are fed in
//! traversal order, then [`Conversion::finish`] filters the model, infers
//! relationships, merges declared links and assembles the frozen model that
//! the serializers read. Nothing is shared between runs.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::discovery::{self, DiscoveryOptions};
use crate::error::{Diagnostic, ExtractionError};
use crate::extractors::base::Relationship;
use crate::extractors::ExtractorManager;
use crate::inference::{InferenceConfig, RelationshipEngine};
use crate::model::{AssembledModel, Assembler, Model};
use crate::serializer::{self, RenderOptions};

pub const DEFAULT_MODEL_NAME: &str = "Class Model";

/// One source unit: an identifier (usually a relative path) and its text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceUnit {
    pub id: String,
    pub text: String,
}

impl SourceUnit {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Settings for one conversion run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConversionConfig {
    pub model_name: String,
    /// Keep only types whose package starts with this prefix
    pub package_filter: Option<String>,
    /// Keep only the first N types in traversal order
    pub max_types: Option<usize>,
    pub inference: InferenceConfig,
    pub render: RenderOptions,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            package_filter: None,
            max_types: None,
            inference: InferenceConfig::default(),
            render: RenderOptions::default(),
        }
    }
}

impl ConversionConfig {
    /// Load a config from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn keeps_package(&self, package: &str) -> bool {
        match self.package_filter.as_deref() {
            None | Some("") => true,
            Some(prefix) => !package.is_empty() && package.starts_with(prefix),
        }
    }
}

/// A conversion run in progress
pub struct Conversion {
    config: ConversionConfig,
    manager: ExtractorManager,
    model: Model,
    /// Declared links per unit, merged after inference
    declared: Vec<(String, Vec<Relationship>)>,
    errors: Vec<ExtractionError>,
    units: usize,
}

impl Conversion {
    pub fn new(config: ConversionConfig) -> Self {
        let model = Model::new(&config.model_name);
        Self {
            config,
            manager: ExtractorManager::new(),
            model,
            declared: Vec::new(),
            errors: Vec::new(),
            units: 0,
        }
    }

    /// Extract one unit into the model
    pub fn add_unit(&mut self, unit: &SourceUnit) {
        let extraction = self.manager.extract(&unit.id, &unit.text);
        self.units += 1;
        for decl in extraction.results.types {
            self.model.add_type(decl);
        }
        if !extraction.results.relationships.is_empty() {
            self.declared
                .push((unit.id.clone(), extraction.results.relationships));
        }
        self.errors.extend(extraction.errors);
    }

    /// Record a condition found outside extraction (an unreadable unit)
    pub fn add_error(&mut self, error: ExtractionError) {
        self.errors.push(error);
    }

    /// Filter, infer, merge and assemble
    pub fn finish(mut self) -> ConversionOutput {
        let config = &self.config;
        if config.package_filter.is_some() {
            self.model.retain_types(|t| config.keeps_package(&t.package));
        }
        if let Some(max) = config.max_types {
            if self.model.len() > max {
                warn!(
                    "found {} types, keeping the first {}",
                    self.model.len(),
                    max
                );
                self.model.truncate(max);
            }
        }

        let engine = RelationshipEngine::new(config.inference);
        let inferred = engine.apply(&mut self.model);

        for (unit, links) in std::mem::take(&mut self.declared) {
            for rejected in engine.merge_declared(&mut self.model, links) {
                warn!(
                    "{}: dropping declared {} from `{}` to `{}`",
                    unit, rejected.kind, rejected.source, rejected.target
                );
                let name = if self.model.contains(&rejected.source) {
                    rejected.target
                } else {
                    rejected.source.clone()
                };
                self.errors.push(ExtractionError::UnresolvedReference {
                    unit: unit.clone(),
                    from: rejected.source,
                    name,
                });
            }
        }

        let (model, assembly_errors) = Assembler::new(&config.model_name).assemble(&self.model);
        self.errors.extend(assembly_errors);

        info!(
            "converted {} units into `{}`: {} types, {} relationships ({} inferred), {} diagnostics",
            self.units,
            model.name(),
            model.types().len(),
            model.relationships().len(),
            inferred,
            self.errors.len()
        );

        ConversionOutput {
            model,
            errors: self.errors,
            render: self.config.render,
        }
    }
}

/// Result of a finished run: the frozen model and every recoverable error
#[derive(Debug)]
pub struct ConversionOutput {
    pub model: AssembledModel,
    pub errors: Vec<ExtractionError>,
    render: RenderOptions,
}

impl ConversionOutput {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(Diagnostic::from).collect()
    }

    pub fn to_xmi(&self) -> String {
        serializer::to_xmi(&self.model)
    }

    /// Diagram text using the run's render options
    pub fn to_plantuml(&self) -> String {
        serializer::to_plantuml(&self.model, &self.render)
    }

    pub fn to_json(&self) -> Result<String> {
        serializer::to_json(&self.model)
    }
}

/// Convert in-memory units in the given order
pub fn convert(units: &[SourceUnit], config: &ConversionConfig) -> ConversionOutput {
    let mut conversion = Conversion::new(config.clone());
    for unit in units {
        conversion.add_unit(unit);
    }
    conversion.finish()
}

/// Discover units under `root` and convert them. Unreadable files become
/// diagnostics; only a missing root fails.
pub fn convert_directory(
    root: &Path,
    discovery_options: &DiscoveryOptions,
    config: &ConversionConfig,
) -> Result<ConversionOutput> {
    let discovered = discovery::collect_sources(root, discovery_options)?;
    let mut conversion = Conversion::new(config.clone());
    for error in discovered.errors {
        conversion.add_error(error);
    }
    for unit in &discovered.units {
        conversion.add_unit(unit);
    }
    Ok(conversion.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;
    use crate::extractors::base::RelationshipKind;
    use crate::inference::ClassificationOrder;

    #[test]
    fn test_config_defaults_and_json() {
        let config = ConversionConfig::default();
        assert_eq!(config.model_name, "Class Model");
        assert!(config.render.max_fields.is_none());

        let config = ConversionConfig::from_json_str(
            r#"{"model_name": "World", "max_types": 3, "inference": {"order": "collection_first"}}"#,
        )
        .unwrap();
        assert_eq!(config.model_name, "World");
        assert_eq!(config.max_types, Some(3));
        assert_eq!(config.inference.order, ClassificationOrder::CollectionFirst);
        assert!(config.package_filter.is_none());

        assert!(ConversionConfig::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_package_filter() {
        let units = vec![
            SourceUnit::new("a/A.java", "package com.acme.core; class A { B b; }"),
            SourceUnit::new("b/B.java", "package com.acme.core.sub; class B {}"),
            SourceUnit::new("c/C.java", "package org.other; class C {}"),
            SourceUnit::new("D.java", "class D {}"),
        ];
        let config = ConversionConfig {
            package_filter: Some("com.acme".to_string()),
            ..Default::default()
        };
        let output = convert(&units, &config);
        let names: Vec<_> = output.model.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(output.model.relationships().len(), 1);
    }

    #[test]
    fn test_max_types_keeps_traversal_order() {
        let units: Vec<_> = ["Alpha", "Beta", "Gamma"]
            .iter()
            .map(|n| SourceUnit::new(format!("{n}.java"), format!("class {n} {{}}")))
            .collect();
        let config = ConversionConfig {
            max_types: Some(2),
            ..Default::default()
        };
        let output = convert(&units, &config);
        let names: Vec<_> = output.model.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_declared_links_merge_without_duplicates() {
        let diagram = "class Inventory {\n-items : List<Item>\n}\nclass Item {\n}\nInventory o-- \"*\" Item : items\nInventory ..> Item : restock\nInventory --> Ghost\n";
        let output = convert(
            &[SourceUnit::new("shop.puml", diagram)],
            &ConversionConfig::default(),
        );
        let kinds: Vec<_> = output.model.relationships().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RelationshipKind::Aggregation, RelationshipKind::Dependency]
        );
        let diagnostics = output.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnresolvedReference);
        assert_eq!(diagnostics[0].unit, "shop.puml");
    }

    #[test]
    fn test_errors_do_not_abort_the_run() {
        let units = vec![
            SourceUnit::new("Broken.java", "class Broken { void f() { "),
            SourceUnit::new("Fine.java", "class Fine { int x; }"),
        ];
        let output = convert(&units, &ConversionConfig::default());
        assert!(output.model.find_type("Fine").is_some());
        assert!(output.model.find_type("Broken").is_none());
        assert_eq!(output.errors[0].kind(), DiagnosticKind::StructuralMismatch);
        assert!(output.to_xmi().contains("name=\"Fine\""));
    }
}

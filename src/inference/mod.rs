//! Relationship inference.
//!
//! Walks every field of every modeled type and turns references to other
//! modeled types into structural relationships, converts declared supertypes
//! into generalization/realization links, and optionally derives usage
//! dependencies from operation parameters.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::extractors::base::{Field, Operation, Relationship, RelationshipKind, TypeDeclaration};
use crate::model::Model;
use crate::typeref;

/// Which claim wins for a field that is both readonly and collection-valued
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationOrder {
    /// readonly -> composition, then collection -> aggregation
    #[default]
    CompositionFirst,
    /// collection -> aggregation, then readonly -> composition
    CollectionFirst,
}

/// Which operations contribute dependency relationships
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DependencyInference {
    #[default]
    Off,
    /// Only operations that look like they act on their arguments
    KeyOperations,
    AllOperations,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct InferenceConfig {
    pub order: ClassificationOrder,
    pub dependencies: DependencyInference,
}

const ACCESSOR_PREFIXES: &[&str] = &["get", "set", "is"];
const OBJECT_METHODS: &[&str] = &["toString", "hashCode", "equals"];
const KEY_OPERATION_WORDS: &[&str] = &[
    "generate", "create", "add", "remove", "process", "handle", "load", "save", "update",
];

pub struct RelationshipEngine {
    config: InferenceConfig,
}

impl Default for RelationshipEngine {
    fn default() -> Self {
        Self::new(InferenceConfig::default())
    }
}

impl RelationshipEngine {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Relationship kind for a field that references a modeled type
    pub fn classify(&self, field: &Field) -> RelationshipKind {
        let owned = field.is_readonly && !field.is_static;
        let collection = typeref::is_collection_type(&field.declared_type);
        match self.config.order {
            ClassificationOrder::CompositionFirst if owned => RelationshipKind::Composition,
            ClassificationOrder::CompositionFirst if collection => RelationshipKind::Aggregation,
            ClassificationOrder::CollectionFirst if collection => RelationshipKind::Aggregation,
            ClassificationOrder::CollectionFirst if owned => RelationshipKind::Composition,
            _ => RelationshipKind::Association,
        }
    }

    /// Every relationship implied by the model's declarations
    pub fn infer(&self, model: &Model) -> Vec<Relationship> {
        let mut relationships = Vec::new();
        for decl in model.types() {
            self.infer_field_links(model, decl, &mut relationships);
            infer_supertype_links(model, decl, &mut relationships);
            if self.config.dependencies != DependencyInference::Off {
                self.infer_dependencies(model, decl, &mut relationships);
            }
        }
        debug!(
            "inferred {} relationships over {} types",
            relationships.len(),
            model.len()
        );
        relationships
    }

    /// Infer and append to the model; returns how many were added
    pub fn apply(&self, model: &mut Model) -> usize {
        let inferred = self.infer(model);
        inferred
            .into_iter()
            .filter(|r| model.add_relationship(r.clone()))
            .count()
    }

    /// Append relationships declared in the input (diagram links), skipping
    /// exact duplicates of what is already there. Returns the ones whose
    /// endpoints are not modeled.
    pub fn merge_declared(
        &self,
        model: &mut Model,
        declared: Vec<Relationship>,
    ) -> Vec<Relationship> {
        let mut rejected = Vec::new();
        for relationship in declared {
            if model.relationships().iter().any(|r| r.same_link(&relationship)) {
                continue;
            }
            if !model.add_relationship(relationship.clone()) {
                rejected.push(relationship);
            }
        }
        rejected
    }

    fn infer_field_links(
        &self,
        model: &Model,
        decl: &TypeDeclaration,
        out: &mut Vec<Relationship>,
    ) {
        for field in decl.fields() {
            let target = typeref::base_type_name(&field.declared_type);
            if target == decl.name || !model.contains(&target) {
                continue;
            }
            let relationship = Relationship::new(&decl.name, target, self.classify(field))
                .with_label(&field.name)
                .with_multiplicity(typeref::multiplicity(&field.declared_type));
            out.push(relationship);
        }
    }

    fn infer_dependencies(&self, model: &Model, decl: &TypeDeclaration, out: &mut Vec<Relationship>) {
        let start = out.len();
        for operation in decl.operations().filter(|op| self.contributes(op)) {
            for parameter in &operation.parameters {
                let target = typeref::base_type_name(&parameter.declared_type);
                if target == decl.name || !model.contains(&target) {
                    continue;
                }
                let relationship =
                    Relationship::new(&decl.name, target, RelationshipKind::Dependency)
                        .with_label(&operation.name);
                if !out[start..].iter().any(|r| r.same_link(&relationship)) {
                    out.push(relationship);
                }
            }
        }
    }

    fn contributes(&self, operation: &Operation) -> bool {
        match self.config.dependencies {
            DependencyInference::Off => false,
            DependencyInference::AllOperations => true,
            DependencyInference::KeyOperations => is_key_operation(&operation.name),
        }
    }
}

fn is_key_operation(name: &str) -> bool {
    if OBJECT_METHODS.contains(&name) || ACCESSOR_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return false;
    }
    let lower = name.to_lowercase();
    KEY_OPERATION_WORDS.iter().any(|w| lower.contains(w))
}

/// Declared supertypes that resolve to modeled types
fn infer_supertype_links(model: &Model, decl: &TypeDeclaration, out: &mut Vec<Relationship>) {
    let parents = decl
        .superclass()
        .into_iter()
        .chain(decl.extended_interfaces().iter().map(String::as_str))
        .map(|parent| (parent, RelationshipKind::Generalization));
    let contracts = decl
        .implemented_interfaces()
        .iter()
        .map(|iface| (iface.as_str(), RelationshipKind::Realization));

    for (target, kind) in parents.chain(contracts) {
        if model.contains(target) {
            out.push(Relationship::new(&decl.name, target, kind));
        } else {
            warn!("`{}`: supertype `{}` is not modeled; dropped", decl.name, target);
        }
    }
}

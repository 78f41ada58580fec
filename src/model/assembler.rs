//! Identity assignment and reference resolution.
//!
//! The [`Assembler`] freezes a [`Model`] into an [`AssembledModel`]: every
//! primitive, type, member, literal and relationship gets one opaque id, and
//! every type reference resolves to a primitive, a modeled type, or stays an
//! unresolved name. Ids come from an [`IdRegistry`] owned by the run.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::Model;
use crate::error::ExtractionError;
use crate::extractors::base::{
    Field, Member, Operation, Relationship, RelationshipKind, TypeDeclaration, TypeKind,
    Visibility,
};
use crate::typeref;

/// Issues deterministic element ids for one conversion run.
///
/// An id is `_` followed by the md5 hex digest of `"{model}|{path}"`, where the
/// path names the element's position in the model (`type/Shop/field/0`).
/// The same path always maps to the same id; a digest clash between two
/// different paths is re-hashed with a counter.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    namespace: String,
    by_path: HashMap<String, String>,
    issued: HashMap<String, String>,
}

impl IdRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Id for `path`, issuing one on first use
    pub fn assign(&mut self, path: &str) -> String {
        if let Some(id) = self.by_path.get(path) {
            return id.clone();
        }
        let mut salt = 0u32;
        let id = loop {
            let input = if salt == 0 {
                format!("{}|{}", self.namespace, path)
            } else {
                format!("{}|{}#{}", self.namespace, path, salt)
            };
            let candidate = format!("_{:x}", md5::compute(input.as_bytes()));
            if !self.issued.contains_key(&candidate) {
                break candidate;
            }
            salt += 1;
        };
        self.issued.insert(id.clone(), path.to_string());
        self.by_path.insert(path.to_string(), id.clone());
        id
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

/// Resolution of a declared type string
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "ref", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive { id: String, name: String },
    Declared { id: String, name: String },
    /// Neither primitive nor modeled; consumers treat it as external
    Unresolved { name: String },
}

impl TypeRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            TypeRef::Primitive { id, .. } | TypeRef::Declared { id, .. } => Some(id),
            TypeRef::Unresolved { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeRef::Primitive { name, .. }
            | TypeRef::Declared { name, .. }
            | TypeRef::Unresolved { name } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledPrimitive {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledField {
    pub id: String,
    pub name: String,
    /// Type as written, for the textual renderer
    pub declared_type: String,
    pub type_ref: TypeRef,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_readonly: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledParameter {
    pub id: String,
    pub name: String,
    pub declared_type: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledReturn {
    pub id: String,
    pub declared_type: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledOperation {
    pub id: String,
    pub name: String,
    pub parameters: Vec<AssembledParameter>,
    /// `None` for void operations
    pub returns: Option<AssembledReturn>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum AssembledMember {
    Field(AssembledField),
    Operation(AssembledOperation),
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledLiteral {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledType {
    pub id: String,
    pub name: String,
    pub kind: TypeKind,
    pub package: String,
    pub is_abstract: bool,
    /// Supertype names as declared, resolved or not
    pub superclass: Option<String>,
    pub implemented_interfaces: Vec<String>,
    pub extended_interfaces: Vec<String>,
    pub members: Vec<AssembledMember>,
    pub literals: Vec<AssembledLiteral>,
}

impl AssembledType {
    pub fn fields(&self) -> impl Iterator<Item = &AssembledField> {
        self.members.iter().filter_map(|m| match m {
            AssembledMember::Field(f) => Some(f),
            AssembledMember::Operation(_) => None,
        })
    }

    pub fn operations(&self) -> impl Iterator<Item = &AssembledOperation> {
        self.members.iter().filter_map(|m| match m {
            AssembledMember::Operation(o) => Some(o),
            AssembledMember::Field(_) => None,
        })
    }
}

/// Member-end ids of a two-ended structural link
#[derive(Debug, Clone, Serialize)]
pub struct AssociationEnds {
    pub source_end: String,
    pub target_end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledRelationship {
    pub id: String,
    pub kind: RelationshipKind,
    pub source: String,
    pub source_id: String,
    pub target: String,
    pub target_id: String,
    pub label: Option<String>,
    pub multiplicity: Option<String>,
    /// Present for composition, aggregation and association
    pub ends: Option<AssociationEnds>,
}

/// Frozen, identifier-resolved model. Read-only once built.
#[derive(Debug, Clone, Serialize)]
pub struct AssembledModel {
    id: String,
    name: String,
    primitives: Vec<AssembledPrimitive>,
    types: Vec<AssembledType>,
    relationships: Vec<AssembledRelationship>,
    #[serde(skip)]
    registry: IdRegistry,
}

impl AssembledModel {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primitives(&self) -> &[AssembledPrimitive] {
        &self.primitives
    }

    pub fn types(&self) -> &[AssembledType] {
        &self.types
    }

    pub fn relationships(&self) -> &[AssembledRelationship] {
        &self.relationships
    }

    pub fn registry(&self) -> &IdRegistry {
        &self.registry
    }

    pub fn find_type(&self, name: &str) -> Option<&AssembledType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Whether `id` belongs to a primitive or type node of this model
    pub fn has_classifier(&self, id: &str) -> bool {
        self.primitives.iter().any(|p| p.id == id) || self.types.iter().any(|t| t.id == id)
    }
}

pub struct Assembler {
    model_name: String,
}

impl Assembler {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
        }
    }

    /// Assign ids and resolve references. Relationships whose endpoints are
    /// not registered are dropped and reported.
    pub fn assemble(&self, model: &Model) -> (AssembledModel, Vec<ExtractionError>) {
        let mut registry = IdRegistry::new(&self.model_name);
        let model_id = registry.assign("model");

        let primitives: Vec<AssembledPrimitive> = model
            .primitive_types()
            .iter()
            .map(|name| AssembledPrimitive {
                id: registry.assign(&format!("primitive/{name}")),
                name: name.to_string(),
            })
            .collect();

        // every type is registered before any reference is resolved
        for decl in model.types() {
            registry.assign(&type_path(&decl.name));
        }

        let types = model
            .types()
            .iter()
            .map(|decl| assemble_type(&mut registry, decl))
            .collect();

        let mut errors = Vec::new();
        let mut relationships = Vec::new();
        for (index, relationship) in model.relationships().iter().enumerate() {
            match assemble_relationship(&mut registry, index, relationship) {
                Some(assembled) => relationships.push(assembled),
                None => {
                    warn!(
                        "dropping {} from `{}` to `{}`: endpoint not modeled",
                        relationship.kind, relationship.source, relationship.target
                    );
                    errors.push(ExtractionError::UnresolvedReference {
                        unit: self.model_name.clone(),
                        from: relationship.source.clone(),
                        name: relationship.target.clone(),
                    });
                }
            }
        }

        debug!(
            "assembled `{}`: {} ids issued, {} relationships",
            self.model_name,
            registry.len(),
            relationships.len()
        );

        let assembled = AssembledModel {
            id: model_id,
            name: self.model_name.clone(),
            primitives,
            types,
            relationships,
            registry,
        };
        (assembled, errors)
    }
}

fn type_path(name: &str) -> String {
    format!("type/{name}")
}

fn resolve(registry: &IdRegistry, declared_type: &str) -> TypeRef {
    let name = typeref::base_type_name(declared_type);
    if typeref::is_primitive(&name) {
        if let Some(id) = registry.get(&format!("primitive/{name}")) {
            return TypeRef::Primitive {
                id: id.to_string(),
                name,
            };
        }
    }
    match registry.get(&type_path(&name)) {
        Some(id) => TypeRef::Declared {
            id: id.to_string(),
            name,
        },
        None => TypeRef::Unresolved { name },
    }
}

fn assemble_type(registry: &mut IdRegistry, decl: &TypeDeclaration) -> AssembledType {
    let path = type_path(&decl.name);
    let id = registry.assign(&path);

    let (mut field_index, mut operation_index) = (0, 0);
    let members = decl
        .members
        .iter()
        .map(|member| match member {
            Member::Field(field) => {
                let field_path = format!("{path}/field/{field_index}");
                field_index += 1;
                AssembledMember::Field(assemble_field(registry, &field_path, field))
            }
            Member::Operation(operation) => {
                let op_path = format!("{path}/op/{operation_index}");
                operation_index += 1;
                AssembledMember::Operation(assemble_operation(registry, &op_path, operation))
            }
        })
        .collect();

    let literals = decl
        .enum_literals
        .iter()
        .map(|literal| AssembledLiteral {
            id: registry.assign(&format!("{path}/literal/{literal}")),
            name: literal.clone(),
        })
        .collect();

    AssembledType {
        id,
        name: decl.name.clone(),
        kind: decl.kind,
        package: decl.package.clone(),
        is_abstract: decl.is_abstract,
        superclass: decl.superclass().map(str::to_string),
        implemented_interfaces: decl.implemented_interfaces().to_vec(),
        extended_interfaces: decl.extended_interfaces().to_vec(),
        members,
        literals,
    }
}

fn assemble_field(registry: &mut IdRegistry, path: &str, field: &Field) -> AssembledField {
    AssembledField {
        id: registry.assign(path),
        name: field.name.clone(),
        declared_type: field.declared_type.clone(),
        type_ref: resolve(registry, &field.declared_type),
        visibility: field.visibility,
        is_static: field.is_static,
        is_readonly: field.is_readonly,
    }
}

fn assemble_operation(
    registry: &mut IdRegistry,
    path: &str,
    operation: &Operation,
) -> AssembledOperation {
    let id = registry.assign(path);
    let parameters = operation
        .parameters
        .iter()
        .enumerate()
        .map(|(i, parameter)| AssembledParameter {
            id: registry.assign(&format!("{path}/param/{i}")),
            name: parameter.name.clone(),
            declared_type: parameter.declared_type.clone(),
            type_ref: resolve(registry, &parameter.declared_type),
        })
        .collect();
    let returns = (!operation.returns_void()).then(|| AssembledReturn {
        id: registry.assign(&format!("{path}/return")),
        declared_type: operation.return_type.clone(),
        type_ref: resolve(registry, &operation.return_type),
    });

    AssembledOperation {
        id,
        name: operation.name.clone(),
        parameters,
        returns,
        visibility: operation.visibility,
        is_static: operation.is_static,
        is_abstract: operation.is_abstract,
    }
}

fn assemble_relationship(
    registry: &mut IdRegistry,
    index: usize,
    relationship: &Relationship,
) -> Option<AssembledRelationship> {
    let source_id = registry.get(&type_path(&relationship.source))?.to_string();
    let target_id = registry.get(&type_path(&relationship.target))?.to_string();
    let path = format!("rel/{index}");
    let ends = relationship.kind.is_structural().then(|| AssociationEnds {
        source_end: registry.assign(&format!("{path}/end/source")),
        target_end: registry.assign(&format!("{path}/end/target")),
    });

    Some(AssembledRelationship {
        id: registry.assign(&path),
        kind: relationship.kind,
        source: relationship.source.clone(),
        source_id,
        target: relationship.target.clone(),
        target_id,
        label: relationship.label.clone(),
        multiplicity: relationship.multiplicity.clone(),
        ends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;
    use crate::extractors::base::Parameter;

    fn sample_model() -> Model {
        let mut model = Model::new("Shop");
        let mut inventory = TypeDeclaration::new("Inventory", TypeKind::Class);
        inventory.members.push(Member::Field(Field {
            name: "items".to_string(),
            declared_type: "List<Item>".to_string(),
            visibility: Visibility::Private,
            is_static: false,
            is_readonly: false,
        }));
        inventory.members.push(Member::Field(Field {
            name: "data".to_string(),
            declared_type: "SomeExternalType".to_string(),
            visibility: Visibility::Private,
            is_static: false,
            is_readonly: false,
        }));
        let mut count = Operation::new("count");
        count.return_type = "int".to_string();
        count.parameters.push(Parameter {
            name: "filter".to_string(),
            declared_type: "Item".to_string(),
        });
        inventory.members.push(Member::Operation(count));
        inventory.members.push(Member::Operation(Operation::new("clear")));
        model.add_type(inventory);
        model.add_type(TypeDeclaration::new("Item", TypeKind::Class));
        model.add_relationship(
            Relationship::new("Inventory", "Item", RelationshipKind::Aggregation)
                .with_label("items"),
        );
        model
    }

    #[test]
    fn test_registry_is_deterministic_and_unique() {
        let mut a = IdRegistry::new("m");
        let mut b = IdRegistry::new("m");
        let first = a.assign("type/A");
        assert_eq!(first, b.assign("type/A"));
        assert_eq!(first, a.assign("type/A"));
        assert_ne!(first, a.assign("type/B"));
        assert!(first.starts_with('_'));
        assert_eq!(first.len(), 33);
        assert_ne!(first, IdRegistry::new("other").assign("type/A"));
    }

    #[test]
    fn test_references_resolve_to_primitive_type_or_name() {
        let (assembled, errors) = Assembler::new("Shop").assemble(&sample_model());
        assert!(errors.is_empty());
        assert_eq!(assembled.primitives().len(), typeref::PRIMITIVE_TYPES.len());

        let inventory = assembled.find_type("Inventory").unwrap();
        let item_id = assembled.find_type("Item").unwrap().id.clone();
        let fields: Vec<_> = inventory.fields().collect();
        assert_eq!(fields[0].type_ref.id(), Some(item_id.as_str()));
        assert_eq!(
            fields[1].type_ref,
            TypeRef::Unresolved {
                name: "SomeExternalType".to_string()
            }
        );

        let ops: Vec<_> = inventory.operations().collect();
        let returns = ops[0].returns.as_ref().unwrap();
        assert!(matches!(returns.type_ref, TypeRef::Primitive { ref name, .. } if name == "int"));
        assert_eq!(ops[0].parameters[0].type_ref.id(), Some(item_id.as_str()));
        assert!(ops[1].returns.is_none());
    }

    #[test]
    fn test_relationship_endpoints_are_ids() {
        let (assembled, _) = Assembler::new("Shop").assemble(&sample_model());
        let rel = &assembled.relationships()[0];
        assert!(assembled.has_classifier(&rel.source_id));
        assert!(assembled.has_classifier(&rel.target_id));
        assert!(rel.ends.is_some());
    }

    #[test]
    fn test_ids_are_stable_across_runs() {
        let (first, _) = Assembler::new("Shop").assemble(&sample_model());
        let (second, _) = Assembler::new("Shop").assemble(&sample_model());
        let ids = |m: &AssembledModel| -> Vec<String> {
            m.types().iter().map(|t| t.id.clone()).collect()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn test_dangling_relationship_is_dropped() {
        // `Model` refuses dangling links, so build the broken case by hand
        let mut registry = IdRegistry::new("m");
        registry.assign("type/A");
        let relationship = Relationship::new("A", "Missing", RelationshipKind::Association);
        assert!(assemble_relationship(&mut registry, 0, &relationship).is_none());

        let err = ExtractionError::UnresolvedReference {
            unit: "m".to_string(),
            from: "A".to_string(),
            name: "Missing".to_string(),
        };
        assert_eq!(err.kind(), DiagnosticKind::UnresolvedReference);
    }
}

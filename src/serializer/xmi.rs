//! XMI 2.0 interchange document.
//!
//! The document is built as a small element tree first and printed in one
//! pass, two spaces per nesting level. Every cross-reference is an id issued
//! by the assembler; only unresolved member types fall back to their name.

use std::fmt::Write;

use crate::extractors::base::{RelationshipKind, TypeKind};
use crate::model::assembler::{
    AssembledMember, AssembledModel, AssembledOperation, AssembledRelationship, AssembledType,
    TypeRef,
};

const XMI_VERSION: &str = "2.0";
const XMI_NAMESPACE: &str = "http://www.omg.org/XMI";
const UML_NAMESPACE: &str = "http://www.eclipse.org/uml2/1.1.0/GenModel";

/// Render the model as an XMI document
pub fn to_xmi(model: &AssembledModel) -> String {
    let mut root = Element::new("xmi:XMI")
        .attr("xmi:version", XMI_VERSION)
        .attr("xmlns:xmi", XMI_NAMESPACE)
        .attr("xmlns:uml", UML_NAMESPACE);

    let mut uml_model = Element::new("uml:Model")
        .attr("xmi:id", model.id())
        .attr("name", model.name());

    for primitive in model.primitives() {
        uml_model.push(
            Element::new("packagedElement")
                .attr("xmi:type", "uml:PrimitiveType")
                .attr("xmi:id", &primitive.id)
                .attr("name", &primitive.name),
        );
    }
    for decl in model.types() {
        uml_model.push(type_element(decl));
    }
    for relationship in model.relationships() {
        uml_model.push(relationship_element(relationship));
    }

    root.push(uml_model);

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    root.write_to(&mut out, 0);
    out
}

fn type_element(decl: &AssembledType) -> Element {
    let uml_type = match decl.kind {
        TypeKind::Class => "uml:Class",
        TypeKind::Interface => "uml:Interface",
        TypeKind::Enumeration => "uml:Enumeration",
    };
    let mut element = Element::new("packagedElement")
        .attr("xmi:type", uml_type)
        .attr("xmi:id", &decl.id)
        .attr("name", &decl.name);
    if decl.is_abstract {
        element = element.attr("isAbstract", "true");
    }

    for literal in &decl.literals {
        element.push(
            Element::new("ownedLiteral")
                .attr("xmi:type", "uml:EnumerationLiteral")
                .attr("xmi:id", &literal.id)
                .attr("name", &literal.name),
        );
    }

    for member in &decl.members {
        match member {
            AssembledMember::Field(field) => {
                let mut attribute = Element::new("ownedAttribute")
                    .attr("xmi:id", &field.id)
                    .attr("name", &field.name)
                    .attr("visibility", &field.visibility.to_string())
                    .attr("type", type_reference(&field.type_ref));
                if field.is_static {
                    attribute = attribute.attr("isStatic", "true");
                }
                if field.is_readonly {
                    attribute = attribute.attr("isReadOnly", "true");
                }
                element.push(attribute);
            }
            AssembledMember::Operation(operation) => element.push(operation_element(operation)),
        }
    }
    element
}

fn operation_element(operation: &AssembledOperation) -> Element {
    let mut element = Element::new("ownedOperation")
        .attr("xmi:id", &operation.id)
        .attr("name", &operation.name)
        .attr("visibility", &operation.visibility.to_string());
    if operation.is_static {
        element = element.attr("isStatic", "true");
    }
    if operation.is_abstract {
        element = element.attr("isAbstract", "true");
    }

    for parameter in &operation.parameters {
        element.push(
            Element::new("ownedParameter")
                .attr("xmi:id", &parameter.id)
                .attr("name", &parameter.name)
                .attr("direction", "in")
                .attr("type", type_reference(&parameter.type_ref)),
        );
    }
    if let Some(returns) = &operation.returns {
        element.push(
            Element::new("ownedParameter")
                .attr("xmi:id", &returns.id)
                .attr("direction", "return")
                .attr("type", type_reference(&returns.type_ref)),
        );
    }
    element
}

/// Id of a resolved type, or the bare name of an external one
fn type_reference(type_ref: &TypeRef) -> &str {
    type_ref.id().unwrap_or_else(|| type_ref.name())
}

fn association_name(relationship: &AssembledRelationship) -> String {
    let verb = match relationship.kind {
        RelationshipKind::Composition => "composedOf",
        RelationshipKind::Aggregation => "aggregates",
        RelationshipKind::Dependency => "depends_on",
        _ => "to",
    };
    format!("{}_{}_{}", relationship.source, verb, relationship.target)
}

fn relationship_element(relationship: &AssembledRelationship) -> Element {
    let element = Element::new("packagedElement");
    match relationship.kind {
        RelationshipKind::Generalization => element
            .attr("xmi:type", "uml:Generalization")
            .attr("xmi:id", &relationship.id)
            .attr("specific", &relationship.source_id)
            .attr("general", &relationship.target_id),
        RelationshipKind::Realization => element
            .attr("xmi:type", "uml:InterfaceRealization")
            .attr("xmi:id", &relationship.id)
            .attr("implementingClassifier", &relationship.source_id)
            .attr("contract", &relationship.target_id),
        RelationshipKind::Dependency => element
            .attr("xmi:type", "uml:Dependency")
            .attr("xmi:id", &relationship.id)
            .attr("name", &association_name(relationship))
            .attr("client", &relationship.source_id)
            .attr("supplier", &relationship.target_id),
        RelationshipKind::Composition
        | RelationshipKind::Aggregation
        | RelationshipKind::Association => association_element(element, relationship),
    }
}

fn association_element(element: Element, relationship: &AssembledRelationship) -> Element {
    let mut element = element
        .attr("xmi:type", "uml:Association")
        .attr("xmi:id", &relationship.id)
        .attr("name", &association_name(relationship));
    let Some(ends) = &relationship.ends else {
        return element;
    };

    element.push(Element::new("memberEnd").attr("xmi:idref", &ends.source_end));
    element.push(Element::new("memberEnd").attr("xmi:idref", &ends.target_end));

    let mut source_end = Element::new("ownedEnd")
        .attr("xmi:id", &ends.source_end)
        .attr("type", &relationship.source_id);
    match relationship.kind {
        RelationshipKind::Composition => source_end = source_end.attr("aggregation", "composite"),
        RelationshipKind::Aggregation => source_end = source_end.attr("aggregation", "shared"),
        _ => {}
    }
    element.push(source_end.attr("name", ""));

    let mut target_end = Element::new("ownedEnd")
        .attr("xmi:id", &ends.target_end)
        .attr("type", &relationship.target_id)
        .attr("name", relationship.label.as_deref().unwrap_or_default());
    if let Some(multiplicity) = &relationship.multiplicity {
        target_end = target_end.attr("multiplicity", multiplicity);
    }
    element.push(target_end);
    element
}

/// Minimal XML element: ordered attributes and children, no text content
struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn attr(mut self, key: &'static str, value: &str) -> Self {
        self.attributes.push((key, value.to_string()));
        self
    }

    fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}<{}", self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {key}=\"{}\"", escape_attribute(value));
        }
        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push_str(">\n");
        for child in &self.children {
            child.write_to(out, depth + 1);
        }
        let _ = writeln!(out, "{indent}</{}>", self.name);
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{
        Field, Member, Operation, Parameter, Relationship, TypeDeclaration, Visibility,
    };
    use crate::model::{Assembler, Model};

    fn field(name: &str, declared_type: &str, is_readonly: bool) -> Member {
        Member::Field(Field {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            visibility: Visibility::Private,
            is_static: false,
            is_readonly,
        })
    }

    fn assembled() -> AssembledModel {
        let mut model = Model::new("Shop");
        let mut inventory = TypeDeclaration::new("Inventory", TypeKind::Class);
        inventory.members = vec![
            field("items", "List<Item>", false),
            field("label", "Map<String, Item>", true),
            field("blob", "Opaque", false),
        ];
        let mut find = Operation::new("find");
        find.return_type = "Item".to_string();
        find.parameters.push(Parameter {
            name: "key".to_string(),
            declared_type: "String".to_string(),
        });
        inventory.members.push(Member::Operation(find));
        inventory.members.push(Member::Operation(Operation::new("clear")));
        model.add_type(inventory);

        let mut color = TypeDeclaration::new("Color", TypeKind::Enumeration);
        color.enum_literals = vec!["RED".to_string(), "GREEN".to_string()];
        model.add_type(color);
        model.add_type(TypeDeclaration::new("Item", TypeKind::Class));
        model.add_type(TypeDeclaration::new("Auditable", TypeKind::Interface));

        model.add_relationship(
            Relationship::new("Inventory", "Item", RelationshipKind::Aggregation)
                .with_label("items")
                .with_multiplicity(Some("*".to_string())),
        );
        model.add_relationship(
            Relationship::new("Inventory", "Item", RelationshipKind::Composition)
                .with_label("label"),
        );
        model.add_relationship(Relationship::new(
            "Inventory",
            "Auditable",
            RelationshipKind::Realization,
        ));
        model.add_relationship(
            Relationship::new("Inventory", "Item", RelationshipKind::Dependency).with_label("find"),
        );
        Assembler::new("Shop").assemble(&model).0
    }

    fn attribute_values<'a>(xml: &'a str, key: &str) -> Vec<&'a str> {
        let needle = format!(" {key}=\"");
        xml.match_indices(&needle)
            .filter_map(|(at, _)| {
                let rest = &xml[at + needle.len()..];
                rest.find('"').map(|end| &rest[..end])
            })
            .collect()
    }

    #[test]
    fn test_document_skeleton() {
        let xml = to_xmi(&assembled());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xmi:XMI xmi:version=\"2.0\""));
        assert!(xml.contains("xmlns:uml=\"http://www.eclipse.org/uml2/1.1.0/GenModel\""));
        assert!(xml.contains("<uml:Model xmi:id=\"_"));
        assert_eq!(xml.matches("uml:PrimitiveType").count(), 9);
        assert!(xml.contains("xmi:type=\"uml:Enumeration\""));
        assert!(xml.contains("<ownedLiteral xmi:type=\"uml:EnumerationLiteral\""));
        assert!(xml.trim_end().ends_with("</xmi:XMI>"));
    }

    #[test]
    fn test_associations_have_owned_ends() {
        let xml = to_xmi(&assembled());
        assert!(xml.contains("name=\"Inventory_aggregates_Item\""));
        assert!(xml.contains("name=\"Inventory_composedOf_Item\""));
        assert!(xml.contains("aggregation=\"shared\" name=\"\""));
        assert!(xml.contains("aggregation=\"composite\" name=\"\""));
        assert!(xml.contains("name=\"items\" multiplicity=\"*\""));
        assert_eq!(xml.matches("<memberEnd").count(), 4);
        assert!(xml.contains("name=\"Inventory_depends_on_Item\""));
        assert!(xml.contains("uml:InterfaceRealization"));
    }

    #[test]
    fn test_return_parameter_only_when_not_void() {
        let xml = to_xmi(&assembled());
        assert_eq!(xml.matches("direction=\"return\"").count(), 1);
        assert_eq!(xml.matches("direction=\"in\"").count(), 1);
    }

    #[test]
    fn test_no_dangling_references() {
        let model = assembled();
        let xml = to_xmi(&model);
        let ids: Vec<&str> = attribute_values(&xml, "xmi:id");
        for key in [
            "specific",
            "general",
            "client",
            "supplier",
            "implementingClassifier",
            "contract",
            "xmi:idref",
        ] {
            for reference in attribute_values(&xml, key) {
                assert!(ids.contains(&reference), "{key}={reference} is dangling");
            }
        }
        // unresolved member type keeps its name
        assert!(xml.contains("type=\"Opaque\""));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        assert_eq!(
            escape_attribute("Map<K, \"V\"> & 'x'"),
            "Map&lt;K, &quot;V&quot;&gt; &amp; &apos;x&apos;"
        );
    }
}

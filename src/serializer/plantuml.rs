//! Textual class-diagram renderer.
//!
//! Output is read back by `extractors::plantuml` without losing declared
//! structure: every block carries its members and supertypes, and
//! relationship lines use the fixed link-symbol table below.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::extractors::base::{RelationshipKind, TypeKind};
use crate::model::assembler::{
    AssembledField, AssembledModel, AssembledOperation, AssembledRelationship, AssembledType,
};

const BLOCK_INDENT: &str = "    ";
const MEMBER_INDENT: &str = "        ";

/// Where supertypes are written
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceStyle {
    /// `class Player extends Entity implements Drawable {`
    #[default]
    HeaderClauses,
    /// `Entity <|-- Player` / `Player ..|> Drawable` link lines
    Links,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RenderOptions {
    /// Diagram title; the model name when unset
    pub title: Option<String>,
    /// Fields shown per block before a `+... (more fields)` marker
    pub max_fields: Option<usize>,
    /// Operations shown per block before a `+... (more methods)` marker
    pub max_operations: Option<usize>,
    pub inheritance: InheritanceStyle,
}

pub fn link_symbol(kind: RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::Composition => "*--",
        RelationshipKind::Aggregation => "o--",
        RelationshipKind::Association => "-->",
        RelationshipKind::Generalization => "<|--",
        RelationshipKind::Realization => "..|>",
        RelationshipKind::Dependency => "..>",
    }
}

/// Render the model as a diagram document
pub fn to_plantuml(model: &AssembledModel, options: &RenderOptions) -> String {
    let title = options.title.as_deref().unwrap_or(model.name());
    let mut out = String::new();
    let _ = writeln!(out, "@startuml {}", title.replace(' ', "_"));
    out.push_str("!theme plain\n");
    let _ = writeln!(out, "title {title}\n");

    for decl in model.types() {
        render_block(&mut out, decl, options);
        out.push('\n');
    }

    let mut links = Vec::new();
    if options.inheritance == InheritanceStyle::Links {
        for decl in model.types() {
            supertype_links(decl, &mut links);
        }
    }
    for relationship in model.relationships() {
        if is_declared_by_supertypes(model, relationship) {
            continue;
        }
        links.push(relationship_line(relationship));
    }
    for link in &links {
        let _ = writeln!(out, "{BLOCK_INDENT}{link}");
    }

    out.push_str("@enduml\n");
    out
}

fn block_keyword(decl: &AssembledType) -> &'static str {
    match decl.kind {
        TypeKind::Interface => "interface",
        TypeKind::Enumeration => "enum",
        TypeKind::Class if decl.is_abstract => "abstract class",
        TypeKind::Class => "class",
    }
}

fn render_block(out: &mut String, decl: &AssembledType, options: &RenderOptions) {
    let mut header = format!("{} {}", block_keyword(decl), decl.name);
    if options.inheritance == InheritanceStyle::HeaderClauses {
        let parents: Vec<&str> = decl
            .superclass
            .iter()
            .chain(decl.extended_interfaces.iter())
            .map(String::as_str)
            .collect();
        if !parents.is_empty() {
            let _ = write!(header, " extends {}", parents.join(", "));
        }
        if !decl.implemented_interfaces.is_empty() {
            let _ = write!(header, " implements {}", decl.implemented_interfaces.join(", "));
        }
    }
    let _ = writeln!(out, "{BLOCK_INDENT}{header} {{");

    let fields: Vec<&AssembledField> = decl.fields().collect();
    let operations: Vec<&AssembledOperation> = decl.operations().collect();

    for literal in &decl.literals {
        let _ = writeln!(out, "{MEMBER_INDENT}{}", literal.name);
    }
    if !decl.literals.is_empty() && !(fields.is_empty() && operations.is_empty()) {
        let _ = writeln!(out, "{MEMBER_INDENT}--");
    }

    for (shown, field) in fields.iter().enumerate() {
        if options.max_fields.is_some_and(|max| shown >= max) {
            let _ = writeln!(out, "{MEMBER_INDENT}+... (more fields)");
            break;
        }
        let _ = writeln!(out, "{MEMBER_INDENT}{}", field_line(field));
    }
    if !fields.is_empty() && !operations.is_empty() {
        let _ = writeln!(out, "{MEMBER_INDENT}--");
    }
    for (shown, operation) in operations.iter().enumerate() {
        if options.max_operations.is_some_and(|max| shown >= max) {
            let _ = writeln!(out, "{MEMBER_INDENT}+... (more methods)");
            break;
        }
        let _ = writeln!(out, "{MEMBER_INDENT}{}", operation_line(operation));
    }

    let _ = writeln!(out, "{BLOCK_INDENT}}}");
}

fn modifier_tags(tags: &[(&str, bool)]) -> String {
    tags.iter()
        .filter(|(_, on)| *on)
        .map(|(tag, _)| format!("{{{tag}}} "))
        .collect()
}

fn field_line(field: &AssembledField) -> String {
    let tags = modifier_tags(&[("static", field.is_static), ("readonly", field.is_readonly)]);
    format!(
        "{}{}{} : {}",
        field.visibility.symbol(),
        tags,
        field.name,
        field.declared_type
    )
}

fn operation_line(operation: &AssembledOperation) -> String {
    let tags = modifier_tags(&[
        ("static", operation.is_static),
        ("abstract", operation.is_abstract),
    ]);
    let parameters: Vec<String> = operation
        .parameters
        .iter()
        .map(|p| format!("{} : {}", p.name, p.declared_type))
        .collect();
    let return_type = operation
        .returns
        .as_ref()
        .map_or(crate::extractors::base::VOID, |r| r.declared_type.as_str());
    format!(
        "{}{}{}({}) : {}",
        operation.visibility.symbol(),
        tags,
        operation.name,
        parameters.join(", "),
        return_type
    )
}

fn supertype_links(decl: &AssembledType, links: &mut Vec<String>) {
    for parent in decl.superclass.iter().chain(decl.extended_interfaces.iter()) {
        links.push(format!("{parent} <|-- {}", decl.name));
    }
    for interface in &decl.implemented_interfaces {
        links.push(format!("{} ..|> {interface}", decl.name));
    }
}

/// Generalization/realization already written as part of the source type
fn is_declared_by_supertypes(model: &AssembledModel, relationship: &AssembledRelationship) -> bool {
    let Some(decl) = model.find_type(&relationship.source) else {
        return false;
    };
    let target = &relationship.target;
    match relationship.kind {
        RelationshipKind::Generalization => {
            decl.superclass.as_ref() == Some(target) || decl.extended_interfaces.contains(target)
        }
        RelationshipKind::Realization => decl.implemented_interfaces.contains(target),
        _ => false,
    }
}

fn relationship_line(relationship: &AssembledRelationship) -> String {
    let mut line = match relationship.kind {
        RelationshipKind::Generalization => {
            format!("{} <|-- {}", relationship.target, relationship.source)
        }
        kind => {
            let multiplicity = relationship
                .multiplicity
                .as_ref()
                .map(|m| format!("\"{m}\" "))
                .unwrap_or_default();
            format!(
                "{} {} {}{}",
                relationship.source,
                link_symbol(kind),
                multiplicity,
                relationship.target
            )
        }
    };
    if let Some(label) = &relationship.label {
        let _ = write!(line, " : {label}");
    }
    line
}

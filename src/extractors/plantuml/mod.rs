/// PlantUML class-diagram reader: the inverse of the textual renderer.
///
/// - classes: block headers and bodies
/// - members: attribute, method and enum literal lines
/// - relationships: link lines
mod classes;
mod members;
mod relationships;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::extractors::base::{
    BaseExtractor, ExtractionResults, RelationshipKind, TypeDeclaration, TypeKind,
};

use relationships::Link;

static PACKAGE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:package|namespace)\s+"?([\w.]+)"?.*\{\s*$"#).unwrap());

/// Directive and comment lines that carry no model structure
const SKIPPED_PREFIXES: &[&str] = &[
    "@startuml",
    "@enduml",
    "!",
    "'",
    "title",
    "skinparam",
    "hide",
    "show",
    "left to right",
    "top to bottom",
    "legend",
    "caption",
    "header",
    "footer",
];

/// Whether a line has the shape of a diagram member (`- name : Type`)
pub fn is_diagram_member_line(line: &str) -> bool {
    static DIAGRAM_MEMBER: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\s*[+\-#~]\s*(?:\{\w+\}\s*)*[\w$]+\s*(?:\([^)]*\)\s*)?:\s*\S").unwrap()
    });
    DIAGRAM_MEMBER.is_match(line)
}

/// Whether a line is a block header whose inline body holds a diagram member
/// (`class Inventory { -items : List<Item> }`)
pub fn is_inline_diagram_block(line: &str) -> bool {
    let Some(opening) = classes::parse_header(line.trim()).and_then(|h| h.opening) else {
        return false;
    };
    let inner = opening.trim_start_matches('{');
    let inner = inner.trim_end().strip_suffix('}').unwrap_or(inner);
    inner.split(';').any(is_diagram_member_line)
}

pub struct PlantUmlExtractor {
    base: BaseExtractor,
}

impl PlantUmlExtractor {
    pub fn new(unit_id: String, content: String) -> Self {
        Self {
            base: BaseExtractor::new(unit_id, content),
        }
    }

    pub fn extract(&mut self) -> ExtractionResults {
        let content = self.base.content.clone();
        let lines: Vec<&str> = content.lines().map(str::trim).collect();

        let mut types: Vec<TypeDeclaration> = Vec::new();
        let mut links: Vec<Link> = Vec::new();
        let mut package = String::new();
        let mut first_package = String::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            i += 1;

            if line.is_empty() {
                continue;
            }
            if line == "}" {
                // closes a package block; stray braces are harmless
                package.clear();
                continue;
            }
            if SKIPPED_PREFIXES.iter().any(|p| line.starts_with(p)) {
                continue;
            }
            if line.starts_with("note") {
                // multi-line notes run to `end note`
                if !line.contains(':') {
                    while i < lines.len() && !lines[i].starts_with("end note") {
                        i += 1;
                    }
                    i += 1;
                }
                continue;
            }
            if let Some(captures) = PACKAGE_OPEN.captures(line) {
                package = captures[1].to_string();
                if first_package.is_empty() {
                    first_package = package.clone();
                }
                continue;
            }

            if let Some(header) = classes::parse_header(line) {
                let opening = header.opening.clone();
                let (body, next) = match collect_body(&lines, i, opening.as_deref()) {
                    Some(found) => found,
                    None => {
                        self.base.structural_mismatch(&header.name);
                        i = next_header(&lines, i);
                        continue;
                    }
                };
                i = next;
                let decl = classes::build_declaration(self, header, &body, &package);
                types.push(decl);
                continue;
            }

            match relationships::parse_link_line(line) {
                Some(link) => links.push(link),
                None => self.base.malformed(format!(
                    "unrecognized line: {}",
                    BaseExtractor::truncate_string(line, 60)
                )),
            }
        }

        let relationships = apply_links(&mut types, links);
        debug!(
            "Diagram unit '{}': {} types, {} declared links",
            self.base.unit_id,
            types.len(),
            relationships.len()
        );

        ExtractionResults {
            package: first_package,
            types,
            relationships,
        }
    }

    pub fn take_errors(&mut self) -> Vec<ExtractionError> {
        self.base.take_errors()
    }

    pub(crate) fn base_mut(&mut self) -> &mut BaseExtractor {
        &mut self.base
    }
}

/// Body lines of a block opened on the header line, and the index to resume
/// at. `None` when the block is never closed before the next header or EOF.
fn collect_body<'a>(
    lines: &[&'a str],
    start: usize,
    opening: Option<&'a str>,
) -> Option<(Vec<&'a str>, usize)> {
    let Some(opening) = opening else {
        return Some((Vec::new(), start));
    };
    let inner = opening.strip_prefix('{').unwrap_or(opening).trim();
    if let Some(inline) = inner.strip_suffix('}') {
        return Some((vec![inline.trim()], start));
    }

    let mut body = Vec::new();
    if !inner.is_empty() {
        body.push(inner);
    }
    for (offset, line) in lines[start..].iter().enumerate() {
        if line.starts_with('}') {
            return Some((body, start + offset + 1));
        }
        if classes::parse_header(line).is_some() {
            return None;
        }
        body.push(*line);
    }
    None
}

fn next_header(lines: &[&str], start: usize) -> usize {
    lines[start..]
        .iter()
        .position(|l| classes::parse_header(l).is_some())
        .map(|p| start + p)
        .unwrap_or(lines.len())
}

/// Fold inheritance links into the declarations they name; everything else
/// is returned as declared relationships
fn apply_links(
    types: &mut [TypeDeclaration],
    links: Vec<Link>,
) -> Vec<crate::extractors::base::Relationship> {
    let mut declared = Vec::new();
    for link in links {
        if !link.is_supertype_link() {
            declared.push(link.into_relationship());
            continue;
        }
        let Some(sub) = types.iter_mut().find(|t| t.name == link.source) else {
            declared.push(link.into_relationship());
            continue;
        };
        let accepted = match (link.kind, sub.kind) {
            (RelationshipKind::Generalization, TypeKind::Class) => match sub.superclass() {
                Some(existing) if existing == link.target => true,
                Some(_) => false,
                None => sub.set_superclass(link.target.clone()),
            },
            (RelationshipKind::Generalization, TypeKind::Interface) => {
                sub.add_extended_interface(link.target.clone())
                    || sub.extended_interfaces().contains(&link.target)
            }
            (RelationshipKind::Realization, _) => {
                sub.add_implemented_interface(link.target.clone())
                    || sub.implemented_interfaces().contains(&link.target)
            }
            _ => false,
        };
        if !accepted {
            warn!(
                "ignored {} link from `{}` to `{}`",
                link.kind, link.source, link.target
            );
        }
    }
    declared
}

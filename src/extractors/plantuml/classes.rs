/// Diagram type blocks: headers and their bodies
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::extractors::base::{TypeDeclaration, TypeKind};
use crate::extractors::plantuml::PlantUmlExtractor;
use crate::typeref;

use super::members;

static BLOCK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(abstract\s+class|abstract|class|interface|enum)\s+("[^"]+"|[\w.$]+)(?:\s*<<[^>]*>>)?(?:\s*<[^<>{]*>)?(?:\s+extends\s+([^{]+?))?(?:\s+implements\s+([^{]+?))?\s*(\{.*)?$"#,
    )
    .unwrap()
});

/// Parsed block header line
#[derive(Debug, Clone, PartialEq)]
pub(super) struct BlockHeader {
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    /// Text from the opening `{` on, when the body starts on this line
    pub opening: Option<String>,
}

fn type_list(list: Option<regex::Match<'_>>) -> Vec<String> {
    list.map(|m| {
        typeref::split_top_level(m.as_str(), ',')
            .iter()
            .map(|entry| typeref::simple_type_name(entry.trim_matches('"')))
            .filter(|name| !name.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

pub(super) fn parse_header(line: &str) -> Option<BlockHeader> {
    let captures = BLOCK_HEADER.captures(line)?;
    let keyword = captures.get(1)?.as_str();
    let (kind, is_abstract) = match keyword {
        "interface" => (TypeKind::Interface, false),
        "enum" => (TypeKind::Enumeration, false),
        "class" => (TypeKind::Class, false),
        _ => (TypeKind::Class, true),
    };
    let name = typeref::simple_type_name(captures.get(2)?.as_str().trim_matches('"'));
    if name.is_empty() {
        return None;
    }

    Some(BlockHeader {
        name,
        kind,
        is_abstract,
        extends: type_list(captures.get(3)),
        implements: type_list(captures.get(4)),
        opening: captures.get(5).map(|m| m.as_str().to_string()),
    })
}

/// Build a declaration from a header and its body lines
pub(super) fn build_declaration(
    extractor: &mut PlantUmlExtractor,
    header: BlockHeader,
    body: &[&str],
    package: &str,
) -> TypeDeclaration {
    let mut decl = TypeDeclaration::new(header.name, header.kind);
    decl.package = package.to_string();
    decl.is_abstract = header.is_abstract;

    for parent in header.extends {
        let accepted = match decl.kind {
            TypeKind::Class if decl.superclass().is_none() => decl.set_superclass(parent.clone()),
            TypeKind::Interface => decl.add_extended_interface(parent.clone()),
            _ => false,
        };
        if !accepted {
            warn!("`{}` cannot extend `{}`; ignored", decl.name, parent);
        }
    }
    for interface in header.implements {
        decl.add_implemented_interface(interface);
    }

    for line in body.iter().map(|l| l.trim()) {
        if line.is_empty() || members::is_decoration(line) {
            continue;
        }
        if decl.kind == TypeKind::Enumeration && members::ENUM_LITERAL_LINE.is_match(line) {
            for literal in line.split(',').map(str::trim).filter(|l| !l.is_empty()) {
                if !decl.enum_literals.iter().any(|l| l == literal) {
                    decl.enum_literals.push(literal.to_string());
                }
            }
            continue;
        }
        match members::parse_member_line(line) {
            Some(member) => decl.members.push(member),
            None => extractor
                .base_mut()
                .malformed(format!("unrecognized line in `{}`: {}", decl.name, line)),
        }
    }

    decl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_variants() {
        let header = parse_header("abstract class Shape extends Base implements Drawable, Comparable<Shape> {").unwrap();
        assert_eq!(header.name, "Shape");
        assert!(header.is_abstract);
        assert_eq!(header.extends, vec!["Base"]);
        assert_eq!(header.implements, vec!["Drawable", "Comparable"]);
        assert_eq!(header.opening.as_deref(), Some("{"));

        let header = parse_header("interface Repository<T> extends Reader, Writer").unwrap();
        assert_eq!(header.kind, TypeKind::Interface);
        assert_eq!(header.extends, vec!["Reader", "Writer"]);
        assert!(header.opening.is_none());

        let header = parse_header(r#"class "com.acme.Item" <<Entity>> { -id : long }"#).unwrap();
        assert_eq!(header.name, "Item");
        assert_eq!(header.opening.as_deref(), Some("{ -id : long }"));
    }

    #[test]
    fn test_non_headers() {
        assert!(parse_header("Entity <|-- Player").is_none());
        assert!(parse_header("- count : int").is_none());
    }
}

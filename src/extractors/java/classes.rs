/// Class, interface and enum declaration extraction
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::extractors::base::{TypeDeclaration, TypeKind};
use crate::extractors::java::{JavaExtractor, MemberContext};
use crate::extractors::scanner;

use super::{enums, helpers};

static TYPE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)(?:^|[\s;{}])((?:(?:public|private|protected|static|final|abstract|sealed|non-sealed|strictfp)\s+)*)(class|interface|enum)\s+([A-Za-z_$][\w$]*)",
    )
    .unwrap()
});

static SUPERTYPE_CLAUSES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^\s*(?:extends\s+(.+?))?\s*(?:implements\s+(.+?))?\s*(?:permits\s+.+?)?\s*$",
    )
    .unwrap()
});

/// Find every type header in `text` (comment-free, literals masked) and
/// extract each declaration whose body is balanced.
pub(super) fn extract_types(
    extractor: &mut JavaExtractor,
    text: &str,
    package: &str,
) -> Vec<TypeDeclaration> {
    let mut types = Vec::new();

    for captures in TYPE_HEADER.captures_iter(text) {
        let (Some(keyword), Some(name_match)) = (captures.get(2), captures.get(3)) else {
            continue;
        };
        let Some(kind) = TypeKind::from_keyword(keyword.as_str()) else {
            continue;
        };
        // `@interface` declares an annotation type, not a classifier
        if text[..keyword.start()].trim_end().ends_with('@') {
            continue;
        }
        let name = name_match.as_str();
        let rest = &text[name_match.end()..];

        // The header runs up to the body's opening brace
        let Some(stop) = rest.find(['{', ';', '=', '(', ')']) else {
            continue;
        };
        if !rest[stop..].starts_with('{') {
            continue;
        }

        let clauses = skip_type_parameters(&rest[..stop]);
        let Some(clause_captures) = SUPERTYPE_CLAUSES.captures(clauses) else {
            extractor
                .base_mut()
                .malformed(format!("unrecognized header for `{}`: {}", name, clauses.trim()));
            continue;
        };

        let Some(body) = scanner::extract_body(text, name_match.end() + stop) else {
            extractor.base_mut().structural_mismatch(name);
            continue;
        };

        let modifiers = helpers::extract_modifiers(captures.get(1).map(|m| m.as_str()));
        let mut decl = TypeDeclaration::new(name, kind);
        decl.package = package.to_string();
        decl.is_abstract = helpers::has_modifier(&modifiers, "abstract");

        let extends = clause_captures
            .get(1)
            .map(|m| helpers::parse_type_list(m.as_str()))
            .unwrap_or_default();
        let implements = clause_captures
            .get(2)
            .map(|m| helpers::parse_type_list(m.as_str()))
            .unwrap_or_default();
        apply_supertypes(&mut decl, extends, implements);

        let projected = scanner::project_top_level(body);
        let member_text = if kind == TypeKind::Enumeration {
            let (literals, members) = enums::split_enum_body(&projected);
            decl.enum_literals = literals;
            members.to_string()
        } else {
            projected
        };

        let context = MemberContext::new(name, kind);
        for statement in scanner::split_statements(&member_text) {
            if let Some(member) = extractor.recognize_member(&statement, &context) {
                decl.members.push(member);
            }
        }

        types.push(decl);
    }

    types
}

fn apply_supertypes(decl: &mut TypeDeclaration, extends: Vec<String>, implements: Vec<String>) {
    match decl.kind {
        TypeKind::Class => {
            if let Some(parent) = extends.into_iter().next() {
                if !decl.set_superclass(parent.clone()) {
                    warn!("`{}` cannot extend `{}`; ignored", decl.name, parent);
                }
            }
        }
        TypeKind::Interface => {
            for parent in extends {
                if !decl.add_extended_interface(parent.clone()) {
                    warn!("`{}` cannot extend `{}`; ignored", decl.name, parent);
                }
            }
        }
        TypeKind::Enumeration => {}
    }
    for interface in implements {
        if !decl.add_implemented_interface(interface.clone()) {
            warn!("`{}` cannot implement `{}`; ignored", decl.name, interface);
        }
    }
}

/// Drop a leading `<...>` type parameter list from a header tail
fn skip_type_parameters(tail: &str) -> &str {
    let trimmed = tail.trim_start();
    if !trimmed.starts_with('<') {
        return tail;
    }
    let mut depth = 0usize;
    for (i, ch) in trimmed.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return &trimmed[i + 1..];
                }
            }
            _ => {}
        }
    }
    trimmed
}

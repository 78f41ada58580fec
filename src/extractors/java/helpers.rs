/// Helper functions for Java extraction
/// Handles modifiers, visibility, parameter lists and supertype lists
use crate::extractors::base::{Parameter, Visibility};
use crate::extractors::scanner;
use crate::typeref;

/// Split a captured modifier run (`"public static final "`) into keywords
pub(super) fn extract_modifiers(run: Option<&str>) -> Vec<String> {
    run.map(|text| text.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub(super) fn has_modifier(modifiers: &[String], keyword: &str) -> bool {
    modifiers.iter().any(|m| m == keyword)
}

/// Determine visibility from modifier list
pub(super) fn determine_visibility(modifiers: &[String]) -> Visibility {
    if has_modifier(modifiers, "public") {
        Visibility::Public
    } else if has_modifier(modifiers, "private") {
        Visibility::Private
    } else if has_modifier(modifiers, "protected") {
        Visibility::Protected
    } else {
        Visibility::Package
    }
}

/// Interface members without an explicit visibility are public
pub(super) fn member_visibility(modifiers: &[String], in_interface: bool) -> Visibility {
    let explicit = ["public", "private", "protected"]
        .iter()
        .any(|kw| has_modifier(modifiers, kw));
    if in_interface && !explicit {
        Visibility::Public
    } else {
        determine_visibility(modifiers)
    }
}

/// Move C-style array brackets from a declarator name onto its type
/// (`int a[]` -> `a`, `int[]`)
pub(super) fn normalize_declarator(type_text: &str, name: &str) -> (String, String) {
    let mut declared_type = type_text.trim().to_string();
    let mut name = name.trim();
    if let Some(rest) = name.strip_prefix("...") {
        declared_type.push_str("...");
        name = rest;
    }
    let brackets = name.matches('[').count();
    let name = name
        .split('[')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    for _ in 0..brackets {
        declared_type.push_str("[]");
    }
    (name, typeref::display_type(&declared_type))
}

/// Parse a formal parameter list (the text between the parentheses)
pub(super) fn parse_parameters(list: &str) -> Vec<Parameter> {
    typeref::split_top_level(list, ',')
        .into_iter()
        .filter_map(|raw| {
            let raw = scanner::strip_annotations(&raw);
            let tokens: Vec<&str> = raw
                .split_whitespace()
                .filter(|t| *t != "final")
                .collect();
            let (name, type_tokens) = tokens.split_last()?;
            if type_tokens.is_empty() {
                return None;
            }
            let (name, declared_type) = normalize_declarator(&type_tokens.join(" "), name);
            if name.is_empty() {
                return None;
            }
            Some(Parameter {
                name,
                declared_type,
            })
        })
        .collect()
}

/// Supertype names from an `extends`/`implements` list, reduced to simple names
pub(super) fn parse_type_list(list: &str) -> Vec<String> {
    typeref::split_top_level(list, ',')
        .iter()
        .map(|entry| typeref::simple_type_name(entry))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Member lines inside a diagram type block
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::{Field, Member, Operation, Parameter, Visibility};
use crate::typeref;

static ATTRIBUTE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+\-#~]?)\s*((?:\{\w+\}\s*)*)([\w$]+)\s*:\s*(.+)$").unwrap()
});

static METHOD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+\-#~]?)\s*((?:\{\w+\}\s*)*)([\w$]+)\s*\((.*)\)\s*(?::\s*(.+))?$").unwrap()
});

/// `Type name` attribute form
static TYPED_ATTRIBUTE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+\-#~]?)\s*((?:\{\w+\}\s*)*)([\w.$]+(?:<[^()]*>)?(?:\[\])*)\s+([\w$]+)$").unwrap()
});

static MODIFIER_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").unwrap());

pub(super) static ENUM_LITERAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][\w]*(?:\s*,\s*[A-Za-z_][\w]*)*\s*,?$").unwrap());

/// Divider and truncation marker lines carry no structure
pub(super) fn is_decoration(line: &str) -> bool {
    matches!(line, "--" | ".." | "==" | "__")
        || line.starts_with('\'')
        || line.contains("... (more")
}

fn visibility(symbol: &str) -> Visibility {
    Visibility::from_symbol(symbol.chars().next())
}

fn modifier_tags(tags: &str) -> Vec<String> {
    MODIFIER_TAG
        .captures_iter(tags)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Parse one member line. Method shape is tried before attribute shape so a
/// return type annotation is not mistaken for an attribute type.
pub(super) fn parse_member_line(line: &str) -> Option<Member> {
    if let Some(captures) = METHOD_LINE.captures(line) {
        let tags = modifier_tags(captures.get(2).map_or("", |m| m.as_str()));
        let mut operation = Operation::new(captures.get(3)?.as_str());
        operation.visibility = visibility(captures.get(1).map_or("", |m| m.as_str()));
        operation.parameters = parse_parameters(captures.get(4).map_or("", |m| m.as_str()));
        if let Some(ret) = captures.get(5) {
            operation.return_type = typeref::display_type(ret.as_str());
        }
        operation.is_static = tags.iter().any(|t| t == "static" || t == "classifier");
        operation.is_abstract = tags.iter().any(|t| t == "abstract");
        return Some(Member::Operation(operation));
    }

    let (symbol, tags, name, declared_type) = if let Some(c) = ATTRIBUTE_LINE.captures(line) {
        (c.get(1), c.get(2), c.get(3)?, c.get(4)?)
    } else {
        let c = TYPED_ATTRIBUTE_LINE.captures(line)?;
        (c.get(1), c.get(2), c.get(4)?, c.get(3)?)
    };
    let tags = modifier_tags(tags.map_or("", |m| m.as_str()));
    Some(Member::Field(Field {
        name: name.as_str().to_string(),
        declared_type: typeref::display_type(declared_type.as_str()),
        visibility: visibility(symbol.map_or("", |m| m.as_str())),
        is_static: tags.iter().any(|t| t == "static" || t == "classifier"),
        is_readonly: tags.iter().any(|t| t == "readonly" || t == "final"),
    }))
}

/// `name : Type, other : Type`; a bare `Type name` entry is accepted too
fn parse_parameters(list: &str) -> Vec<Parameter> {
    typeref::split_top_level(list, ',')
        .into_iter()
        .filter_map(|entry| {
            if let Some((name, declared_type)) = entry.split_once(':') {
                return Some(Parameter {
                    name: name.trim().to_string(),
                    declared_type: typeref::display_type(declared_type),
                });
            }
            let (type_text, name) = entry.trim().rsplit_once(char::is_whitespace)?;
            Some(Parameter {
                name: name.to_string(),
                declared_type: typeref::display_type(type_text),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(line: &str) -> Field {
        match parse_member_line(line) {
            Some(Member::Field(f)) => f,
            other => panic!("expected field from {line:?}, got {other:?}"),
        }
    }

    fn operation(line: &str) -> Operation {
        match parse_member_line(line) {
            Some(Member::Operation(o)) => o,
            other => panic!("expected operation from {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_private_attribute() {
        let f = field("- count : int");
        assert_eq!(f.name, "count");
        assert_eq!(f.declared_type, "int");
        assert_eq!(f.visibility, Visibility::Private);
    }

    #[test]
    fn test_attribute_modifiers() {
        let f = field("+{static} {readonly} MAX_SIZE : int");
        assert!(f.is_static);
        assert!(f.is_readonly);
        assert_eq!(f.visibility, Visibility::Public);

        let f = field("#items : Map<String, List<Item>>");
        assert_eq!(f.visibility, Visibility::Protected);
        assert_eq!(f.declared_type, "Map<String, List<Item>>");
    }

    #[test]
    fn test_missing_symbol_reads_as_public() {
        assert_eq!(field("name : String").visibility, Visibility::Public);
    }

    #[test]
    fn test_type_name_attribute_form() {
        let f = field("~List<Order> orders");
        assert_eq!(f.name, "orders");
        assert_eq!(f.declared_type, "List<Order>");
        assert_eq!(f.visibility, Visibility::Package);
    }

    #[test]
    fn test_method_line() {
        let op = operation("+{abstract} transfer(from : Account, amount : Map<String, Long>) : boolean");
        assert!(op.is_abstract);
        assert_eq!(op.return_type, "boolean");
        assert_eq!(op.parameters.len(), 2);
        assert_eq!(op.parameters[1].declared_type, "Map<String, Long>");

        let op = operation("-reset()");
        assert!(op.returns_void());
        assert!(op.parameters.is_empty());
    }

    #[test]
    fn test_decorations() {
        assert!(is_decoration("--"));
        assert!(is_decoration("+... (more fields)"));
        assert!(!is_decoration("-count : int"));
    }
}

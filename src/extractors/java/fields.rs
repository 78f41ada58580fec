/// Field recognition
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::{Field, Member};

use super::helpers;
use super::MemberContext;

static FIELD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^((?:(?:public|private|protected|static|final|volatile|transient|readonly)\s+)*)([\w.$]+(?:\s*<[^=;]*>)?(?:\s*\[\s*\])*)\s+([\w$]+(?:\s*\[\s*\])*)\s*(?:=\s*(.+))?;$",
    )
    .unwrap()
});

/// A statement with an assignment before any call parentheses
static ASSIGNMENT_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^[^=(]*[\w>\]]\s+[\w$]+\s*(?:\[\s*\]\s*)*=").unwrap());

/// Keywords that can never be a field type
const NON_TYPES: &[&str] = &["return", "throw", "package", "import", "new", "else"];

/// Recognize `modifiers* type name (= initializer)? ;`
pub(super) fn recognize_field(statement: &str, context: &MemberContext) -> Option<Member> {
    if statement.contains('(') && statement.contains(')') && !ASSIGNMENT_SHAPE.is_match(statement)
    {
        return None;
    }

    let captures = FIELD_DECL.captures(statement)?;
    let modifiers = helpers::extract_modifiers(captures.get(1).map(|m| m.as_str()));
    let type_text = captures.get(2)?.as_str();
    if NON_TYPES.contains(&type_text) {
        return None;
    }

    let (name, declared_type) = helpers::normalize_declarator(type_text, captures.get(3)?.as_str());
    let visibility = helpers::member_visibility(&modifiers, context.is_interface());
    let mut is_static = helpers::has_modifier(&modifiers, "static");
    let mut is_readonly =
        helpers::has_modifier(&modifiers, "final") || helpers::has_modifier(&modifiers, "readonly");
    if context.is_interface() {
        // interface constants are implicitly static final
        is_static = true;
        is_readonly = true;
    }

    Some(Member::Field(Field {
        name,
        declared_type,
        visibility,
        is_static,
        is_readonly,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{TypeKind, Visibility};

    fn field(statement: &str) -> Option<Field> {
        let context = MemberContext::new("Owner", TypeKind::Class);
        match recognize_field(statement, &context) {
            Some(Member::Field(f)) => Some(f),
            _ => None,
        }
    }

    #[test]
    fn test_plain_field() {
        let f = field("private int count;").unwrap();
        assert_eq!(f.name, "count");
        assert_eq!(f.declared_type, "int");
        assert_eq!(f.visibility, Visibility::Private);
        assert!(!f.is_static);
        assert!(!f.is_readonly);
    }

    #[test]
    fn test_generic_field_with_initializer_call() {
        let f = field("protected final Map<String, Item> index = new HashMap<>();").unwrap();
        assert_eq!(f.name, "index");
        assert_eq!(f.declared_type, "Map<String, Item>");
        assert_eq!(f.visibility, Visibility::Protected);
        assert!(f.is_readonly);
    }

    #[test]
    fn test_multiline_field() {
        let f = field("static final List<\n    Order> ORDERS =\n  load();").unwrap();
        assert_eq!(f.name, "ORDERS");
        assert_eq!(f.declared_type, "List<Order>");
        assert!(f.is_static);
    }

    #[test]
    fn test_c_style_array_field() {
        let f = field("int grid[][];").unwrap();
        assert_eq!(f.name, "grid");
        assert_eq!(f.declared_type, "int[][]");
    }

    #[test]
    fn test_call_signatures_are_not_fields() {
        assert!(field("public abstract void draw(Canvas c);").is_none());
        assert!(field("return compute(x);").is_none());
        assert!(field("foo(bar);").is_none());
    }

    #[test]
    fn test_interface_fields_are_constants() {
        let context = MemberContext::new("Limits", TypeKind::Interface);
        let Some(Member::Field(f)) = recognize_field("int MAX = 10;", &context) else {
            panic!("expected field");
        };
        assert_eq!(f.visibility, Visibility::Public);
        assert!(f.is_static && f.is_readonly);
    }
}

/// Operation recognition (constructors are recognized and skipped)
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::{Member, Operation};
use crate::extractors::scanner;
use crate::typeref;

use super::helpers;
use super::MemberContext;

static OPERATION_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^((?:(?:public|private|protected|static|final|abstract|synchronized|native|default|strictfp)\s+)*)(?:<[^;{}()]*?>\s+)?([\w.$<>\[\],?\s]+?)\s+([\w$]+)\s*\(",
    )
    .unwrap()
});

/// What may follow the parameter list: a throws clause, then `;` or a body
static OPERATION_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*(?:throws\s+[\w.$,\s<>]+?)?\s*(?:;|\{\}|default\s+[^;]*;)?\s*$").unwrap()
});

const NON_TYPES: &[&str] = &["return", "throw", "new", "else", "case", "assert", "yield"];

/// Recognize `modifiers* <T>? returnType name(params) throws? ;|{}`
pub(super) fn recognize_operation(statement: &str, context: &MemberContext) -> Option<Member> {
    let captures = OPERATION_HEAD.captures(statement)?;
    let head = captures.get(0)?;
    let return_text = captures.get(2)?.as_str();
    let name = captures.get(3)?.as_str();

    let first_token = return_text.split_whitespace().next().unwrap_or_default();
    if NON_TYPES.contains(&first_token) {
        return None;
    }

    let open = head.end() - 1;
    let close = scanner::matching_paren(statement, open)?;
    let tail = &statement[close + 1..];
    if !OPERATION_TAIL.is_match(tail) {
        return None;
    }

    if name == context.type_name {
        // constructor
        return None;
    }

    let modifiers = helpers::extract_modifiers(captures.get(1).map(|m| m.as_str()));
    let has_body = tail.trim_end().ends_with('}');
    let is_static = helpers::has_modifier(&modifiers, "static");
    let is_abstract = helpers::has_modifier(&modifiers, "abstract")
        || (context.is_interface()
            && !has_body
            && !is_static
            && !helpers::has_modifier(&modifiers, "default"));

    let mut operation = Operation::new(name);
    operation.parameters = helpers::parse_parameters(&statement[open + 1..close]);
    operation.return_type = typeref::display_type(return_text);
    operation.visibility = helpers::member_visibility(&modifiers, context.is_interface());
    operation.is_static = is_static;
    operation.is_abstract = is_abstract;
    Some(Member::Operation(operation))
}

/// Enumeration literal recognition
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::scanner;
use crate::typeref;

static LITERAL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());

const VISIBILITY_KEYWORDS: &[&str] = &["public", "private", "protected"];

/// Split a projected enum body into its literal names and the member text
/// that follows the literal section.
pub(super) fn split_enum_body(projected: &str) -> (Vec<String>, &str) {
    let (section, members) = match terminator(projected) {
        Some(semi) => (&projected[..semi + 1], &projected[semi + 1..]),
        None => (projected, ""),
    };

    let mut literals: Vec<String> = Vec::new();
    for line in section.lines() {
        let line = scanner::strip_annotations(line.trim());
        if VISIBILITY_KEYWORDS
            .iter()
            .any(|kw| line.split_whitespace().next() == Some(kw))
        {
            break;
        }
        let line = line.trim_end_matches(';');
        for piece in typeref::split_top_level(line, ',') {
            if let Some(name) = literal_name(&piece) {
                if !literals.contains(&name) {
                    literals.push(name);
                }
            }
        }
    }
    (literals, members)
}

/// First `;` outside parentheses
fn terminator(projected: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, ch) in projected.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ';' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Literal name: text before any argument list or body, all upper case
fn literal_name(piece: &str) -> Option<String> {
    let piece = scanner::strip_annotations(piece);
    let name = piece
        .split(|c: char| c == '(' || c == '{' || c.is_whitespace())
        .next()?
        .trim();
    LITERAL_NAME.is_match(name).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_literal_per_line() {
        let (literals, members) = split_enum_body("\n  NORTH,\n  SOUTH,\n  EAST\n");
        assert_eq!(literals, vec!["NORTH", "SOUTH", "EAST"]);
        assert!(members.is_empty());
    }

    #[test]
    fn test_several_per_line_with_arguments_and_members() {
        let body = "\n RED(255, 0, 0), GREEN(0, 255, 0),\n BLUE(0, 0, 255);\n private final int r;\n";
        let (literals, members) = split_enum_body(body);
        assert_eq!(literals, vec!["RED", "GREEN", "BLUE"]);
        assert!(members.contains("private final int r;"));
    }

    #[test]
    fn test_constant_bodies_and_lowercase_entries() {
        let (literals, _) = split_enum_body(" PLUS {}, MINUS {}, other ");
        assert_eq!(literals, vec!["PLUS", "MINUS"]);
    }

    #[test]
    fn test_visibility_line_ends_literal_section() {
        let (literals, _) = split_enum_body(" A, B\n public static X\n");
        assert_eq!(literals, vec!["A", "B"]);
    }
}

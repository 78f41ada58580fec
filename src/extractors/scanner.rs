// Lexical scanner shared by the source front-ends
//
// Everything here is literal-aware: a `//`, `/*`, brace or semicolon inside a
// string or character literal is never treated as structure.

use once_cell::sync::Lazy;
use regex::Regex;

static PACKAGE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").unwrap());
static ANNOTATION_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@[\w.$]+\s*").unwrap());

/// Tracks whether the scan position is inside a quoted literal or a
/// `"""` text block
#[derive(Debug, Default)]
struct LiteralTracker {
    quote: Option<char>,
    text_block: bool,
    escaped: bool,
    /// The quote opened on the previous character
    just_opened: bool,
    /// An empty `""` just closed; a third `"` opens a text block
    after_empty: bool,
    /// Consecutive unescaped quotes inside a text block
    quote_run: usize,
}

impl LiteralTracker {
    /// Feed one character; returns true when it is code (outside any literal,
    /// and not a quote delimiter)
    fn step(&mut self, ch: char) -> bool {
        if self.text_block {
            if self.escaped {
                self.escaped = false;
                self.quote_run = 0;
            } else if ch == '\\' {
                self.escaped = true;
                self.quote_run = 0;
            } else if ch == '"' {
                self.quote_run += 1;
                if self.quote_run == 3 {
                    self.text_block = false;
                    self.quote_run = 0;
                }
            } else {
                self.quote_run = 0;
            }
            return false;
        }
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == q || ch == '\n' {
                self.quote = None;
                self.after_empty = ch == '"' && self.just_opened;
            }
            self.just_opened = false;
            return false;
        }
        let after_empty = std::mem::take(&mut self.after_empty);
        if ch == '"' && after_empty {
            self.text_block = true;
            self.quote_run = 0;
            return false;
        }
        if ch == '"' || ch == '\'' {
            self.quote = Some(ch);
            self.just_opened = true;
            return false;
        }
        true
    }

    fn in_literal(&self) -> bool {
        self.quote.is_some() || self.text_block
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CommentState {
    Code,
    LineComment,
    BlockComment,
}

/// Remove `//` and `/* */` comments, leaving literals untouched.
///
/// Line structure is preserved: a line comment keeps its newline and a block
/// comment is replaced by a space plus the newlines it spanned.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = CommentState::Code;
    let mut tracker = LiteralTracker::default();
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            CommentState::Code => {
                let is_code = tracker.step(ch);
                match ch {
                    '/' if is_code && chars.peek() == Some(&'/') => {
                        chars.next();
                        state = CommentState::LineComment;
                    }
                    '/' if is_code && chars.peek() == Some(&'*') => {
                        chars.next();
                        out.push(' ');
                        state = CommentState::BlockComment;
                    }
                    _ => out.push(ch),
                }
            }
            CommentState::LineComment => {
                if ch == '\n' {
                    out.push('\n');
                    state = CommentState::Code;
                }
            }
            CommentState::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = CommentState::Code;
                } else if ch == '\n' {
                    out.push('\n');
                }
            }
        }
    }
    out
}

/// Blank out literal contents with spaces, keeping the quotes and every byte
/// offset, so structural searches can run on the result
pub fn mask_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut tracker = LiteralTracker::default();
    for ch in text.chars() {
        let was_inside = tracker.in_literal();
        // text block delimiters must survive a second scan
        let delimiter = tracker.text_block && (ch == '"' || ch == '\\');
        let is_code = tracker.step(ch);
        if is_code || ch == '\n' || delimiter || (!was_inside && tracker.in_literal()) {
            out.push(ch);
        } else if was_inside && !tracker.in_literal() {
            // closing quote
            out.push(ch);
        } else {
            out.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        }
    }
    out
}

/// Package name from the first package declaration, or empty
pub fn extract_package(text: &str) -> String {
    PACKAGE_DECL
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Byte offset of the brace closing the one at `open`
pub fn find_matching_brace(text: &str, open: usize) -> Option<usize> {
    if text.as_bytes().get(open) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut tracker = LiteralTracker::default();
    for (offset, ch) in text[open..].char_indices() {
        if !tracker.step(ch) {
            continue;
        }
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Text strictly between the first `{` at or after `start` and its match.
///
/// `None` when there is no opening brace or it is never closed.
pub fn extract_body(text: &str, start: usize) -> Option<&str> {
    let open = start + text.get(start..)?.find('{')?;
    let close = find_matching_brace(text, open)?;
    Some(&text[open + 1..close])
}

/// Keep only depth-zero text of a body; nested blocks collapse to `{}`
pub fn project_top_level(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut tracker = LiteralTracker::default();
    for ch in body.chars() {
        let is_code = tracker.step(ch);
        if is_code && ch == '{' {
            if depth == 0 {
                out.push('{');
            }
            depth += 1;
        } else if is_code && ch == '}' {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                out.push('}');
            }
        } else if depth == 0 {
            out.push(ch);
        }
    }
    out
}

/// Split a projected body into logical statements.
///
/// A statement ends at a top-level `;` (kept) or after a collapsed `{}`
/// block. A block that follows an `=` outside parentheses belongs to an
/// initializer (array literal, anonymous class, lambda), so the statement
/// runs on to its `;`. Leading annotations are removed and blank statements
/// dropped.
pub fn split_statements(projected: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut tracker = LiteralTracker::default();
    let mut parens = 0usize;
    let mut initializer = false;
    for ch in projected.chars() {
        let is_code = tracker.step(ch);
        current.push(ch);
        if !is_code {
            continue;
        }
        let ends = match ch {
            '(' => {
                parens += 1;
                false
            }
            ')' => {
                parens = parens.saturating_sub(1);
                false
            }
            '=' if parens == 0 => {
                initializer = true;
                false
            }
            ';' => true,
            '}' => !initializer,
            _ => false,
        };
        if ends {
            push_statement(&mut statements, &current);
            current.clear();
            parens = 0;
            initializer = false;
        }
    }
    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let stripped = strip_annotations(raw.trim());
    if !stripped.is_empty() {
        statements.push(stripped.to_string());
    }
}

/// Remove leading `@Name` / `@Name(...)` annotations
pub fn strip_annotations(text: &str) -> &str {
    let mut rest = text.trim_start();
    while rest.starts_with('@') && !rest.starts_with("@interface") {
        let Some(name) = ANNOTATION_NAME.find(rest) else {
            break;
        };
        rest = &rest[name.end()..];
        if rest.starts_with('(') {
            match matching_paren(rest, 0) {
                Some(close) => rest = &rest[close + 1..],
                None => break,
            }
        }
        rest = rest.trim_start();
    }
    rest
}

/// Byte offset of the `)` closing the `(` at `open`
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut tracker = LiteralTracker::default();
    for (offset, ch) in text[open..].char_indices() {
        if !tracker.step(ch) {
            continue;
        }
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_and_block_comments() {
        let src = "int a; // trailing\n/* block\n spans */ int b;";
        let cleaned = strip_comments(src);
        assert!(!cleaned.contains("trailing"));
        assert!(!cleaned.contains("spans"));
        assert!(cleaned.contains("int a;"));
        assert!(cleaned.contains("int b;"));
        assert_eq!(cleaned.lines().count(), src.lines().count());
    }

    #[test]
    fn test_comment_markers_inside_literals_survive() {
        let src = r#"String url = "http://example.com/*x*/"; char c = '/'; int d = 4 / 2; // gone"#;
        let cleaned = strip_comments(src);
        assert!(cleaned.contains(r#""http://example.com/*x*/""#));
        assert!(cleaned.contains("'/'"));
        assert!(cleaned.contains("4 / 2"));
        assert!(!cleaned.contains("gone"));
    }

    #[test]
    fn test_escaped_quote_does_not_end_literal() {
        let src = r#"String s = "say \"//hi\""; // note"#;
        let cleaned = strip_comments(src);
        assert!(cleaned.contains(r#""say \"//hi\"""#));
        assert!(!cleaned.contains("note"));
    }

    #[test]
    fn test_text_block_spans_lines() {
        let src = "String page = \"\"\"\n  see http://acme.com/{id}\n  \"quoted\" // kept\n  \"\"\";\nint n; // gone\n";
        let cleaned = strip_comments(src);
        assert!(cleaned.contains("http://acme.com/{id}"));
        assert!(cleaned.contains("// kept"));
        assert!(!cleaned.contains("gone"));

        let body = format!("class Page {{ {src} }}");
        let extracted = extract_body(&body, 0).unwrap();
        assert!(extracted.ends_with("int n; // gone\n "));
        let statements = split_statements(&project_top_level(&mask_literals(&cleaned)));
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1], "int n;");
    }

    #[test]
    fn test_empty_string_is_not_a_text_block() {
        let cleaned = strip_comments("String a = \"\"; // gone\nString b = \"x\";");
        assert!(!cleaned.contains("gone"));
        assert!(cleaned.contains("String b = \"x\";"));
    }

    #[test]
    fn test_mask_literals_keeps_offsets() {
        let src = r#"a = "{x}"; b = '{';"#;
        let masked = mask_literals(src);
        assert_eq!(masked.len(), src.len());
        assert!(!masked.contains('{'));
        assert!(masked.starts_with("a = \""));
    }

    #[test]
    fn test_extract_package() {
        assert_eq!(extract_package("package com.acme.shop;\nclass A {}"), "com.acme.shop");
        assert_eq!(extract_package("class A {}"), "");
    }

    #[test]
    fn test_extract_body_nested() {
        let text = "class A { void f() { if (x) { y(); } } int z; } trailing";
        let body = extract_body(text, 0).unwrap();
        assert_eq!(body, " void f() { if (x) { y(); } } int z; ");
    }

    #[test]
    fn test_extract_body_ignores_braces_in_literals() {
        let text = r#"class A { String s = "}"; char c = '{'; }"#;
        let body = extract_body(text, 0).unwrap();
        assert_eq!(body, r#" String s = "}"; char c = '{'; "#);
    }

    #[test]
    fn test_extract_body_unbalanced() {
        assert!(extract_body("class A { void f() { ", 0).is_none());
        assert!(extract_body("no braces here", 0).is_none());
    }

    #[test]
    fn test_project_and_split() {
        let body = " @Override public String toString() { return \"a;b\"; }\n private int n = 1;\n static { init(); } ";
        let projected = project_top_level(body);
        assert!(!projected.contains("return"));
        let statements = split_statements(&projected);
        assert_eq!(
            statements,
            vec![
                "public String toString() {}".to_string(),
                "private int n = 1;".to_string(),
                "static {}".to_string(),
            ]
        );
    }

    #[test]
    fn test_initializer_blocks_stay_in_their_statement() {
        let body = " private final Item[] slots = { new Item() };\n Runnable r = new Runnable() { public void run() {} };\n Comparator<Item> c = (a, b) -> { return 0; };\n @Size(max = 3) void f() { }\n int n; ";
        let statements = split_statements(&project_top_level(body));
        assert_eq!(
            statements,
            vec![
                "private final Item[] slots = {};".to_string(),
                "Runnable r = new Runnable() {};".to_string(),
                "Comparator<Item> c = (a, b) -> {};".to_string(),
                "void f() {}".to_string(),
                "int n;".to_string(),
            ]
        );
    }

    #[test]
    fn test_strip_annotations_with_arguments() {
        assert_eq!(
            strip_annotations("@Column(name = \"x\") @Id private long id;"),
            "private long id;"
        );
    }
}

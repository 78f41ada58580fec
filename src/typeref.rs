//! Type reference normalization.
//!
//! Pure string functions that reduce a declared type as written in source
//! (`java.util.Map<String, com.acme.Item>[]`) to the simple name used for
//! identity lookups (`Item`), plus the collection test used when classifying
//! relationships. None of these consult the model.

use once_cell::sync::Lazy;
use regex::Regex;

/// Primitive types materialized once per model
pub const PRIMITIVE_TYPES: &[&str] = &[
    "int", "float", "double", "boolean", "String", "void", "long", "byte", "char",
];

/// Container names that mark a declared type as collection-valued
const COLLECTION_TYPES: &[&str] = &[
    "List",
    "ArrayList",
    "LinkedList",
    "Vector",
    "Set",
    "HashSet",
    "TreeSet",
    "LinkedHashSet",
    "Map",
    "HashMap",
    "TreeMap",
    "LinkedHashMap",
    "LongMap",
    "Collection",
    "Queue",
    "Deque",
    "ArrayDeque",
    "ConcurrentLinkedQueue",
    "LinkedBlockingQueue",
    "AtomicReference",
];

static IDENT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_$][\w$]*").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

/// Strip trailing `[]` pairs and a varargs `...`
fn strip_array_suffix(raw: &str) -> &str {
    let mut s = raw.trim();
    loop {
        if let Some(rest) = s.strip_suffix("...") {
            s = rest.trim_end();
        } else if let Some(rest) = s.strip_suffix(']') {
            match rest.trim_end().strip_suffix('[') {
                Some(rest) => s = rest.trim_end(),
                None => return s,
            }
        } else {
            return s;
        }
    }
}

/// Canonical base name of a declared type.
///
/// Arrays are stripped, the innermost generic argument list wins (its last
/// top-level segment for multi-argument lists such as a map's value type),
/// wildcards reduce to their bound, and any package prefix is dropped.
pub fn base_type_name(raw: &str) -> String {
    let mut s = strip_array_suffix(raw).to_string();

    if let Some(open) = s.find('<') {
        let close = s[open..].find('>').map(|i| open + i).unwrap_or(s.len());
        let inner_open = s[..close].rfind('<').unwrap_or(open);
        let inner = &s[inner_open + 1..close];
        let segment = match split_top_level(inner, ',').pop() {
            Some(last) => last,
            None => inner.to_string(),
        };
        s = segment;
    }

    let mut s = strip_array_suffix(&s).trim().to_string();
    for bound in ["? extends ", "? super "] {
        if let Some(rest) = s.strip_prefix(bound) {
            s = rest.trim().to_string();
        }
    }

    let s = match s.rfind('.') {
        Some(dot) => &s[dot + 1..],
        None => s.as_str(),
    };
    s.trim().to_string()
}

/// Whether a declared type is collection-valued.
///
/// Inspects the raw text so the container name is still visible: arrays,
/// varargs, or any identifier token naming a known container.
pub fn is_collection_type(raw: &str) -> bool {
    if raw.contains("[]") || raw.contains("...") {
        return true;
    }
    IDENT_TOKEN
        .find_iter(raw)
        .any(|token| COLLECTION_TYPES.contains(&token.as_str()))
}

/// Multiplicity of the target end for a field of this declared type
pub fn multiplicity(raw: &str) -> Option<String> {
    if is_collection_type(raw) {
        Some("*".to_string())
    } else {
        None
    }
}

/// Outer simple name of a supertype reference (`com.x.Base<T>` -> `Base`)
pub fn simple_type_name(raw: &str) -> String {
    let s = strip_array_suffix(raw);
    let s = match s.find('<') {
        Some(open) => &s[..open],
        None => s,
    };
    let s = s.trim();
    match s.rfind('.') {
        Some(dot) => s[dot + 1..].to_string(),
        None => s.to_string(),
    }
}

/// Cosmetic cleanup of a declared type for display
pub fn display_type(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw.trim(), " ");
    let mut out = String::with_capacity(collapsed.len());
    for ch in collapsed.chars() {
        match ch {
            '<' | '>' | '[' | ']' => {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push(ch);
            }
            ',' => {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push_str(", ");
            }
            ' ' if out.ends_with(['<', '[', ' ']) => {}
            _ => out.push(ch),
        }
    }
    out.trim().to_string()
}

/// Split on `sep` at nesting depth zero with respect to `<>`, `()` and `[]`
pub fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for ch in text.chars() {
        match ch {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
        if ch == sep && depth == 0 {
            parts.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts.retain(|p| !p.is_empty());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_type_name() {
        assert_eq!(base_type_name("int"), "int");
        assert_eq!(base_type_name("Item[]"), "Item");
        assert_eq!(base_type_name("Item[ ][ ]"), "Item");
        assert_eq!(base_type_name("List<Item>"), "Item");
        assert_eq!(base_type_name("java.util.List<com.acme.Item>"), "Item");
        assert_eq!(base_type_name("Map<String, Item>"), "Item");
        assert_eq!(base_type_name("Map<String, List<Item>>"), "Item");
        assert_eq!(base_type_name("com.acme.Item"), "Item");
        assert_eq!(base_type_name("  Item  "), "Item");
        assert_eq!(base_type_name("String..."), "String");
    }

    #[test]
    fn test_base_type_name_wildcards() {
        assert_eq!(base_type_name("List<? extends Shape>"), "Shape");
        assert_eq!(base_type_name("Comparator<? super Item>"), "Item");
    }

    #[test]
    fn test_base_type_name_is_pure() {
        let raw = "Map<Long, com.acme.Order>[]";
        assert_eq!(base_type_name(raw), base_type_name(raw));
    }

    #[test]
    fn test_collection_detection_uses_raw_text() {
        assert!(is_collection_type("List<Item>"));
        assert!(is_collection_type("java.util.HashMap<String, Item>"));
        assert!(is_collection_type("Item[]"));
        assert!(is_collection_type("AtomicReference<Engine>"));
        assert!(!is_collection_type("Item"));
        // container names must be whole tokens
        assert!(!is_collection_type("Settings"));
        assert!(!is_collection_type("EventListener"));
    }

    #[test]
    fn test_multiplicity() {
        assert_eq!(multiplicity("Set<Tag>"), Some("*".to_string()));
        assert_eq!(multiplicity("Tag"), None);
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("com.acme.Base<T>"), "Base");
        assert_eq!(simple_type_name("Comparable<Item>"), "Comparable");
        assert_eq!(simple_type_name("Entity"), "Entity");
    }

    #[test]
    fn test_display_type() {
        assert_eq!(display_type("Map < String ,Item >"), "Map<String, Item>");
        assert_eq!(display_type("int [ ]"), "int[]");
        assert_eq!(display_type("List<\n   Item>"), "List<Item>");
        assert_eq!(display_type("List<? extends Shape>"), "List<? extends Shape>");
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(
            split_top_level("Map<String, Item> m, int n", ','),
            vec!["Map<String, Item> m".to_string(), "int n".to_string()]
        );
        assert!(split_top_level("  ", ',').is_empty());
    }
}

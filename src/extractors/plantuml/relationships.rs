/// Link lines between diagram types
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::{Relationship, RelationshipKind};
use crate::typeref;

static LINK_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^("?[\w.$]+"?)\s*(?:"([^"]*)"\s*)?(<\|--|<\|\.\.|\.\.\|>|--\|>|\*--|o--|-->|\.\.>|--)\s*(?:"([^"]*)"\s*)?("?[\w.$]+"?)\s*(?::\s*(.+))?$"#,
    )
    .unwrap()
});

/// A parsed link, normalized so `source` is the owning/sub/client side
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Link {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    pub label: Option<String>,
    pub multiplicity: Option<String>,
}

impl Link {
    pub(super) fn into_relationship(self) -> Relationship {
        let relationship = Relationship::new(self.source, self.target, self.kind)
            .with_multiplicity(self.multiplicity);
        match self.label {
            Some(label) => relationship.with_label(label),
            None => relationship,
        }
    }

    pub(super) fn is_supertype_link(&self) -> bool {
        matches!(
            self.kind,
            RelationshipKind::Generalization | RelationshipKind::Realization
        )
    }
}

fn type_name(raw: &str) -> String {
    typeref::simple_type_name(raw.trim_matches('"'))
}

/// Parse `Left ["m"] symbol ["m"] Right [: label]`
pub(super) fn parse_link_line(line: &str) -> Option<Link> {
    let captures = LINK_LINE.captures(line)?;
    let left = type_name(captures.get(1)?.as_str());
    let right = type_name(captures.get(5)?.as_str());
    // only the target-end multiplicity is modeled
    let right_multiplicity = captures.get(4).map(|m| m.as_str().trim().to_string());
    let label = captures
        .get(6)
        .map(|m| m.as_str().trim().to_string())
        .filter(|l| !l.is_empty());

    let (source, target, kind, multiplicity) = match captures.get(3)?.as_str() {
        "<|--" => (right, left, RelationshipKind::Generalization, None),
        "--|>" => (left, right, RelationshipKind::Generalization, None),
        "<|.." => (right, left, RelationshipKind::Realization, None),
        "..|>" => (left, right, RelationshipKind::Realization, None),
        "*--" => (left, right, RelationshipKind::Composition, right_multiplicity),
        "o--" => (left, right, RelationshipKind::Aggregation, right_multiplicity),
        "-->" | "--" => (left, right, RelationshipKind::Association, right_multiplicity),
        "..>" => (left, right, RelationshipKind::Dependency, right_multiplicity),
        _ => return None,
    };

    Some(Link {
        source,
        target,
        kind,
        label,
        multiplicity: multiplicity.filter(|m| !m.is_empty()),
    })
}

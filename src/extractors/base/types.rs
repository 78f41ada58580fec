// Base Extractor Types for umlscan
//
// All data structures produced by the front-ends: type declarations, their
// members, and the relationships between them.

use serde::{Deserialize, Serialize};

/// Kind of a modeled type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enumeration,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Enumeration => write!(f, "enum"),
        }
    }
}

impl TypeKind {
    /// Convert from a declaration keyword (`class`, `interface`, `enum`)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(TypeKind::Class),
            "interface" => Some(TypeKind::Interface),
            "enum" => Some(TypeKind::Enumeration),
            _ => None,
        }
    }
}

/// Visibility levels for members
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Protected,
    #[default]
    Package,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Package => write!(f, "package"),
        }
    }
}

impl Visibility {
    /// Symbol used by the textual diagram grammar
    pub fn symbol(&self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Package => '~',
        }
    }

    /// Inverse of [`Visibility::symbol`]. A missing symbol reads as public.
    pub fn from_symbol(symbol: Option<char>) -> Self {
        match symbol {
            Some('-') => Visibility::Private,
            Some('#') => Visibility::Protected,
            Some('~') => Visibility::Package,
            _ => Visibility::Public,
        }
    }
}

/// A typed attribute of a type declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Declared type as written (after display cleanup)
    pub declared_type: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Source `final` / `readonly`
    pub is_readonly: bool,
}

/// A formal parameter of an operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub declared_type: String,
}

/// Return type used when an operation declares none
pub const VOID: &str = "void";

/// A method signature owned by a type declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: VOID.to_string(),
            visibility: Visibility::default(),
            is_static: false,
            is_abstract: false,
        }
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.trim().is_empty() || self.return_type == VOID
    }
}

/// Member of a type declaration, kept in declaration order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Field(Field),
    Operation(Operation),
}

/// A modeled class, interface, or enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    /// Package the declaration was found in (empty when unknown)
    pub package: String,
    pub is_abstract: bool,
    superclass: Option<String>,
    implemented_interfaces: Vec<String>,
    extended_interfaces: Vec<String>,
    pub members: Vec<Member>,
    pub enum_literals: Vec<String>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            package: String::new(),
            is_abstract: false,
            superclass: None,
            implemented_interfaces: Vec::new(),
            extended_interfaces: Vec::new(),
            members: Vec::new(),
            enum_literals: Vec::new(),
        }
    }

    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    pub fn implemented_interfaces(&self) -> &[String] {
        &self.implemented_interfaces
    }

    pub fn extended_interfaces(&self) -> &[String] {
        &self.extended_interfaces
    }

    /// Set the single superclass. Only classes carry one, and a type never
    /// extends itself; both cases are ignored and reported as `false`.
    pub fn set_superclass(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.kind != TypeKind::Class || name.is_empty() || name == self.name {
            return false;
        }
        self.superclass = Some(name);
        true
    }

    /// Append to the ordered set of implemented interfaces
    pub fn add_implemented_interface(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() || name == self.name || self.implemented_interfaces.contains(&name) {
            return false;
        }
        self.implemented_interfaces.push(name);
        true
    }

    /// Append to the ordered set of extended interfaces (interfaces only)
    pub fn add_extended_interface(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.kind != TypeKind::Interface
            || name.is_empty()
            || name == self.name
            || self.extended_interfaces.contains(&name)
        {
            return false;
        }
        self.extended_interfaces.push(name);
        true
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            Member::Operation(_) => None,
        })
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.members.iter().filter_map(|m| match m {
            Member::Operation(o) => Some(o),
            Member::Field(_) => None,
        })
    }

    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

/// Relationship kinds between type declarations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Composition,
    Aggregation,
    Association,
    Generalization,
    Realization,
    Dependency,
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipKind::Composition => write!(f, "composition"),
            RelationshipKind::Aggregation => write!(f, "aggregation"),
            RelationshipKind::Association => write!(f, "association"),
            RelationshipKind::Generalization => write!(f, "generalization"),
            RelationshipKind::Realization => write!(f, "realization"),
            RelationshipKind::Dependency => write!(f, "dependency"),
        }
    }
}

impl RelationshipKind {
    /// Convert from string representation
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "composition" => Some(RelationshipKind::Composition),
            "aggregation" => Some(RelationshipKind::Aggregation),
            "association" => Some(RelationshipKind::Association),
            "generalization" => Some(RelationshipKind::Generalization),
            "realization" => Some(RelationshipKind::Realization),
            "dependency" => Some(RelationshipKind::Dependency),
            _ => None,
        }
    }

    /// Two-ended structural links (rendered with member ends)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RelationshipKind::Composition
                | RelationshipKind::Aggregation
                | RelationshipKind::Association
        )
    }
}

/// Directed relationship between two type declarations, by name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    /// Originating field or operation name
    pub label: Option<String>,
    /// Multiplicity of the target end ("*" for collections)
    pub multiplicity: Option<String>,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            label: None,
            multiplicity: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: Option<String>) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    /// Same endpoints, kind and label (multiplicity is presentation only)
    pub fn same_link(&self, other: &Relationship) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.kind == other.kind
            && self.label == other.label
    }
}

/// Everything a front-end recovers from one source unit
#[derive(Debug, Clone, Default)]
pub struct ExtractionResults {
    pub package: String,
    pub types: Vec<TypeDeclaration>,
    /// Relationships written explicitly in the source (diagram link lines)
    pub relationships: Vec<Relationship>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_never_extends_itself() {
        let mut decl = TypeDeclaration::new("Node", TypeKind::Class);
        assert!(!decl.set_superclass("Node"));
        assert!(!decl.add_implemented_interface("Node"));
        assert!(decl.superclass().is_none());
        assert!(decl.implemented_interfaces().is_empty());
    }

    #[test]
    fn test_only_classes_have_superclass() {
        let mut decl = TypeDeclaration::new("Shape", TypeKind::Interface);
        assert!(!decl.set_superclass("Base"));
        assert!(decl.add_extended_interface("Drawable"));
        assert_eq!(decl.extended_interfaces(), ["Drawable".to_string()]);
    }

    #[test]
    fn test_implemented_interfaces_are_an_ordered_set() {
        let mut decl = TypeDeclaration::new("Impl", TypeKind::Class);
        assert!(decl.add_implemented_interface("B"));
        assert!(decl.add_implemented_interface("A"));
        assert!(!decl.add_implemented_interface("B"));
        assert_eq!(
            decl.implemented_interfaces(),
            ["B".to_string(), "A".to_string()]
        );
    }

    #[test]
    fn test_visibility_symbols_round_trip() {
        for vis in [
            Visibility::Public,
            Visibility::Private,
            Visibility::Protected,
            Visibility::Package,
        ] {
            assert_eq!(Visibility::from_symbol(Some(vis.symbol())), vis);
        }
        assert_eq!(Visibility::from_symbol(None), Visibility::Public);
    }

    #[test]
    fn test_members_keep_declaration_order() {
        let mut decl = TypeDeclaration::new("Account", TypeKind::Class);
        decl.members.push(Member::Operation(Operation::new("open")));
        decl.members.push(Member::Field(Field {
            name: "balance".to_string(),
            declared_type: "long".to_string(),
            visibility: Visibility::Private,
            is_static: false,
            is_readonly: false,
        }));
        assert_eq!(decl.fields().count(), 1);
        assert_eq!(decl.operations().count(), 1);
        assert!(matches!(decl.members[0], Member::Operation(_)));
    }
}

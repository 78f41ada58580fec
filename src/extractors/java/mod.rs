/// Java extractor: recovers type declarations from Java-like source text
/// without a grammar, using the lexical scanner plus line-shape recognizers.
///
/// This module is organized into focused sub-modules:
/// - helpers: Shared utility functions (modifiers, visibility, parameter lists)
/// - classes: Class, interface and enum header/body extraction
/// - fields: Field recognizer
/// - methods: Operation recognizer
/// - enums: Enum literal section
mod classes;
mod enums;
mod fields;
mod helpers;
mod methods;

use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::extractors::base::{BaseExtractor, ExtractionResults, Member, TypeKind};
use crate::extractors::scanner;

/// Enclosing type seen by the member recognizers
pub(crate) struct MemberContext<'a> {
    pub type_name: &'a str,
    pub kind: TypeKind,
}

impl<'a> MemberContext<'a> {
    pub fn new(type_name: &'a str, kind: TypeKind) -> Self {
        Self { type_name, kind }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

type Recognizer = fn(&str, &MemberContext) -> Option<Member>;

/// Member recognizers in priority order; the first match wins
const MEMBER_RECOGNIZERS: &[(&str, Recognizer)] = &[
    ("field", fields::recognize_field),
    ("operation", methods::recognize_operation),
];

/// Java extractor for extracting type declarations from Java source code
pub struct JavaExtractor {
    base: BaseExtractor,
}

impl JavaExtractor {
    pub fn new(unit_id: String, content: String) -> Self {
        Self {
            base: BaseExtractor::new(unit_id, content),
        }
    }

    /// Extract every type declaration in the unit
    pub fn extract(&mut self) -> ExtractionResults {
        let cleaned = scanner::strip_comments(&self.base.content);
        let masked = scanner::mask_literals(&cleaned);
        let package = scanner::extract_package(&masked);

        let types = classes::extract_types(self, &masked, &package);
        debug!(
            "Java unit '{}': {} types, {} members",
            self.base.unit_id,
            types.len(),
            types.iter().map(|t| t.members.len()).sum::<usize>()
        );

        ExtractionResults {
            package,
            types,
            relationships: Vec::new(),
        }
    }

    pub(crate) fn recognize_member(
        &self,
        statement: &str,
        context: &MemberContext,
    ) -> Option<Member> {
        let hit = MEMBER_RECOGNIZERS
            .iter()
            .find_map(|(label, recognize)| recognize(statement, context).map(|m| (*label, m)));
        match hit {
            Some((label, member)) => {
                trace!("{} recognized in `{}`", label, context.type_name);
                Some(member)
            }
            None => {
                debug!(
                    "dropped statement in `{}`: {}",
                    context.type_name,
                    BaseExtractor::truncate_string(statement, 60)
                );
                None
            }
        }
    }

    pub fn take_errors(&mut self) -> Vec<ExtractionError> {
        self.base.take_errors()
    }

    // ========================================================================
    // Accessors for sub-modules
    // ========================================================================

    pub(crate) fn base_mut(&mut self) -> &mut BaseExtractor {
        &mut self.base
    }
}

//! Index of the string constants a location already declares.

use crate::source::{NodeId, SourceLocation, SourceNode};
use std::collections::HashMap;

/// One declarator of an existing string-constant declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingDeclaration {
    pub name: String,
    /// Initializer text as written (literals keep their quotes), `None` when
    /// the declaration has no initializer.
    pub initializer: Option<String>,
    /// The declaration node holding this declarator.
    pub anchor: NodeId,
}

impl ExistingDeclaration {
    /// Whether the initializer equals `value` raw or quote-wrapped.
    pub fn holds_value(&self, value: &str) -> bool {
        self.initializer.as_deref().is_some_and(|init| {
            init == value
                || init
                    .strip_prefix('"')
                    .and_then(|rest| rest.strip_suffix('"'))
                    .is_some_and(|inner| inner == value)
        })
    }
}

/// Existing global string constants of one location, keyed by name.
///
/// A name may be declared more than once (for example after an earlier
/// conflict insertion); all declarations are kept in document order.
#[derive(Debug, Clone, Default)]
pub struct ConstantIndex {
    entries: HashMap<String, Vec<ExistingDeclaration>>,
}

impl ConstantIndex {
    /// Index the direct children of a location. Nested nodes are not visited
    /// and declarations of any other type are ignored.
    pub fn scan(children: &[SourceNode]) -> Self {
        let mut entries: HashMap<String, Vec<ExistingDeclaration>> = HashMap::new();

        for node in children {
            let Some((type_name, declarators)) = node.declaration() else {
                continue;
            };
            if !is_string_constant_type(type_name) {
                continue;
            }
            for declarator in declarators {
                entries
                    .entry(declarator.name.clone())
                    .or_default()
                    .push(ExistingDeclaration {
                        name: declarator.name.clone(),
                        initializer: declarator.initializer.as_ref().map(|i| i.raw_text().to_string()),
                        anchor: node.id,
                    });
            }
        }

        Self { entries }
    }

    /// Index a location, or nothing when it is unavailable.
    pub fn scan_location<L: SourceLocation + ?Sized>(location: Option<&L>) -> Self {
        location.map_or_else(Self::default, |l| Self::scan(l.children()))
    }

    /// All declarations of `name`, in document order.
    pub fn get(&self, name: &str) -> &[ExistingDeclaration] {
        self.entries.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `NSString *` or `NSString`, whitespace-insensitive.
pub fn is_string_constant_type(type_name: &str) -> bool {
    let compact: String = type_name.split_whitespace().collect();
    compact == "NSString*" || compact == "NSString"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceDocument;

    #[test]
    fn test_scan_indexes_each_declarator() {
        let doc = SourceDocument::parse(
            "NSString *PEX_A = @\"a\", *PEX_B = @\"b\";\nextern NSString * PEX_C;\nstatic int PEX_D = 3;\n",
        );
        let index = ConstantIndex::scan(doc.children());

        assert_eq!(index.len(), 3);
        assert_eq!(index.get("PEX_A")[0].initializer.as_deref(), Some("\"a\""));
        assert_eq!(index.get("PEX_A")[0].anchor, index.get("PEX_B")[0].anchor);
        assert_eq!(index.get("PEX_C")[0].initializer, None);
        assert!(!index.contains("PEX_D"));
    }

    #[test]
    fn test_scan_keeps_duplicates_in_order() {
        let doc = SourceDocument::parse(
            "NSString *PEX_A = @\"a\";\nNSString *PEX_A = @\"b\"; //TODO: verify\n",
        );
        let index = ConstantIndex::scan(doc.children());
        let entries = index.get("PEX_A");
        assert_eq!(entries.len(), 2);
        assert!(entries[0].anchor < entries[1].anchor);
        assert!(entries[1].holds_value("b"));
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let doc = SourceDocument::parse("@implementation Foo\nNSString *PEX_A = @\"a\";\n@end\n");
        assert!(ConstantIndex::scan(doc.children()).is_empty());
    }

    #[test]
    fn test_holds_value_raw_and_quoted() {
        let mut entry = ExistingDeclaration {
            name: "PEX_A".to_string(),
            initializer: Some("\"title\"".to_string()),
            anchor: NodeId(1),
        };
        assert!(entry.holds_value("title"));
        assert!(!entry.holds_value("name"));

        entry.initializer = Some("title".to_string());
        assert!(entry.holds_value("title"));

        entry.initializer = None;
        assert!(!entry.holds_value("title"));
    }

    #[test]
    fn test_string_constant_types() {
        assert!(is_string_constant_type("NSString *"));
        assert!(is_string_constant_type("NSString*"));
        assert!(is_string_constant_type("NSString"));
        assert!(!is_string_constant_type("NSNumber *"));
    }

    #[test]
    fn test_missing_location_is_empty() {
        let index = ConstantIndex::scan_location::<SourceDocument>(None);
        assert!(index.is_empty());
    }
}

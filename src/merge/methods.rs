//! Placement of the generated methods.
//!
//! Signatures and bodies go into the class's own `@interface` and
//! `@implementation` containers. A method that already exists is never
//! touched: an identical one is left alone and a differing one gets the
//! generated body inserted after it, behind a verification marker.

use crate::codegen::types::GeneratedMethod;
use crate::config::GeneratorConfig;
use crate::source::{ContainerKind, NodeId, SourceLocation, SourceNode};
use log::{trace, warn};

/// The members of one class container.
#[derive(Debug, Clone, Copy)]
pub struct ClassBody<'a> {
    pub class: NodeId,
    pub members: &'a [SourceNode],
}

impl<'a> ClassBody<'a> {
    /// The `kind` container of `class_name` in `location`, if there is one.
    pub fn locate<L: SourceLocation + ?Sized>(location: &'a L, class_name: &str, kind: ContainerKind) -> Option<Self> {
        let class = location.find_class(class_name, kind)?;
        Some(Self {
            class,
            members: location.class_members(class)?,
        })
    }

    fn methods<'s>(&'s self, selector: &'s str) -> impl Iterator<Item = &'a SourceNode> + 's {
        self.members.iter().filter(move |m| m.selector() == Some(selector))
    }
}

/// Interface-side placement of a method signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationPlacement {
    /// Add the signature as the last member of the class.
    AddDeclaration { class: NodeId },
    /// A signature with the same selector already exists.
    DeclarationPresent(NodeId),
}

/// Implementation-side placement of a method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionPlacement {
    /// Add the body as the last member of the class.
    AppendToClass { class: NodeId },
    /// A method with the same selector but different text exists; the marked
    /// body goes directly after it.
    InsertAfterExisting { existing: NodeId },
    /// The generated body is already there.
    Unchanged(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPlan {
    pub method: GeneratedMethod,
    /// `None` when the side has no class container.
    pub declaration: Option<DeclarationPlacement>,
    pub implementation: Option<DefinitionPlacement>,
    /// Body text to write on the implementation side.
    pub definition: String,
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim_end() == b.trim_end()
}

/// Plan every method against the class bodies of both sides.
pub fn plan_methods(
    methods: &[GeneratedMethod],
    declaration: Option<ClassBody<'_>>,
    implementation: Option<ClassBody<'_>>,
    config: &GeneratorConfig,
) -> Vec<MethodPlan> {
    methods
        .iter()
        .map(|method| {
            let marked = format!("// {}\n{}", config.verify_marker, method.definition);

            let declaration = declaration.map(|body| match body.methods(&method.selector).next() {
                Some(existing) => DeclarationPlacement::DeclarationPresent(existing.id),
                None => DeclarationPlacement::AddDeclaration { class: body.class },
            });

            let mut definition = method.definition.clone();
            let implementation = implementation.map(|body| {
                let mut last = None;
                for existing in body.methods(&method.selector) {
                    if same_text(&existing.text, &method.definition) || same_text(&existing.text, &marked) {
                        return DefinitionPlacement::Unchanged(existing.id);
                    }
                    last = Some(existing.id);
                }
                match last {
                    Some(existing) => {
                        warn!("Method {} differs from the generated one; adding a marked copy", method.selector);
                        definition = marked.clone();
                        DefinitionPlacement::InsertAfterExisting { existing }
                    }
                    None => DefinitionPlacement::AppendToClass { class: body.class },
                }
            });
            trace!("Method {}: {:?} / {:?}", method.selector, declaration, implementation);

            MethodPlan {
                method: method.clone(),
                declaration,
                implementation,
                definition,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceDocument;

    fn method(selector: &str) -> GeneratedMethod {
        GeneratedMethod {
            selector: selector.to_string(),
            declaration: format!("- (void){};", selector),
            definition: format!("- (void){} {{\n}}\n", selector),
        }
    }

    #[test]
    fn test_plan_against_existing_members() {
        let header = SourceDocument::parse("@interface Foo : NSObject\n- (void)getDbContentValues;\n@end\n");
        let implementation = SourceDocument::parse(
            "@implementation Foo\n- (void)getDbContentValues {\n    [cv put: @\"custom\" string: _custom];\n}\n@end\n",
        );
        let declaration = ClassBody::locate(&header, "Foo", ContainerKind::Interface).unwrap();
        let definition = ClassBody::locate(&implementation, "Foo", ContainerKind::Implementation).unwrap();
        let existing_decl = declaration.members[0].id;
        let existing_impl = definition.members[0].id;

        let plans = plan_methods(
            &[method("getCreateTable"), method("getDbContentValues")],
            Some(declaration),
            Some(definition),
            &GeneratorConfig::default(),
        );

        assert_eq!(
            plans[0].declaration,
            Some(DeclarationPlacement::AddDeclaration { class: declaration.class })
        );
        assert_eq!(
            plans[0].implementation,
            Some(DefinitionPlacement::AppendToClass { class: definition.class })
        );
        assert_eq!(plans[0].definition, plans[0].method.definition);

        assert_eq!(plans[1].declaration, Some(DeclarationPlacement::DeclarationPresent(existing_decl)));
        assert_eq!(
            plans[1].implementation,
            Some(DefinitionPlacement::InsertAfterExisting { existing: existing_impl })
        );
        assert!(plans[1].definition.starts_with("// TODO: verify\n- (void)getDbContentValues {"));
    }

    #[test]
    fn test_identical_method_is_unchanged() {
        let implementation = SourceDocument::parse("@implementation Foo\n- (void)getCreateTable {\n}\n@end\n");
        let body = ClassBody::locate(&implementation, "Foo", ContainerKind::Implementation).unwrap();

        let plans = plan_methods(&[method("getCreateTable")], None, Some(body), &GeneratorConfig::default());
        assert_eq!(
            plans[0].implementation,
            Some(DefinitionPlacement::Unchanged(body.members[0].id))
        );
    }

    #[test]
    fn test_body_is_taken_from_the_named_class() {
        let implementation = SourceDocument::parse(
            "@interface Foo ()\n@end\n\n@implementation Helper\n@end\n\n@implementation Foo\n@end\n",
        );
        let body = ClassBody::locate(&implementation, "Foo", ContainerKind::Implementation).unwrap();
        assert_eq!(implementation.find(body.class).unwrap().text, "@implementation Foo");
        assert!(ClassBody::locate(&implementation, "Foo", ContainerKind::Interface).is_none());
    }

    #[test]
    fn test_missing_side_has_no_placement() {
        let plans = plan_methods(&[method("getCreateTable")], None, None, &GeneratorConfig::default());
        assert_eq!(plans[0].declaration, None);
        assert_eq!(plans[0].implementation, None);
    }
}

//! Applying a merge plan to source locations.

use crate::errors::{DbModelError, DbModelResult};
use crate::merge::Side;
use crate::merge::engine::{InsertAnchor, MergeAction, MergeDecision, MergePlan};
use crate::merge::methods::{DeclarationPlacement, DefinitionPlacement, MethodPlan};
use crate::source::*;
use log::debug;

/// Nodes touched while applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub declaration: Vec<NodeId>,
    pub implementation: Vec<NodeId>,
}

impl ApplyReport {
    pub fn inserted(&self, side: Side) -> &[NodeId] {
        match side {
            Side::Declaration => &self.declaration,
            Side::Implementation => &self.implementation,
        }
    }
}

fn constant_node(action: &MergeAction, side: Side) -> NewNode {
    let initializer = match side {
        Side::Declaration => None,
        Side::Implementation => Some(Initializer::Literal(action.constant.quoted_value())),
    };
    NewNode::string_constant(&action.constant.qualified_name, initializer, action.text(side))
}

/// Apply one side's constant actions in order. Returns the inserted node ids.
///
/// Unanchored constants go directly before `class`, or at the end of the
/// location when there is no class container.
pub fn apply_constants<L: SourceLocation + ?Sized>(
    side: Side,
    actions: &[MergeAction],
    class: Option<NodeId>,
    location: &mut L,
) -> DbModelResult<Vec<NodeId>> {
    let mut produced: Vec<Option<NodeId>> = Vec::with_capacity(actions.len());
    let mut inserted = Vec::new();

    for action in actions {
        let position = match action.decision {
            MergeDecision::SkipIdentical { .. } => {
                produced.push(None);
                continue;
            }
            MergeDecision::Insert { after: None } => class.map_or(InsertPosition::End, InsertPosition::Before),
            MergeDecision::Insert {
                after: Some(InsertAnchor::Existing(id)),
            }
            | MergeDecision::InsertConflict { after: id } => InsertPosition::After(id),
            MergeDecision::Insert {
                after: Some(InsertAnchor::Planned(index)),
            } => {
                let id = produced
                    .get(index)
                    .copied()
                    .flatten()
                    .ok_or(DbModelError::UnresolvedAnchor { side, action: index })?;
                InsertPosition::After(id)
            }
        };

        let id = location.insert(position, constant_node(action, side))?;
        produced.push(Some(id));
        inserted.push(id);
    }

    Ok(inserted)
}

/// Apply method placements for one side.
pub fn apply_methods<L: SourceLocation + ?Sized>(
    side: Side,
    plans: &[MethodPlan],
    location: &mut L,
    report: &mut ApplyReport,
) -> DbModelResult<()> {
    for plan in plans {
        let selector = &plan.method.selector;
        let (position, text) = match side {
            Side::Declaration => match plan.declaration {
                Some(DeclarationPlacement::AddDeclaration { class }) => {
                    (InsertPosition::ClassEnd(class), &plan.method.declaration)
                }
                _ => continue,
            },
            Side::Implementation => match plan.implementation {
                Some(DefinitionPlacement::AppendToClass { class }) => (InsertPosition::ClassEnd(class), &plan.definition),
                Some(DefinitionPlacement::InsertAfterExisting { existing }) => {
                    (InsertPosition::After(existing), &plan.definition)
                }
                _ => continue,
            },
        };

        let id = location.insert(position, NewNode::method(selector, text.clone()))?;
        match side {
            Side::Declaration => report.declaration.push(id),
            Side::Implementation => report.implementation.push(id),
        }
    }
    Ok(())
}

/// Apply a full plan to the companion locations of `class_name`. Missing
/// sides are skipped.
pub fn apply_plan<L: SourceLocation>(
    class_name: &str,
    constants: &MergePlan,
    methods: &[MethodPlan],
    companions: Companions<'_, L>,
) -> DbModelResult<ApplyReport> {
    let mut report = ApplyReport::default();

    for (side, location) in [
        (Side::Declaration, companions.declaration),
        (Side::Implementation, companions.implementation),
    ] {
        let Some(location) = location else { continue };
        let class = location.find_class(class_name, side.container_kind());
        let inserted = apply_constants(side, constants.actions(side), class, &mut *location)?;
        match side {
            Side::Declaration => report.declaration = inserted,
            Side::Implementation => report.implementation = inserted,
        }
        apply_methods(side, methods, &mut *location, &mut report)?;
    }

    debug!(
        "Applied plan for {}: {} declaration nodes, {} implementation nodes",
        class_name,
        report.declaration.len(),
        report.implementation.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::types::{GeneratedConstant, GeneratedMethod};

    fn insert(after: Option<InsertAnchor>, name: &str) -> MergeAction {
        MergeAction {
            constant: GeneratedConstant::new(name, name.to_lowercase()),
            decision: MergeDecision::Insert { after },
        }
    }

    #[test]
    fn test_planned_anchors_chain() {
        let mut doc = SourceDocument::parse("@implementation Foo\n@end\n");
        let actions = vec![
            insert(None, "PEX_A"),
            insert(Some(InsertAnchor::Planned(0)), "PEX_B"),
        ];

        let class = doc.find_class("Foo", ContainerKind::Implementation);
        let inserted = apply_constants(Side::Implementation, &actions, class, &mut doc).unwrap();
        assert_eq!(inserted.len(), 2);
        assert_eq!(
            doc.render(),
            "NSString *PEX_A = @\"pex_a\";\nNSString *PEX_B = @\"pex_b\";\n@implementation Foo\n@end\n"
        );
    }

    #[test]
    fn test_anchor_to_skipped_action_is_unresolved() {
        let mut doc = SourceDocument::new();
        let actions = vec![
            MergeAction {
                constant: GeneratedConstant::new("PEX_A", "a"),
                decision: MergeDecision::SkipIdentical { existing: NodeId(1) },
            },
            insert(Some(InsertAnchor::Planned(0)), "PEX_B"),
        ];

        let err = apply_constants(Side::Declaration, &actions, None, &mut doc).unwrap_err();
        assert!(matches!(
            err,
            DbModelError::UnresolvedAnchor {
                side: Side::Declaration,
                action: 0
            }
        ));
    }

    #[test]
    fn test_marked_definition_follows_existing_method() {
        let mut doc = SourceDocument::parse(
            "@implementation Foo\n- (id)getDbContentValues {\n    return custom;\n}\n- (void)other;\n@end\n",
        );
        let class = doc.find_class("Foo", ContainerKind::Implementation).unwrap();
        let existing = doc.class_members(class).unwrap()[0].id;
        let plan = MethodPlan {
            method: GeneratedMethod {
                selector: "getDbContentValues".into(),
                declaration: "- (id)getDbContentValues;".into(),
                definition: "- (id)getDbContentValues {\n    return nil;\n}\n".into(),
            },
            declaration: None,
            implementation: Some(DefinitionPlacement::InsertAfterExisting { existing }),
            definition: "// TODO: verify\n- (id)getDbContentValues {\n    return nil;\n}\n".into(),
        };

        let mut report = ApplyReport::default();
        apply_methods(Side::Implementation, &[plan], &mut doc, &mut report).unwrap();
        assert_eq!(report.implementation.len(), 1);
        assert_eq!(
            doc.render(),
            "@implementation Foo\n- (id)getDbContentValues {\n    return custom;\n}\n\
             // TODO: verify\n- (id)getDbContentValues {\n    return nil;\n}\n- (void)other;\n@end\n"
        );
    }
}

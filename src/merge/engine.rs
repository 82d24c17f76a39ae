//! Constant merge decisions.
//!
//! Candidates are processed in order while two independent cursors, one per
//! side, track the last resolved item. Every missing constant is inserted
//! right after its side's cursor, so new content stays contiguous and earlier
//! output is never reordered.

use crate::codegen::types::GeneratedConstant;
use crate::config::GeneratorConfig;
use crate::merge::Side;
use crate::merge::scanner::ConstantIndex;
use crate::source::NodeId;
use log::{trace, warn};

/// Position a planned insertion is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAnchor {
    /// A node that already exists in the location.
    Existing(NodeId),
    /// The node produced by an earlier action on the same side (action index).
    Planned(usize),
}

/// What to do with one candidate on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// Not present. `None` places it before the class container.
    Insert { after: Option<InsertAnchor> },
    /// Already present (with the same value on the implementation side).
    SkipIdentical { existing: NodeId },
    /// Present with a different value: a marked duplicate goes right after
    /// the last existing declaration, which is left as is.
    InsertConflict { after: NodeId },
}

impl MergeDecision {
    pub fn inserts(&self) -> bool {
        !matches!(self, Self::SkipIdentical { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeAction {
    /// The constant as it should be written (conflicts carry the marker).
    pub constant: GeneratedConstant,
    pub decision: MergeDecision,
}

impl MergeAction {
    /// Source text for this action on `side`.
    pub fn text(&self, side: Side) -> String {
        match side {
            Side::Declaration => self.constant.declaration_text(),
            Side::Implementation => self.constant.definition_text(),
        }
    }
}

/// Ordered actions for both sides, one action per candidate on each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub declaration: Vec<MergeAction>,
    pub implementation: Vec<MergeAction>,
}

impl MergePlan {
    pub fn actions(&self, side: Side) -> &[MergeAction] {
        match side {
            Side::Declaration => &self.declaration,
            Side::Implementation => &self.implementation,
        }
    }

    /// Number of actions that write something on `side`.
    pub fn insertions(&self, side: Side) -> usize {
        self.actions(side).iter().filter(|a| a.decision.inserts()).count()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &MergeAction> {
        self.implementation
            .iter()
            .filter(|a| matches!(a.decision, MergeDecision::InsertConflict { .. }))
    }

    /// True when applying the plan would not change either side.
    pub fn is_noop(&self) -> bool {
        self.insertions(Side::Declaration) == 0 && self.insertions(Side::Implementation) == 0
    }
}

/// Plan the merge of `candidates` against both indexes.
pub fn merge(
    candidates: &[GeneratedConstant],
    declarations: &ConstantIndex,
    implementations: &ConstantIndex,
    config: &GeneratorConfig,
) -> MergePlan {
    let mut plan = MergePlan::default();
    let mut declaration_cursor: Option<InsertAnchor> = None;
    let mut implementation_cursor: Option<InsertAnchor> = None;

    for candidate in candidates {
        let name = candidate.qualified_name.as_str();

        let decision = match declarations.get(name).last() {
            Some(existing) => {
                declaration_cursor = Some(InsertAnchor::Existing(existing.anchor));
                MergeDecision::SkipIdentical {
                    existing: existing.anchor,
                }
            }
            None => {
                let decision = MergeDecision::Insert {
                    after: declaration_cursor,
                };
                declaration_cursor = Some(InsertAnchor::Planned(plan.declaration.len()));
                decision
            }
        };
        trace!("{} {}: {:?}", Side::Declaration, name, decision);
        plan.declaration.push(MergeAction {
            constant: candidate.clone(),
            decision,
        });

        let existing = implementations.get(name);
        let mut constant = candidate.clone();
        let decision = if let Some(same) = existing.iter().find(|e| e.holds_value(&candidate.literal_value)) {
            implementation_cursor = Some(InsertAnchor::Existing(same.anchor));
            MergeDecision::SkipIdentical {
                existing: same.anchor,
            }
        } else if let Some(last) = existing.last() {
            warn!(
                "Constant {} already defined as {} - adding {} for review",
                name,
                last.initializer.as_deref().unwrap_or("<no initializer>"),
                candidate.quoted_value()
            );
            constant.add_comment(config.verify_marker.as_str());
            implementation_cursor = Some(InsertAnchor::Planned(plan.implementation.len()));
            MergeDecision::InsertConflict { after: last.anchor }
        } else {
            let decision = MergeDecision::Insert {
                after: implementation_cursor,
            };
            implementation_cursor = Some(InsertAnchor::Planned(plan.implementation.len()));
            decision
        };
        trace!("{} {}: {:?}", Side::Implementation, name, decision);
        plan.implementation.push(MergeAction { constant, decision });
    }

    plan
}

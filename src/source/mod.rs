//! Target source locations.
//!
//! Generated constants and methods are merged into two companion locations
//! of a model class: the interface side (declarations) and the implementation
//! side (definitions). The host supplies them through [`SourceLocator`]; each
//! location exposes its direct children and accepts insertions relative to
//! an anchor.
//!
//! [`SourceDocument`] is an in-memory location over plain source text and
//! [`DocumentPair`] a locator over one header/implementation pair.

pub mod document;
pub mod node;

pub use document::*;
pub use node::*;

use crate::errors::DbModelResult;

/// Where a new node goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Directly before an existing top-level node.
    Before(NodeId),
    /// Directly after an existing node (top-level or class member).
    After(NodeId),
    /// After the last top-level node.
    End,
    /// Last member of the given class container.
    ClassEnd(NodeId),
}

/// One interface or implementation location.
pub trait SourceLocation {
    /// Direct children in document order.
    fn children(&self) -> &[SourceNode];

    /// Insert `node` and return the id it was given.
    fn insert(&mut self, position: InsertPosition, node: NewNode) -> DbModelResult<NodeId>;

    /// The primary `kind` container of `class_name`. Class extensions,
    /// categories and other classes are never returned.
    fn find_class(&self, class_name: &str, kind: ContainerKind) -> Option<NodeId> {
        self.children()
            .iter()
            .find(|n| n.is_container(class_name, kind))
            .map(|n| n.id)
    }

    /// Members of the container `class`.
    fn class_members(&self, class: NodeId) -> Option<&[SourceNode]> {
        self.children()
            .iter()
            .find(|n| n.id == class && n.class_name().is_some())
            .map(SourceNode::members)
    }
}

/// Companion locations of a class. Either side may be missing.
///
/// The declaration side holds the class's `@interface`, the implementation
/// side its `@implementation`.
pub struct Companions<'a, L> {
    pub declaration: Option<&'a mut L>,
    pub implementation: Option<&'a mut L>,
}

/// Resolves a class to its companion locations.
pub trait SourceLocator {
    type Location: SourceLocation;

    fn locate(&mut self, class_name: &str) -> Companions<'_, Self::Location>;
}

/// A header/implementation pair of in-memory documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentPair {
    pub header: Option<SourceDocument>,
    pub implementation: Option<SourceDocument>,
}

impl DocumentPair {
    pub fn new(header: Option<SourceDocument>, implementation: Option<SourceDocument>) -> Self {
        Self {
            header,
            implementation,
        }
    }
}

impl SourceLocator for DocumentPair {
    type Location = SourceDocument;

    fn locate(&mut self, class_name: &str) -> Companions<'_, SourceDocument> {
        Companions {
            declaration: self
                .header
                .as_mut()
                .filter(|doc| doc.find_class(class_name, ContainerKind::Interface).is_some()),
            implementation: self
                .implementation
                .as_mut()
                .filter(|doc| doc.find_class(class_name, ContainerKind::Implementation).is_some()),
        }
    }
}

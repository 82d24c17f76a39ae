//! Host node model.
//!
//! A target location is an ordered list of [`SourceNode`]s. Nodes are
//! identified by a stable [`NodeId`] which is the only handle the merge engine
//! ever keeps; it never looks inside or mutates a node through it.

use derive_more::{Display, From, Into};

/// Stable identifier of a node within one source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("#{_0}")]
pub struct NodeId(pub u64);

/// One declarator of a declaration (`NAME = @"value"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub name: String,
    pub initializer: Option<Initializer>,
}

impl Declarator {
    pub fn new(name: impl Into<String>, initializer: Option<Initializer>) -> Self {
        Self {
            name: name.into(),
            initializer,
        }
    }
}

/// Initializer expression of a declarator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initializer {
    /// Raw literal text, without the Objective-C `@` marker (`"value"`).
    Literal(String),
    /// Anything that is not a plain literal, kept verbatim.
    Expression(String),
}

impl Initializer {
    pub fn raw_text(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Expression(text) => text,
        }
    }
}

/// Kind of a class container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// `@interface`
    Interface,
    /// `@implementation`
    Implementation,
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A variable declaration with its resolved type (e.g. `NSString *`).
    Declaration {
        type_name: String,
        declarators: Vec<Declarator>,
    },
    /// A method declaration or definition.
    Method { selector: String },
    /// A class container (`@interface` / `@implementation`) and its members.
    Class {
        name: String,
        container: ContainerKind,
        /// Class extension or category (`@interface Foo ()`, `@implementation Foo (Cat)`).
        category: bool,
        members: Vec<SourceNode>,
        footer: String,
    },
    Other,
}

/// A node of a source location together with the text it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub text: String,
}

impl SourceNode {
    pub fn declaration(&self) -> Option<(&str, &[Declarator])> {
        match &self.kind {
            NodeKind::Declaration {
                type_name,
                declarators,
            } => Some((type_name, declarators)),
            _ => None,
        }
    }

    pub fn selector(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Method { selector } => Some(selector),
            _ => None,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this is the primary `container` of `class_name`; extensions
    /// and categories never match.
    pub fn is_container(&self, class_name: &str, kind: ContainerKind) -> bool {
        matches!(
            &self.kind,
            NodeKind::Class { name, container, category: false, .. }
                if name == class_name && *container == kind
        )
    }

    pub fn members(&self) -> &[SourceNode] {
        match &self.kind {
            NodeKind::Class { members, .. } => members,
            _ => &[],
        }
    }
}

/// A node to be inserted; the location assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub kind: NodeKind,
    pub text: String,
}

impl NewNode {
    /// A string-constant declaration with a single declarator.
    pub fn string_constant(name: &str, initializer: Option<Initializer>, text: String) -> Self {
        Self {
            kind: NodeKind::Declaration {
                type_name: "NSString *".to_string(),
                declarators: vec![Declarator::new(name, initializer)],
            },
            text,
        }
    }

    pub fn method(selector: &str, text: String) -> Self {
        Self {
            kind: NodeKind::Method {
                selector: selector.to_string(),
            },
            text,
        }
    }
}

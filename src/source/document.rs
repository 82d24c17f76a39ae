//! In-memory source document.
//!
//! [`SourceDocument::parse`] splits Objective-C source into top-level nodes
//! line by line. It recognises just enough to drive the merge: variable
//! declarations (type and declarators), method signatures and bodies (by
//! selector) and the `@interface`/`@implementation` ... `@end` container.
//! Everything else becomes an opaque [`NodeKind::Other`] node that renders back
//! unchanged.

use crate::errors::{DbModelError, DbModelResult};
use crate::source::node::*;
use crate::source::{InsertPosition, SourceLocation};
use log::trace;
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Lines;

const DECLARATION_QUALIFIERS: [&str; 5] = ["extern", "static", "const", "FOUNDATION_EXPORT", "__unused"];

/// An ordered list of nodes with stable ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    nodes: Vec<SourceNode>,
    next_id: u64,
}

impl SourceDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from source text.
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::new();
        let mut lines = text.lines().peekable();

        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            let node = if let Some((name, container, category)) = class_header(trimmed) {
                let mut header = line.to_string();
                collect_ivar_block(line, &mut lines, &mut header);
                let (members, footer) = doc.parse_members(&mut lines);
                NewNode {
                    kind: NodeKind::Class {
                        name,
                        container,
                        category,
                        members,
                        footer,
                    },
                    text: header,
                }
            } else if trimmed.starts_with("/*") {
                NewNode {
                    kind: NodeKind::Other,
                    text: collect_block_comment(line, &mut lines),
                }
            } else if let Some((type_name, declarators)) = parse_declaration(trimmed) {
                NewNode {
                    kind: NodeKind::Declaration {
                        type_name,
                        declarators,
                    },
                    text: line.to_string(),
                }
            } else {
                NewNode {
                    kind: NodeKind::Other,
                    text: line.to_string(),
                }
            };
            let node = doc.materialize(node);
            doc.nodes.push(node);
        }

        doc
    }

    fn parse_members(&mut self, lines: &mut Peekable<Lines<'_>>) -> (Vec<SourceNode>, String) {
        let mut members = Vec::new();

        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            if trimmed.starts_with("@end") {
                return (members, line.to_string());
            }

            let node = if trimmed.starts_with('-') || trimmed.starts_with('+') {
                let (signature, text) = collect_method(line, lines);
                NewNode::method(&selector_of(&signature), text)
            } else if trimmed.starts_with("/*") {
                let comment = collect_block_comment(line, lines);
                // A doc comment directly above a method belongs to it.
                match lines.next_if(|l| l.trim_start().starts_with(['-', '+'])) {
                    Some(method_line) => {
                        let (signature, text) = collect_method(method_line, lines);
                        NewNode::method(&selector_of(&signature), format!("{}\n{}", comment, text))
                    }
                    None => NewNode {
                        kind: NodeKind::Other,
                        text: comment,
                    },
                }
            } else {
                NewNode {
                    kind: NodeKind::Other,
                    text: line.to_string(),
                }
            };
            members.push(self.materialize(node));
        }

        // Unterminated container: render an `@end` anyway.
        (members, "@end".to_string())
    }

    fn allocate_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn materialize(&mut self, node: NewNode) -> SourceNode {
        SourceNode {
            id: self.allocate_id(),
            kind: node.kind,
            text: node.text,
        }
    }

    /// Read and parse a source file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DbModelResult<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    /// Write the rendered document to `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> DbModelResult<()> {
        fs::write(path, self.render())?;
        Ok(())
    }

    /// Render the document back to source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            push_line(&mut out, &node.text);
            if let NodeKind::Class {
                members, footer, ..
            } = &node.kind
            {
                for member in members {
                    push_line(&mut out, &member.text);
                }
                push_line(&mut out, footer);
            }
        }
        out
    }

    /// Find a node by id, looking into the class container as well.
    pub fn find(&self, id: NodeId) -> Option<&SourceNode> {
        let (class, index) = self.path_of(id)?;
        match class {
            None => self.nodes.get(index),
            Some(class) => self.nodes.get(class)?.members().get(index),
        }
    }

    fn path_of(&self, id: NodeId) -> Option<(Option<usize>, usize)> {
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id == id {
                return Some((None, i));
            }
            if let Some(j) = node.members().iter().position(|m| m.id == id) {
                return Some((Some(i), j));
            }
        }
        None
    }

    fn container_mut(&mut self, class: Option<usize>) -> Option<&mut Vec<SourceNode>> {
        match class {
            None => Some(&mut self.nodes),
            Some(i) => match &mut self.nodes.get_mut(i)?.kind {
                NodeKind::Class { members, .. } => Some(members),
                _ => None,
            },
        }
    }
}

impl SourceLocation for SourceDocument {
    fn children(&self) -> &[SourceNode] {
        &self.nodes
    }

    fn insert(&mut self, position: InsertPosition, node: NewNode) -> DbModelResult<NodeId> {
        let (class, index) = match position {
            InsertPosition::Before(anchor) => match self.path_of(anchor) {
                Some((None, index)) => (None, index),
                _ => return Err(DbModelError::UnknownNode(anchor)),
            },
            InsertPosition::After(anchor) => {
                let (class, index) = self
                    .path_of(anchor)
                    .ok_or(DbModelError::UnknownNode(anchor))?;
                (class, index + 1)
            }
            InsertPosition::End => (None, self.nodes.len()),
            InsertPosition::ClassEnd(anchor) => match self.path_of(anchor) {
                Some((None, index)) if self.nodes[index].class_name().is_some() => {
                    (Some(index), self.nodes[index].members().len())
                }
                _ => {
                    return Err(DbModelError::InvalidInput(format!(
                        "Node {} is not a class container",
                        anchor
                    )));
                }
            },
        };

        let node = self.materialize(node);
        let id = node.id;
        trace!("Inserting node {} at {:?}/{}", id, class, index);
        self.container_mut(class)
            .ok_or(DbModelError::UnknownNode(id))?
            .insert(index, node);
        Ok(id)
    }
}

fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}

/// Class name, container kind and category flag of a container header line.
fn class_header(line: &str) -> Option<(String, ContainerKind, bool)> {
    let (container, rest) = match line.strip_prefix("@interface") {
        Some(rest) => (ContainerKind::Interface, rest),
        None => (ContainerKind::Implementation, line.strip_prefix("@implementation")?),
    };
    let rest = rest.trim_start();
    let name: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        return None;
    }
    let category = rest[name.len()..].trim_start().starts_with('(');
    Some((name, container, category))
}

/// Pull an instance-variable block (`{ ... }`) into the class header text.
fn collect_ivar_block(header_line: &str, lines: &mut Peekable<Lines<'_>>, header: &mut String) {
    let opens_here = header_line.contains('{');
    let opens_next = lines.peek().is_some_and(|l| l.trim_start().starts_with('{'));
    if !opens_here && !opens_next {
        return;
    }

    let mut depth = brace_delta(header_line);
    if opens_here && depth <= 0 {
        return;
    }
    for line in lines.by_ref() {
        header.push('\n');
        header.push_str(line);
        depth += brace_delta(line);
        if depth <= 0 {
            break;
        }
    }
}

fn collect_block_comment(first: &str, lines: &mut Peekable<Lines<'_>>) -> String {
    let mut text = first.to_string();
    if first.contains("*/") {
        return text;
    }
    for line in lines.by_ref() {
        text.push('\n');
        text.push_str(line);
        if line.contains("*/") {
            break;
        }
    }
    text
}

/// Collect a method declaration or a full definition. Returns the signature
/// (text before `;` or `{`) and the node text.
fn collect_method(first: &str, lines: &mut Peekable<Lines<'_>>) -> (String, String) {
    let code = strip_line_comment(first);
    let mut text = first.to_string();
    let mut signature = code.trim().to_string();

    // Signature continued on following lines until `;` or `{`.
    while !signature.contains('{') && !signature.ends_with(';') {
        let Some(next) = lines.next() else { break };
        text.push('\n');
        text.push_str(next);
        signature.push(' ');
        signature.push_str(strip_line_comment(next).trim());
    }

    if let Some(open) = signature.find('{') {
        let mut depth = brace_delta(&signature[open..]);
        signature.truncate(open);
        while depth > 0 {
            let Some(next) = lines.next() else { break };
            text.push('\n');
            text.push_str(next);
            depth += brace_delta(next);
        }
    } else {
        signature.pop();
    }

    (signature.trim().to_string(), text)
}

/// Selector of a method signature (`-(void) createFromCursor: (PEXDbCursor *) c`
/// -> `createFromCursor:`).
pub fn selector_of(signature: &str) -> String {
    let body = signature.trim().trim_start_matches(['-', '+']);

    let mut stripped = String::with_capacity(body.len());
    let mut depth = 0usize;
    for c in body.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    if !stripped.contains(':') {
        return stripped
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
    }

    stripped
        .split_whitespace()
        .filter_map(|token| token.find(':').map(|i| &token[..=i]))
        .collect()
}

/// Net `{`/`}` balance of a line, ignoring string and character literals.
fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in strip_line_comment(line).chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Drop a trailing `//` comment that is not inside a string literal.
fn strip_line_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            return &line[..i];
        }
    }
    line
}

/// Split on `sep` outside string literals and parentheses.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Parse a one-line variable declaration into its type and declarators.
///
/// `extern NSString * A;`, `NSString *A = @"a", *B = @"b";` and
/// `static NSString * const A = @"a";` are recognised.
pub fn parse_declaration(line: &str) -> Option<(String, Vec<Declarator>)> {
    let code = strip_line_comment(line).trim();
    let mut rest = code.strip_suffix(';')?.trim();

    loop {
        let word_end = rest.find(|c: char| !(c.is_alphanumeric() || c == '_'))?;
        if DECLARATION_QUALIFIERS.contains(&&rest[..word_end]) {
            rest = rest[word_end..].trim_start();
        } else {
            break;
        }
    }

    let base_end = rest.find(|c: char| !(c.is_alphanumeric() || c == '_'))?;
    let base = &rest[..base_end];
    if !is_identifier(base) {
        return None;
    }
    rest = rest[base_end..].trim_start();
    let pointer = rest.starts_with('*');

    let mut declarators = Vec::new();
    for part in split_top_level(rest, ',') {
        let (lhs, rhs) = match *split_top_level(part, '=').as_slice() {
            [lhs] => (lhs, None),
            [lhs, rhs] => (lhs, Some(rhs.trim())),
            _ => return None,
        };

        let mut name = lhs.trim();
        loop {
            let next = name.trim_start_matches('*').trim_start();
            let next = next.strip_prefix("const ").map_or(next, str::trim_start);
            if next == name {
                break;
            }
            name = next;
        }
        if !is_identifier(name) {
            return None;
        }

        let initializer = rhs.map(|init| match init.strip_prefix('@') {
            Some(lit) if lit.starts_with('"') && lit.ends_with('"') && lit.len() >= 2 => {
                Initializer::Literal(lit.to_string())
            }
            _ if init.starts_with('"') && init.ends_with('"') && init.len() >= 2 => {
                Initializer::Literal(init.to_string())
            }
            _ => Initializer::Expression(init.to_string()),
        });
        declarators.push(Declarator::new(name, initializer));
    }

    let type_name = if pointer {
        format!("{} *", base)
    } else {
        base.to_string()
    };
    Some((type_name, declarators))
}

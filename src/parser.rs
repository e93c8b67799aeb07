//! Hooks used by a value parser to recognize and build reference nodes.
//!
//! Tokenizing is left to the caller: it hands over a window of tokens and a
//! [`ParseContext`] describing where new nodes go.

mod reference;
mod token;

pub use self::reference::{build_reference, dollar_identifier, is_reference};
pub use self::token::{Token, TokenKind};

use crate::callback::IdentifierResolver;
use crate::error::ParseError;
use crate::node::{Node, NodeId};
use crate::span::{SourcePosition, SourceSpan};
use crate::tree::Tree;

#[derive(Default)]
pub struct ParseOptions {
    /// Applied to every reference identifier before its node is built
    pub identifier_resolver: Option<IdentifierResolver>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier_resolver(mut self, resolver: IdentifierResolver) -> Self {
        self.identifier_resolver = Some(resolver);
        self
    }

    pub fn resolve_identifier(&self, identifier: &str) -> Result<String, ParseError> {
        match &self.identifier_resolver {
            Some(resolve) => {
                resolve(identifier).map_err(|source| ParseError::IdentifierResolver {
                    identifier: identifier.to_string(),
                    source,
                })
            }
            None => Ok(identifier.to_string()),
        }
    }
}

/// Parser state shared with the recognizers.
pub struct ParseContext<'t> {
    tree: &'t mut Tree,
    container: NodeId,
    current: Option<NodeId>,
    options: ParseOptions,
}

impl<'t> ParseContext<'t> {
    /// New nodes are appended to `container`.
    pub fn new(tree: &'t mut Tree, container: NodeId, options: ParseOptions) -> Self {
        Self {
            tree,
            container,
            current: None,
            options,
        }
    }

    pub fn tree(&self) -> &Tree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut *self.tree
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The node most recently started.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Appends `node` to the container, starting at `start`, and makes it the
    /// current node.
    ///
    /// # Panics
    ///
    /// Panics if the container cannot hold children, as [`Tree::append`] does.
    pub fn init(&mut self, mut node: Node, start: SourcePosition) -> NodeId {
        node.source = Some(SourceSpan::starting_at(start));
        let id = self.tree.append(self.container, node);
        self.current = Some(id);
        id
    }

    /// Closes the current node at the end of `token`.
    pub fn end(&mut self, token: &Token) {
        if let Some(current) = self.current {
            let node = self.tree.node_mut(current);
            if let Some(source) = node.source.as_mut() {
                source.end = Some(token.end);
            }
        }
    }
}

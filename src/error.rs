use thiserror::Error;

use crate::node::{NodeId, NodeType};
use crate::span::SourcePosition;

pub type Result<T, E = StringifyError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StringifyError {
    #[error("Unknown AST node type {0}. Maybe you need to use the values stringifier")]
    UnknownNodeType(NodeType),
    #[error("Failed to resolve reference {path}")]
    ReferenceResolver {
        path: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Builder rejected output")]
    Builder(#[source] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unclosed bracket at {0}")]
    UnclosedBracket(SourcePosition),
    #[error("Tokens do not start a reference")]
    NotAReference,
    #[error("Failed to resolve identifier {identifier}")]
    IdentifierResolver {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("The root cannot be attached to another node")]
    AttachRoot,
    #[error("Node {child:?} cannot be attached under its own descendant {parent:?}")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("A {0} node cannot hold children")]
    NotAContainer(NodeType),
    #[error("Node id {0:?} is out of range")]
    DanglingId(NodeId),
    #[error("Node {0:?} is not linked consistently with its parent")]
    Unlinked(NodeId),
}

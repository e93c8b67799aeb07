#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Which part of a node's output a chunk belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Position {
    Start,
    End,
}

/// Receives the serialized document chunk by chunk, in document order.
///
/// Returning an error aborts the serialization.
pub trait Builder {
    fn push(
        &mut self,
        text: &str,
        node: Option<NodeId>,
        position: Option<Position>,
    ) -> anyhow::Result<()>;
}

impl Builder for String {
    fn push(&mut self, text: &str, _: Option<NodeId>, _: Option<Position>) -> anyhow::Result<()> {
        self.push_str(text);
        Ok(())
    }
}

impl<B: Builder + ?Sized> Builder for &mut B {
    fn push(
        &mut self,
        text: &str,
        node: Option<NodeId>,
        position: Option<Position>,
    ) -> anyhow::Result<()> {
        (**self).push(text, node, position)
    }
}

/// An output chunk tagged with the node that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chunk {
    pub text: String,
    pub node: Option<NodeId>,
    pub position: Option<Position>,
}

impl Builder for Vec<Chunk> {
    fn push(
        &mut self,
        text: &str,
        node: Option<NodeId>,
        position: Option<Position>,
    ) -> anyhow::Result<()> {
        Vec::push(
            self,
            Chunk {
                text: text.to_string(),
                node,
                position,
            },
        );
        Ok(())
    }
}

/// Joins collected chunks back into the document text.
pub fn concat(chunks: &[Chunk]) -> String {
    chunks.iter().map(|chunk| chunk.text.as_str()).collect()
}

/// Builder backed by a closure, see [`from_fn`].
pub struct FnBuilder<F>(F);

pub fn from_fn<F>(callback: F) -> FnBuilder<F>
where
    F: FnMut(&str, Option<NodeId>, Option<Position>) -> anyhow::Result<()>,
{
    FnBuilder(callback)
}

impl<F> Builder for FnBuilder<F>
where
    F: FnMut(&str, Option<NodeId>, Option<Position>) -> anyhow::Result<()>,
{
    fn push(
        &mut self,
        text: &str,
        node: Option<NodeId>,
        position: Option<Position>,
    ) -> anyhow::Result<()> {
        (self.0)(text, node, position)
    }
}

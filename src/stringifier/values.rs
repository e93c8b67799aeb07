use crate::callback::ReferenceResolver;
use crate::error::{Result, StringifyError};
use crate::node::{Comment, Func, NodeId, Reference};
use crate::raws::RawKey;
use crate::tree::Tree;

use super::{Aspect, Builder, Dialect, Position, Stringifier};

impl<'t, B: Builder> Stringifier<'t, B> {
    /// A stringifier for declaration values and function arguments.
    pub fn values(tree: &'t Tree, builder: B) -> Self {
        let mut stringifier = Self::new(tree, builder);
        stringifier.dialect = Dialect::Values;
        stringifier
    }

    /// Prints references through `resolver` instead of their source text.
    pub fn with_reference_resolver(mut self, resolver: ReferenceResolver) -> Self {
        self.reference_resolver = Some(resolver);
        self
    }

    /// Prints `print` (or the node's own value when it is empty) followed by
    /// the node's trailing raw.
    pub(super) fn basic(&mut self, id: NodeId, print: Option<String>) -> Result<()> {
        let tree = self.tree;
        let node = &tree[id];

        let print = print
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| node.kind.value().unwrap_or_default().to_string());
        // `before` is emitted by the parent's body
        let after = node.raws.after.as_deref().unwrap_or("");

        self.emit(&print, Some(id), Some(Position::Start))?;
        self.emit(after, Some(id), Some(Position::End))
    }

    pub(super) fn inline_comment(&mut self, id: NodeId, comment: &Comment) -> Result<()> {
        let left = self.raw(id, RawKey::Left, Aspect::CommentLeft);
        let right = self.raw(id, RawKey::Right, Aspect::CommentRight);
        let text = format!("//{}{}{}", left.text(), comment.text, right.text());
        self.emit(&text, Some(id), None)
    }

    /// Arguments only get the whitespace recorded before them; nothing is
    /// guessed inside an argument list.
    pub(super) async fn func(&mut self, id: NodeId, func: &Func) -> Result<()> {
        let tree = self.tree;
        // the trailing raw is never guessed: a missing one prints nothing
        // rather than the newline default
        let after = tree[id].raws.after.as_deref().unwrap_or("");

        self.emit(&format!("{}(", func.name), Some(id), Some(Position::Start))?;

        for &child in tree.children(id) {
            if let Some(before) = tree[child].raws.before.as_deref().filter(|b| !b.is_empty()) {
                self.emit(before, None, None)?;
            }
            self.stringify(child, false).await?;
        }

        self.emit(&format!("){}", after), Some(id), Some(Position::End))
    }

    pub(super) async fn reference(&mut self, id: NodeId, reference: &Reference) -> Result<()> {
        let pending = self
            .reference_resolver
            .as_ref()
            .map(|resolve| resolve(reference.value()));

        let print = match pending {
            Some(pending) => {
                log::trace!("resolving reference {}", reference.value());
                pending
                    .await
                    .map_err(|source| StringifyError::ReferenceResolver {
                        path: reference.value().to_string(),
                        source,
                    })?
            }
            None => reference.source_text(),
        };

        self.basic(id, Some(print))
    }
}

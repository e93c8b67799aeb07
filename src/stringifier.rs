//! Format-preserving serialization of syntax trees.
//!
//! Every formatting decision (indentation, separators, terminators) is taken
//! from the node's own raws when the parser recorded them, and otherwise
//! guessed from the rest of the document by the [`RawResolver`].

mod builder;
mod raw;
mod values;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

pub use self::builder::{concat, from_fn, Builder, Chunk, FnBuilder, Position};
pub use self::raw::{Aspect, RawResolver};

use crate::callback::ReferenceResolver;
use crate::error::{Result, StringifyError};
use crate::node::{AtRule, Comment, Declaration, NodeId, NodeKind, NodeType};
use crate::raws::{Raw, RawKey, ValueKey};
use crate::tree::Tree;

/// Which node variants a [`Stringifier`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Stylesheet nodes only; value-level nodes are rejected.
    #[default]
    Css,
    /// Stylesheet nodes plus the expression nodes found inside values.
    Values,
}

pub struct Stringifier<'t, B> {
    tree: &'t Tree,
    raws: RawResolver<'t>,
    builder: B,
    dialect: Dialect,
    reference_resolver: Option<ReferenceResolver>,
}

impl<'t, B: Builder> Stringifier<'t, B> {
    pub fn new(tree: &'t Tree, builder: B) -> Self {
        Self {
            tree,
            raws: RawResolver::new(tree),
            builder,
            dialect: Dialect::Css,
            reference_resolver: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn raws(&self) -> &RawResolver<'t> {
        &self.raws
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn into_builder(self) -> B {
        self.builder
    }

    /// Serializes `id` and its descendants; `semicolon` asks for a terminator
    /// after declarations and bodiless at-rules.
    pub fn stringify<'s>(
        &'s mut self,
        id: NodeId,
        semicolon: bool,
    ) -> LocalBoxFuture<'s, Result<()>> {
        async move {
            let tree = self.tree;
            let node = &tree[id];
            log::trace!("stringify {} {:?}", node.node_type(), id);

            match (&node.kind, self.dialect) {
                (NodeKind::Root, _) => self.root(id).await,
                (NodeKind::Comment(comment), Dialect::Values) if comment.inline => {
                    self.inline_comment(id, comment)
                }
                (NodeKind::Comment(comment), _) => self.comment(id, comment),
                (NodeKind::Decl(decl), _) => self.decl(id, decl, semicolon),
                (NodeKind::Rule(_), _) => self.rule(id).await,
                (NodeKind::AtRule(at), _) => self.at_rule(id, at, semicolon).await,
                (NodeKind::AtWord(at), Dialect::Values) => self.at_rule(id, at, semicolon).await,
                (
                    NodeKind::Word(_)
                    | NodeKind::Operator(_)
                    | NodeKind::Punctuation(_)
                    | NodeKind::Quoted(_)
                    | NodeKind::UnicodeRange(_),
                    Dialect::Values,
                ) => self.basic(id, None),
                (NodeKind::Numeric(numeric), Dialect::Values) => {
                    self.basic(id, Some(format!("{}{}", numeric.value, numeric.unit)))
                }
                (NodeKind::Interpolation(interpolation), Dialect::Values) => self.basic(
                    id,
                    Some(format!("{}{}", interpolation.prefix, interpolation.params)),
                ),
                (NodeKind::Func(func), Dialect::Values) => self.func(id, func).await,
                (NodeKind::Reference(reference), Dialect::Values) => {
                    self.reference(id, reference).await
                }
                (kind, Dialect::Css) => Err(StringifyError::UnknownNodeType(kind.node_type())),
            }
        }
        .boxed_local()
    }

    async fn root(&mut self, id: NodeId) -> Result<()> {
        let tree = self.tree;
        self.body(id).await?;
        if let Some(after) = tree[id].raws.after.as_deref().filter(|a| !a.is_empty()) {
            self.emit(after, None, None)?;
        }
        Ok(())
    }

    fn comment(&mut self, id: NodeId, comment: &Comment) -> Result<()> {
        let left = self.raw(id, RawKey::Left, Aspect::CommentLeft);
        let right = self.raw(id, RawKey::Right, Aspect::CommentRight);
        let text = format!("/*{}{}{}*/", left.text(), comment.text, right.text());
        self.emit(&text, Some(id), None)
    }

    fn decl(&mut self, id: NodeId, decl: &Declaration, semicolon: bool) -> Result<()> {
        let tree = self.tree;
        let between = self.raw(id, RawKey::Between, Aspect::Colon);
        let mut text = format!(
            "{}{}{}",
            decl.prop,
            between.text(),
            self.raw_value(id, ValueKey::Value)
        );

        if decl.important {
            let important = tree[id].raws.important.as_deref().filter(|i| !i.is_empty());
            text.push_str(important.unwrap_or(" !important"));
        }

        if semicolon {
            text.push(';');
        }
        self.emit(&text, Some(id), None)
    }

    async fn rule(&mut self, id: NodeId) -> Result<()> {
        let tree = self.tree;
        let selector = self.raw_value(id, ValueKey::Selector);
        self.block(id, selector).await?;

        if let Some(own) = tree[id].raws.own_semicolon.as_deref().filter(|s| !s.is_empty()) {
            self.emit(own, Some(id), Some(Position::End))?;
        }
        Ok(())
    }

    async fn at_rule(&mut self, id: NodeId, at: &AtRule, semicolon: bool) -> Result<()> {
        let tree = self.tree;
        let node = &tree[id];

        let mut name = format!("@{}", at.name);
        let params = if at.params.is_empty() {
            ""
        } else {
            self.raw_value(id, ValueKey::Params)
        };

        if let Some(after_name) = node.raws.after_name.as_deref() {
            name.push_str(after_name);
        } else if !params.is_empty() {
            name.push(' ');
        }

        if node.is_container() {
            self.block(id, &format!("{}{}", name, params)).await
        } else {
            let mut text = format!("{}{}", name, params);
            text.push_str(node.raws.between.as_deref().unwrap_or(""));
            if semicolon {
                text.push(';');
            }
            self.emit(&text, Some(id), None)
        }
    }

    async fn body(&mut self, id: NodeId) -> Result<()> {
        let tree = self.tree;
        let children = tree.children(id);

        // trailing comments never decide whether the last real node is terminated
        let mut last = children.len().saturating_sub(1);
        while last > 0 && tree[children[last]].is_type(NodeType::Comment) {
            last -= 1;
        }

        let semicolon = self
            .raws
            .resolve(id, Some(RawKey::Semicolon), Aspect::Semicolon)
            .is_set();

        for (index, &child) in children.iter().enumerate() {
            let before = self.raw(child, RawKey::Before, Aspect::Before);
            if before.is_set() {
                self.emit(before.text(), None, None)?;
            }
            self.stringify(child, index != last || semicolon).await?;
        }
        Ok(())
    }

    async fn block(&mut self, id: NodeId, start: &str) -> Result<()> {
        let tree = self.tree;
        let between = self.raw(id, RawKey::Between, Aspect::BeforeOpen);
        self.emit(
            &format!("{}{}{{", start, between.text()),
            Some(id),
            Some(Position::Start),
        )?;

        let after = if tree.children(id).is_empty() {
            self.raw(id, RawKey::After, Aspect::EmptyBody)
        } else {
            self.body(id).await?;
            self.raw(id, RawKey::After, Aspect::After)
        };

        if after.is_set() {
            self.emit(after.text(), None, None)?;
        }
        self.emit("}", Some(id), Some(Position::End))
    }

    fn raw(&self, id: NodeId, own: RawKey, detect: Aspect) -> Raw {
        self.raws.resolve(id, Some(own), detect)
    }

    /// The recorded spelling of a property while it still matches the live
    /// value, the live value otherwise.
    fn raw_value(&self, id: NodeId, key: ValueKey) -> &'t str {
        let tree: &'t Tree = self.tree;
        let node = &tree[id];
        let live = node.kind.property(key).unwrap_or_default();
        node.raws
            .value_raw(key)
            .and_then(|raw| raw.for_value(live))
            .unwrap_or(live)
    }

    fn emit(&mut self, text: &str, node: Option<NodeId>, position: Option<Position>) -> Result<()> {
        self.builder
            .push(text, node, position)
            .map_err(StringifyError::Builder)
    }
}

/// Serializes a stylesheet node into `builder`.
pub async fn stringify<B: Builder>(tree: &Tree, id: NodeId, builder: B) -> Result<B> {
    let mut stringifier = Stringifier::new(tree, builder);
    stringifier.stringify(id, false).await?;
    Ok(stringifier.into_builder())
}

/// Serializes a value-level node into `builder`, resolving references with
/// `resolver` when one is given.
pub async fn stringify_values<B: Builder>(
    tree: &Tree,
    id: NodeId,
    builder: B,
    resolver: Option<ReferenceResolver>,
) -> Result<B> {
    let mut stringifier = Stringifier::values(tree, builder);
    if let Some(resolver) = resolver {
        stringifier = stringifier.with_reference_resolver(resolver);
    }
    stringifier.stringify(id, false).await?;
    Ok(stringifier.into_builder())
}

/// Blocking variant of [`stringify`] collecting into a `String`.
pub fn to_string(tree: &Tree, id: NodeId) -> Result<String> {
    pollster::block_on(stringify(tree, id, String::new()))
}

/// Blocking variant of [`stringify_values`] collecting into a `String`.
pub fn values_to_string(
    tree: &Tree,
    id: NodeId,
    resolver: Option<ReferenceResolver>,
) -> Result<String> {
    pollster::block_on(stringify_values(tree, id, String::new(), resolver))
}

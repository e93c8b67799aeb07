use std::cell::Cell;
use std::fmt;
use std::ops::ControlFlow;

use crate::node::{Node, NodeId, NodeKind, NodeType};
use crate::raws::{Raw, RawKey};
use crate::tree::Tree;

/// A formatting aspect that can be detected from the rest of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    Before,
    After,
    Colon,
    Indent,
    BeforeDecl,
    BeforeRule,
    BeforeOpen,
    BeforeClose,
    BeforeComment,
    EmptyBody,
    CommentLeft,
    CommentRight,
    Semicolon,
}

impl Aspect {
    /// Value used when the document has no precedent at all.
    pub fn default_raw(self) -> Raw {
        match self {
            Aspect::Colon => Raw::from(": "),
            Aspect::Indent => Raw::from("    "),
            Aspect::BeforeDecl
            | Aspect::BeforeRule
            | Aspect::BeforeComment
            | Aspect::BeforeClose
            | Aspect::After => Raw::from("\n"),
            Aspect::BeforeOpen | Aspect::CommentLeft | Aspect::CommentRight => Raw::from(" "),
            Aspect::Before | Aspect::EmptyBody => Raw::from(""),
            Aspect::Semicolon => Raw::Flag(false),
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aspect::Before => "before",
            Aspect::After => "after",
            Aspect::Colon => "colon",
            Aspect::Indent => "indent",
            Aspect::BeforeDecl => "beforeDecl",
            Aspect::BeforeRule => "beforeRule",
            Aspect::BeforeOpen => "beforeOpen",
            Aspect::BeforeClose => "beforeClose",
            Aspect::BeforeComment => "beforeComment",
            Aspect::EmptyBody => "emptyBody",
            Aspect::CommentLeft => "commentLeft",
            Aspect::CommentRight => "commentRight",
            Aspect::Semicolon => "semicolon",
        };
        f.write_str(name)
    }
}

/// Resolves raws for nodes of one tree, guessing missing ones from the
/// formatting used elsewhere in the document.
///
/// Detected values are cached on the node's root, so each aspect is searched
/// for at most once per root until the tree is mutated.
pub struct RawResolver<'t> {
    tree: &'t Tree,
    walks: Cell<usize>,
}

impl<'t> RawResolver<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self {
            tree,
            walks: Cell::new(0),
        }
    }

    /// Number of tree walks performed by detectors so far.
    pub fn walks(&self) -> usize {
        self.walks.get()
    }

    pub fn resolve(&self, id: NodeId, own: Option<RawKey>, detect: Aspect) -> Raw {
        let tree = self.tree;
        let node = &tree[id];

        if let Some(raw) = own.and_then(|key| node.raws.get(key)) {
            return raw;
        }

        let parent = node.parent();

        // the first node of a document is never preceded by whitespace
        if detect == Aspect::Before {
            let first_in_root = parent
                .is_some_and(|p| tree[p].is_type(NodeType::Root) && tree.first(p) == Some(id));
            if parent.is_none() || first_in_root {
                return Raw::from("");
            }
        }

        if parent.is_none() {
            return detect.default_raw();
        }

        let root = tree.top(id);
        if let Some(cached) = tree.cached_raw(root, detect) {
            log::trace!("raw {} of {:?} served from cache", detect, id);
            return cached;
        }

        if matches!(detect, Aspect::Before | Aspect::After) {
            return self.before_after(id, detect);
        }

        let value = match detect {
            Aspect::Semicolon => self.detect_semicolon(root),
            Aspect::EmptyBody => self.detect_empty_body(root),
            Aspect::Indent => self.detect_indent(root),
            Aspect::BeforeComment => Some(self.detect_before_comment(root, id)),
            Aspect::BeforeDecl => Some(self.detect_before_decl(root, id)),
            Aspect::BeforeRule => self.detect_before_rule(root),
            Aspect::BeforeClose => self.detect_before_close(root),
            Aspect::BeforeOpen => self.detect_before_open(root),
            Aspect::Colon => self.detect_colon(root),
            _ => own.and_then(|key| self.precedent(root, key)),
        };

        let value = value.unwrap_or_else(|| {
            log::debug!("no precedent for raw {}, using default", detect);
            detect.default_raw()
        });

        tree.cache_raw(root, detect, value)
    }

    /// Runs `predicate` over the descendants of `root`, returning the first hit.
    fn scan<T>(
        &self,
        root: NodeId,
        mut predicate: impl FnMut(NodeId, &Node) -> Option<T>,
    ) -> Option<T> {
        self.walks.set(self.walks.get() + 1);
        first_hit(self.tree.walk(root, |id, node| match predicate(id, node) {
            Some(value) => ControlFlow::Break(value),
            None => ControlFlow::Continue(()),
        }))
    }

    fn precedent(&self, root: NodeId, key: RawKey) -> Option<Raw> {
        self.scan(root, |_, node| node.raws.get(key))
    }

    fn detect_semicolon(&self, root: NodeId) -> Option<Raw> {
        let tree = self.tree;
        self.scan(root, |id, node| {
            let last = tree.last(id)?;
            if tree[last].is_type(NodeType::Decl) {
                node.raws.semicolon.map(Raw::Flag)
            } else {
                None
            }
        })
    }

    fn detect_empty_body(&self, root: NodeId) -> Option<Raw> {
        self.scan(root, |_, node| match node.children() {
            Some([]) => node.raws.after.clone().map(Raw::Text),
            _ => None,
        })
    }

    fn detect_indent(&self, root: NodeId) -> Option<Raw> {
        let tree = self.tree;
        if let Some(indent) = tree[root].raws.indent.as_deref().filter(|i| !i.is_empty()) {
            return Some(Raw::from(indent));
        }

        self.scan(root, |_, node| {
            let parent = node.parent()?;
            if parent != root && tree.parent(parent) == Some(root) {
                let before = node.raws.before.as_deref()?;
                Some(Raw::Text(whitespace_only(last_line(before))))
            } else {
                None
            }
        })
    }

    fn detect_before_comment(&self, root: NodeId, id: NodeId) -> Raw {
        self.walks.set(self.walks.get() + 1);
        let found = first_hit(self.tree.walk_comments(root, |_, node| {
            match node.raws.before.as_deref() {
                Some(before) => ControlFlow::Break(drop_last_line(before).to_string()),
                None => ControlFlow::Continue(()),
            }
        }));

        match found {
            Some(before) => Raw::Text(whitespace_only(&before)),
            None => self.resolve(id, None, Aspect::BeforeDecl),
        }
    }

    fn detect_before_decl(&self, root: NodeId, id: NodeId) -> Raw {
        self.walks.set(self.walks.get() + 1);
        let found = first_hit(self.tree.walk_decls(root, |_, node| {
            match node.raws.before.as_deref() {
                Some(before) => ControlFlow::Break(drop_last_line(before).to_string()),
                None => ControlFlow::Continue(()),
            }
        }));

        match found {
            Some(before) => Raw::Text(whitespace_only(&before)),
            None => self.resolve(id, None, Aspect::BeforeRule),
        }
    }

    fn detect_before_rule(&self, root: NodeId) -> Option<Raw> {
        let tree = self.tree;
        self.scan(root, |id, node| {
            let first_of_root = node.parent() == Some(root) && tree.first(root) == Some(id);
            if node.is_container() && !first_of_root {
                node.raws.before.as_deref().map(|b| drop_last_line(b).to_string())
            } else {
                None
            }
        })
        .map(|before| Raw::Text(whitespace_only(&before)))
    }

    fn detect_before_close(&self, root: NodeId) -> Option<Raw> {
        self.scan(root, |_, node| match node.children() {
            Some(children) if !children.is_empty() => {
                node.raws.after.as_deref().map(|a| drop_last_line(a).to_string())
            }
            _ => None,
        })
        .map(|after| Raw::Text(whitespace_only(&after)))
    }

    fn detect_before_open(&self, root: NodeId) -> Option<Raw> {
        self.scan(root, |_, node| {
            if node.is_type(NodeType::Decl) {
                None
            } else {
                node.raws.get(RawKey::Between)
            }
        })
    }

    fn detect_colon(&self, root: NodeId) -> Option<Raw> {
        self.scan(root, |_, node| match (&node.kind, node.raws.between.as_deref()) {
            (NodeKind::Decl(_), Some(between)) => Some(Raw::Text(
                between
                    .chars()
                    .filter(|c| c.is_whitespace() || *c == ':')
                    .collect(),
            )),
            _ => None,
        })
    }

    /// Borrows the document's newline style for `before`/`after` and indents
    /// it to the node's depth.
    fn before_after(&self, id: NodeId, detect: Aspect) -> Raw {
        let tree = self.tree;
        let base = match tree[id].kind {
            NodeKind::Decl(_) => Aspect::BeforeDecl,
            NodeKind::Comment(_) => Aspect::BeforeComment,
            _ if detect == Aspect::Before => Aspect::BeforeRule,
            _ => Aspect::BeforeClose,
        };

        let mut value = self.resolve(id, None, base).into_text();
        if value.contains('\n') {
            let indent = self.resolve(id, None, Aspect::Indent).into_text();
            for _ in 0..tree.depth(id) {
                value.push_str(&indent);
            }
        }

        Raw::Text(value)
    }
}

fn first_hit<T>(flow: ControlFlow<T>) -> Option<T> {
    match flow {
        ControlFlow::Break(value) => Some(value),
        ControlFlow::Continue(()) => None,
    }
}

/// Drops whatever follows the last newline of a multi-line raw.
fn drop_last_line(raw: &str) -> &str {
    match raw.rfind('\n') {
        Some(index) => &raw[..=index],
        None => raw,
    }
}

/// Text after the last newline, or all of it for a single line.
fn last_line(raw: &str) -> &str {
    match raw.rfind('\n') {
        Some(index) => &raw[index + 1..],
        None => raw,
    }
}

fn whitespace_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_whitespace()).collect()
}

//! Arena holding a document and its detached nodes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::{ControlFlow, Index};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::node::{Node, NodeId, NodeKind, NodeType, Reference};
use crate::raws::Raw;
use crate::stringifier::Aspect;

/// Raws detected for one root, keyed by the detected aspect.
pub(crate) type RawCache = HashMap<Aspect, Raw>;

/// A syntax tree.
///
/// Nodes are owned by the arena and linked through parent/children ids; the
/// children list of a parent is the only source of truth for the tree shape.
/// Nodes created with [`Tree::create`] or removed with [`Tree::detach`] stay in
/// the arena as floating nodes.
///
/// Deserialization checks that every id is in range and that parent and
/// children links agree without forming a cycle.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "TreeData")
)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    #[cfg_attr(feature = "serde", serde(skip))]
    raw_caches: RefCell<HashMap<NodeId, RawCache>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding an empty `root`.
    pub fn new() -> Self {
        Self::with_root(Node::root())
    }

    pub fn with_root(root: Node) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
            raw_caches: RefCell::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutable access to a node. Detected raws are dropped since the edit may
    /// change what the document looks like.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.invalidate();
        &mut self.nodes[id.0]
    }

    /// Adds a floating node without a parent.
    pub fn create(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Creates `node` and appends it as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` cannot hold children (see [`Node::accepts_children`]).
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        assert!(
            self[parent].accepts_children(),
            "a {} node cannot hold children",
            self[parent].node_type()
        );
        let id = self.create(node);
        self.link(parent, id);
        id
    }

    /// Moves an existing node to the end of `parent`'s children.
    ///
    /// An at-rule without block gains one. Attaching the root, attaching a
    /// node under itself or its descendants, or attaching under a kind that
    /// cannot hold children fails and leaves the tree unchanged.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if child == self.root || self[child].is_type(NodeType::Root) {
            return Err(TreeError::AttachRoot);
        }
        if !self[parent].accepts_children() {
            return Err(TreeError::NotAContainer(self[parent].node_type()));
        }

        let mut current = Some(parent);
        while let Some(ancestor) = current {
            if ancestor == child {
                return Err(TreeError::Cycle { parent, child });
            }
            current = self[ancestor].parent;
        }

        self.link(parent, child);
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0]
            .children
            .get_or_insert_with(Vec::new)
            .push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Removes a node from its parent, leaving it floating.
    pub fn detach(&mut self, id: NodeId) {
        self.invalidate();
        if let Some(parent) = self.nodes[id.0].parent.take() {
            if let Some(children) = self.nodes[parent.0].children.as_mut() {
                children.retain(|child| *child != id);
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Children of `id`; empty for leaves.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self[id].children().unwrap_or(&[])
    }

    pub fn first(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    /// The top-most ancestor of `id` (itself when floating).
    pub fn top(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self[current].parent {
            current = parent;
        }
        current
    }

    /// Number of ancestors between `id` and the closest `root` ancestor.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self[id].parent;
        while let Some(parent) = current {
            if self[parent].is_type(NodeType::Root) {
                break;
            }
            depth += 1;
            current = self[parent].parent;
        }
        depth
    }

    /// Depth-first pre-order walk over the descendants of `id`, stopping as
    /// soon as the callback breaks.
    pub fn walk<B, F>(&self, id: NodeId, mut callback: F) -> ControlFlow<B>
    where
        F: FnMut(NodeId, &Node) -> ControlFlow<B>,
    {
        self.walk_inner(id, &mut callback)
    }

    fn walk_inner<B, F>(&self, id: NodeId, callback: &mut F) -> ControlFlow<B>
    where
        F: FnMut(NodeId, &Node) -> ControlFlow<B>,
    {
        for &child in self.children(id) {
            callback(child, &self[child])?;
            self.walk_inner(child, callback)?;
        }
        ControlFlow::Continue(())
    }

    pub fn walk_decls<B, F>(&self, id: NodeId, mut callback: F) -> ControlFlow<B>
    where
        F: FnMut(NodeId, &Node) -> ControlFlow<B>,
    {
        self.walk(id, |child, node| match node.kind {
            NodeKind::Decl(_) => callback(child, node),
            _ => ControlFlow::Continue(()),
        })
    }

    pub fn walk_comments<B, F>(&self, id: NodeId, mut callback: F) -> ControlFlow<B>
    where
        F: FnMut(NodeId, &Node) -> ControlFlow<B>,
    {
        self.walk(id, |child, node| match node.kind {
            NodeKind::Comment(_) => callback(child, node),
            _ => ControlFlow::Continue(()),
        })
    }

    /// Walks `reference` nodes, e.g. to collect the paths a resolver will
    /// be asked for.
    pub fn walk_references<B, F>(&self, id: NodeId, mut callback: F) -> ControlFlow<B>
    where
        F: FnMut(NodeId, &Reference) -> ControlFlow<B>,
    {
        self.walk(id, |child, node| match &node.kind {
            NodeKind::Reference(reference) => callback(child, reference),
            _ => ControlFlow::Continue(()),
        })
    }

    /// Total number of nodes in the arena, the root and floating ones
    /// included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no children. Floating nodes are not counted.
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Drops every detected raw.
    pub fn clear_raw_cache(&self) {
        self.raw_caches.borrow_mut().clear();
    }

    pub(crate) fn cached_raw(&self, root: NodeId, aspect: Aspect) -> Option<Raw> {
        self.raw_caches
            .borrow()
            .get(&root)
            .and_then(|cache| cache.get(&aspect))
            .cloned()
    }

    /// Stores a detected raw; an existing entry is kept.
    pub(crate) fn cache_raw(&self, root: NodeId, aspect: Aspect, raw: Raw) -> Raw {
        self.raw_caches
            .borrow_mut()
            .entry(root)
            .or_default()
            .entry(aspect)
            .or_insert(raw)
            .clone()
    }

    fn invalidate(&mut self) {
        self.raw_caches.get_mut().clear();
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TreeData {
    nodes: Vec<Node>,
    root: NodeId,
}

#[cfg(feature = "serde")]
impl TryFrom<TreeData> for Tree {
    type Error = TreeError;

    fn try_from(data: TreeData) -> Result<Self, Self::Error> {
        check_links(&data.nodes, data.root)?;
        Ok(Self {
            nodes: data.nodes,
            root: data.root,
            raw_caches: RefCell::new(HashMap::new()),
        })
    }
}

/// Verifies that ids are in range, that parent and children lists mirror each
/// other, and that no parent chain loops.
#[cfg(feature = "serde")]
fn check_links(nodes: &[Node], root: NodeId) -> Result<(), TreeError> {
    let get = |id: NodeId| nodes.get(id.0).ok_or(TreeError::DanglingId(id));

    if get(root)?.parent.is_some() {
        return Err(TreeError::Unlinked(root));
    }

    for (index, node) in nodes.iter().enumerate() {
        let id = NodeId(index);

        if node.is_container() && !node.accepts_children() {
            return Err(TreeError::NotAContainer(node.node_type()));
        }
        for &child in node.children().unwrap_or(&[]) {
            if get(child)?.parent != Some(id) {
                return Err(TreeError::Unlinked(child));
            }
        }

        let Some(parent) = node.parent else {
            continue;
        };
        if !get(parent)?.children().is_some_and(|c| c.contains(&id)) {
            return Err(TreeError::Unlinked(id));
        }

        let mut current = Some(parent);
        let mut steps = 0;
        while let Some(ancestor) = current {
            if ancestor == id || steps > nodes.len() {
                return Err(TreeError::Cycle { parent, child: id });
            }
            current = get(ancestor)?.parent;
            steps += 1;
        }
    }

    Ok(())
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

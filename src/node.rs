//! Node definitions for stylesheet and value trees

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::raws::{Raws, ValueKey};
use crate::span::SourceSpan;

/// Index of a node inside its [`Tree`](crate::tree::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The closed set of node type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeType {
    Root,
    Comment,
    Decl,
    Rule,
    AtRule,
    Word,
    Numeric,
    Operator,
    Punctuation,
    Quoted,
    UnicodeRange,
    Func,
    Reference,
    Interpolation,
    AtWord,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Comment => "comment",
            NodeType::Decl => "decl",
            NodeType::Rule => "rule",
            NodeType::AtRule => "atrule",
            NodeType::Word => "word",
            NodeType::Numeric => "numeric",
            NodeType::Operator => "operator",
            NodeType::Punctuation => "punctuation",
            NodeType::Quoted => "quoted",
            NodeType::UnicodeRange => "unicodeRange",
            NodeType::Func => "func",
            NodeType::Reference => "reference",
            NodeType::Interpolation => "interpolation",
            NodeType::AtWord => "atword",
        }
    }

    /// Whether this type only appears inside declaration values.
    pub fn is_value_level(&self) -> bool {
        !matches!(
            self,
            NodeType::Root | NodeType::Comment | NodeType::Decl | NodeType::Rule | NodeType::AtRule
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comment {
    pub text: String,
    /// `//` comment instead of `/* */`
    pub inline: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    pub selector: String,
}

/// An at-rule, also used for at-words inside values.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AtRule {
    pub name: String,
    /// empty when the at-rule has no params
    pub params: String,
}

/// Payload of the single-value variants (word, operator, punctuation, quoted, unicode-range).
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Literal {
    pub value: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Numeric {
    pub value: String,
    pub unit: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Func {
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interpolation {
    pub prefix: String,
    pub params: String,
}

/// How a reference was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferenceSyntax {
    /// `{name}`
    Brace,
    /// `$name`
    Dollar,
}

/// A variable reference such as `$color.primary` or `{color.primary}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "ReferenceFields")
)]
pub struct Reference {
    syntax: ReferenceSyntax,
    value: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    path: Vec<String>,
}

/// Serialized form of a [`Reference`]; the path is always recomputed.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct ReferenceFields {
    syntax: ReferenceSyntax,
    value: String,
}

#[cfg(feature = "serde")]
impl From<ReferenceFields> for Reference {
    fn from(fields: ReferenceFields) -> Self {
        Reference::new(fields.syntax, fields.value)
    }
}

impl Reference {
    pub fn new(syntax: ReferenceSyntax, value: impl Into<String>) -> Self {
        let value = value.into();
        let path = value.trim().split('.').map(str::to_string).collect();
        Self {
            syntax,
            value,
            path,
        }
    }

    pub fn syntax(&self) -> ReferenceSyntax {
        self.syntax
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Segments of the trimmed value split on `.`; never empty.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The text written in the source for this reference.
    pub fn source_text(&self) -> String {
        match self.syntax {
            ReferenceSyntax::Brace => format!("{{{}}}", self.value),
            ReferenceSyntax::Dollar => format!("${}", self.value),
        }
    }
}

/// Variant payload of a node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    Root,
    Comment(Comment),
    Decl(Declaration),
    Rule(Rule),
    AtRule(AtRule),
    Word(Literal),
    Numeric(Numeric),
    Operator(Literal),
    Punctuation(Literal),
    Quoted(Literal),
    UnicodeRange(Literal),
    Func(Func),
    Reference(Reference),
    Interpolation(Interpolation),
    AtWord(AtRule),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root => NodeType::Root,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::Decl(_) => NodeType::Decl,
            NodeKind::Rule(_) => NodeType::Rule,
            NodeKind::AtRule(_) => NodeType::AtRule,
            NodeKind::Word(_) => NodeType::Word,
            NodeKind::Numeric(_) => NodeType::Numeric,
            NodeKind::Operator(_) => NodeType::Operator,
            NodeKind::Punctuation(_) => NodeType::Punctuation,
            NodeKind::Quoted(_) => NodeType::Quoted,
            NodeKind::UnicodeRange(_) => NodeType::UnicodeRange,
            NodeKind::Func(_) => NodeType::Func,
            NodeKind::Reference(_) => NodeType::Reference,
            NodeKind::Interpolation(_) => NodeType::Interpolation,
            NodeKind::AtWord(_) => NodeType::AtWord,
        }
    }

    /// The semantic `value` of value-level nodes.
    pub fn value(&self) -> Option<&str> {
        match self {
            NodeKind::Decl(decl) => Some(&decl.value),
            NodeKind::Word(l)
            | NodeKind::Operator(l)
            | NodeKind::Punctuation(l)
            | NodeKind::Quoted(l)
            | NodeKind::UnicodeRange(l) => Some(&l.value),
            NodeKind::Numeric(n) => Some(&n.value),
            NodeKind::Reference(r) => Some(r.value()),
            _ => None,
        }
    }

    /// Live value of a value-bearing property, compared against recorded raws.
    pub fn property(&self, key: ValueKey) -> Option<&str> {
        match (key, self) {
            (ValueKey::Value, NodeKind::Decl(decl)) => Some(&decl.value),
            (ValueKey::Selector, NodeKind::Rule(rule)) => Some(&rule.selector),
            (ValueKey::Params, NodeKind::AtRule(at) | NodeKind::AtWord(at)) => Some(&at.params),
            _ => None,
        }
    }
}

/// A node stored in a [`Tree`](crate::tree::Tree).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    pub raws: Raws,
    pub source: Option<SourceSpan>,
    pub(crate) parent: Option<NodeId>,
    /// `None` for leaves and for at-rules without a block
    pub(crate) children: Option<Vec<NodeId>>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        let children = match kind {
            NodeKind::Root | NodeKind::Rule(_) | NodeKind::Func(_) => Some(Vec::new()),
            _ => None,
        };
        Self {
            kind,
            raws: Raws::default(),
            source: None,
            parent: None,
            children,
        }
    }

    pub fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Comment(Comment {
            text: text.into(),
            inline: false,
        }))
    }

    pub fn inline_comment(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Comment(Comment {
            text: text.into(),
            inline: true,
        }))
    }

    pub fn decl(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(NodeKind::Decl(Declaration {
            prop: prop.into(),
            value: value.into(),
            important: false,
        }))
    }

    pub fn rule(selector: impl Into<String>) -> Self {
        Self::new(NodeKind::Rule(Rule {
            selector: selector.into(),
        }))
    }

    /// An at-rule without a block; see [`Node::with_block`].
    pub fn at_rule(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self::new(NodeKind::AtRule(AtRule {
            name: name.into(),
            params: params.into(),
        }))
    }

    pub fn at_word(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self::new(NodeKind::AtWord(AtRule {
            name: name.into(),
            params: params.into(),
        }))
    }

    pub fn word(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Word(Literal {
            value: value.into(),
        }))
    }

    pub fn operator(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Operator(Literal {
            value: value.into(),
        }))
    }

    pub fn punctuation(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Punctuation(Literal {
            value: value.into(),
        }))
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Quoted(Literal {
            value: value.into(),
        }))
    }

    pub fn unicode_range(value: impl Into<String>) -> Self {
        Self::new(NodeKind::UnicodeRange(Literal {
            value: value.into(),
        }))
    }

    pub fn numeric(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(NodeKind::Numeric(Numeric {
            value: value.into(),
            unit: unit.into(),
        }))
    }

    pub fn func(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Func(Func { name: name.into() }))
    }

    pub fn reference(syntax: ReferenceSyntax, value: impl Into<String>) -> Self {
        Self::new(NodeKind::Reference(Reference::new(syntax, value)))
    }

    pub fn interpolation(prefix: impl Into<String>, params: impl Into<String>) -> Self {
        Self::new(NodeKind::Interpolation(Interpolation {
            prefix: prefix.into(),
            params: params.into(),
        }))
    }

    pub fn with_raws(mut self, raws: Raws) -> Self {
        self.raws = raws;
        self
    }

    /// Gives the node an (empty) block, e.g. `@media print {}`. Kinds that
    /// cannot hold children are left untouched.
    pub fn with_block(mut self) -> Self {
        if self.accepts_children() && self.children.is_none() {
            self.children = Some(Vec::new());
        }
        self
    }

    pub fn important(mut self) -> Self {
        if let NodeKind::Decl(decl) = &mut self.kind {
            decl.important = true;
        }
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children of a container, `None` for leaves.
    pub fn children(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Whether the kind can hold children at all. At-rules qualify even
    /// without a block, since attaching a child gives them one.
    pub fn accepts_children(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Root
                | NodeKind::Rule(_)
                | NodeKind::AtRule(_)
                | NodeKind::AtWord(_)
                | NodeKind::Func(_)
        )
    }

    pub fn is_type(&self, node_type: NodeType) -> bool {
        self.node_type() == node_type
    }
}

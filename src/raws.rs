//! Raw formatting data recorded by the parser for each node.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A recorded raw for a value-bearing property.
///
/// The `raw` text is only used while the node's live value still equals `value`,
/// so mutating the node automatically drops the original spelling.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawValue {
    pub value: String,
    pub raw: String,
}

impl RawValue {
    pub fn new(value: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            raw: raw.into(),
        }
    }

    /// Returns the raw text if it was captured for `live`.
    pub fn for_value(&self, live: &str) -> Option<&str> {
        (self.value == live).then_some(self.raw.as_str())
    }
}

/// Names of the plain raw slots a node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RawKey {
    Before,
    After,
    Between,
    Semicolon,
    Left,
    Right,
    Important,
    AfterName,
    OwnSemicolon,
    Indent,
}

/// Value-bearing properties that may carry a [`RawValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKey {
    Value,
    Selector,
    Params,
}

/// A single raw, either text or the `semicolon` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Raw {
    Text(String),
    Flag(bool),
}

impl Raw {
    pub fn text(&self) -> &str {
        match self {
            Raw::Text(text) => text,
            Raw::Flag(_) => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Raw::Text(text) => text,
            Raw::Flag(_) => String::new(),
        }
    }

    /// Truthiness of the raw: a set flag or non-empty text.
    pub fn is_set(&self) -> bool {
        match self {
            Raw::Text(text) => !text.is_empty(),
            Raw::Flag(flag) => *flag,
        }
    }
}

impl From<&str> for Raw {
    fn from(text: &str) -> Self {
        Raw::Text(text.to_string())
    }
}

impl From<String> for Raw {
    fn from(text: String) -> Self {
        Raw::Text(text)
    }
}

impl From<bool> for Raw {
    fn from(flag: bool) -> Self {
        Raw::Flag(flag)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Raws {
    /// whitespace emitted before the node
    pub before: Option<String>,
    /// whitespace before a closing brace, or trailing text of a value node
    pub after: Option<String>,
    /// text between the property and value, or the selector and `{`
    pub between: Option<String>,
    /// whether the last declaration of a block is terminated
    pub semicolon: Option<bool>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub important: Option<String>,
    pub after_name: Option<String>,
    pub own_semicolon: Option<String>,
    pub indent: Option<String>,

    pub value: Option<RawValue>,
    pub selector: Option<RawValue>,
    pub params: Option<RawValue>,
}

impl Raws {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: RawKey) -> Option<Raw> {
        let text = match key {
            RawKey::Semicolon => return self.semicolon.map(Raw::Flag),
            RawKey::Before => &self.before,
            RawKey::After => &self.after,
            RawKey::Between => &self.between,
            RawKey::Left => &self.left,
            RawKey::Right => &self.right,
            RawKey::Important => &self.important,
            RawKey::AfterName => &self.after_name,
            RawKey::OwnSemicolon => &self.own_semicolon,
            RawKey::Indent => &self.indent,
        };
        text.as_ref().map(|t| Raw::Text(t.clone()))
    }

    pub fn has(&self, key: RawKey) -> bool {
        match key {
            RawKey::Semicolon => self.semicolon.is_some(),
            _ => self.text(key).is_some(),
        }
    }

    /// Borrowing accessor for the text slots; `None` for `semicolon`.
    pub fn text(&self, key: RawKey) -> Option<&str> {
        match key {
            RawKey::Semicolon => None,
            RawKey::Before => self.before.as_deref(),
            RawKey::After => self.after.as_deref(),
            RawKey::Between => self.between.as_deref(),
            RawKey::Left => self.left.as_deref(),
            RawKey::Right => self.right.as_deref(),
            RawKey::Important => self.important.as_deref(),
            RawKey::AfterName => self.after_name.as_deref(),
            RawKey::OwnSemicolon => self.own_semicolon.as_deref(),
            RawKey::Indent => self.indent.as_deref(),
        }
    }

    pub fn value_raw(&self, key: ValueKey) -> Option<&RawValue> {
        match key {
            ValueKey::Value => self.value.as_ref(),
            ValueKey::Selector => self.selector.as_ref(),
            ValueKey::Params => self.params.as_ref(),
        }
    }

    pub fn before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn between(mut self, between: impl Into<String>) -> Self {
        self.between = Some(between.into());
        self
    }

    pub fn semicolon(mut self, semicolon: bool) -> Self {
        self.semicolon = Some(semicolon);
        self
    }

    pub fn left(mut self, left: impl Into<String>) -> Self {
        self.left = Some(left.into());
        self
    }

    pub fn right(mut self, right: impl Into<String>) -> Self {
        self.right = Some(right.into());
        self
    }

    pub fn important(mut self, important: impl Into<String>) -> Self {
        self.important = Some(important.into());
        self
    }

    pub fn after_name(mut self, after_name: impl Into<String>) -> Self {
        self.after_name = Some(after_name.into());
        self
    }

    pub fn own_semicolon(mut self, own_semicolon: impl Into<String>) -> Self {
        self.own_semicolon = Some(own_semicolon.into());
        self
    }

    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    pub fn raw_value(mut self, key: ValueKey, raw: RawValue) -> Self {
        match key {
            ValueKey::Value => self.value = Some(raw),
            ValueKey::Selector => self.selector = Some(raw),
            ValueKey::Params => self.params = Some(raw),
        }
        self
    }
}

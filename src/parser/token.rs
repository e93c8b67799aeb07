use crate::span::SourcePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Space,
    String,
    Comment,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,
    Comma,
    Colon,
    Operator,
}

/// A token produced by the caller's tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: SourcePosition,
    /// position of the last character, inclusive
    pub end: SourcePosition,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        start: SourcePosition,
        end: SourcePosition,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    /// A single-line token starting at `line`:`column`.
    pub fn at(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        let text = text.into();
        let width = text.chars().count().max(1);
        Self {
            kind,
            start: SourcePosition::new(line, column),
            end: SourcePosition::new(line, column + width - 1),
            text,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

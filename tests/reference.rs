use std::collections::VecDeque;

use rawcss::error::ParseError;
use rawcss::node::{Node, NodeKind, ReferenceSyntax};
use rawcss::parser::{
    build_reference, is_reference, ParseContext, ParseOptions, Token, TokenKind,
};
use rawcss::span::SourcePosition;
use rawcss::stringifier::values_to_string;
use rawcss::tree::Tree;

/// Minimal value parser: references through the recognizer, every other
/// word as a plain word, spaces kept as `before` of the next node.
fn parse_value(
    tree: &mut Tree,
    tokens: Vec<Token>,
    options: ParseOptions,
) -> Result<(), ParseError> {
    let container = tree.root();
    let mut tokens: VecDeque<Token> = tokens.into();
    let mut ctx = ParseContext::new(tree, container, options);
    let mut before = String::new();

    while let Some(token) = tokens.front() {
        let id = if is_reference(&tokens) {
            build_reference(&mut tokens, &mut ctx)?
        } else if token.is(TokenKind::Space) {
            if let Some(space) = tokens.pop_front() {
                before.push_str(&space.text);
            }
            continue;
        } else {
            let token = tokens.pop_front().ok_or(ParseError::NotAReference)?;
            let id = ctx.init(Node::word(token.text.clone()), token.start);
            ctx.end(&token);
            id
        };

        ctx.tree_mut().node_mut(id).raws.before = Some(std::mem::take(&mut before));
    }

    Ok(())
}

#[test]
fn test_dollar_reference() {
    let mut tree = Tree::new();
    parse_value(
        &mut tree,
        vec![Token::at(TokenKind::Word, "$a.b.c", 1, 1)],
        ParseOptions::new(),
    )
    .unwrap();

    let id = tree.first(tree.root()).unwrap();
    let NodeKind::Reference(reference) = &tree[id].kind else {
        panic!("expected a reference");
    };
    assert_eq!(reference.syntax(), ReferenceSyntax::Dollar);
    assert_eq!(reference.value(), "a.b.c");
    assert_eq!(reference.path(), ["a", "b", "c"]);

    let source = tree[id].source.unwrap();
    assert_eq!(source.start, SourcePosition::new(1, 1));
    assert_eq!(source.end, Some(SourcePosition::new(1, 6)));
}

#[test]
fn test_unclosed_brace_reference() {
    let mut tree = Tree::new();
    let root = tree.root();
    let mut tokens: VecDeque<Token> = vec![
        Token::at(TokenKind::OpenCurly, "{", 2, 9),
        Token::at(TokenKind::Word, "x", 2, 10),
    ]
    .into();
    assert!(!is_reference(&tokens));

    let mut ctx = ParseContext::new(&mut tree, root, ParseOptions::new());
    let err = build_reference(&mut tokens, &mut ctx).unwrap_err();

    assert!(matches!(err, ParseError::UnclosedBracket(pos) if pos == SourcePosition::new(2, 9)));
    assert_eq!(err.to_string(), "Unclosed bracket at 2:9");
    assert!(tokens.is_empty());
}

#[test]
fn test_identifier_resolver_rewrites_value() {
    let mut tree = Tree::new();
    let options = ParseOptions::new().with_identifier_resolver(Box::new(|id: &str| {
        Ok::<_, anyhow::Error>(format!("theme.{id}"))
    }));
    parse_value(
        &mut tree,
        vec![
            Token::at(TokenKind::OpenCurly, "{", 1, 1),
            Token::at(TokenKind::Word, "primary", 1, 2),
            Token::at(TokenKind::CloseCurly, "}", 1, 9),
        ],
        options,
    )
    .unwrap();

    let id = tree.first(tree.root()).unwrap();
    let NodeKind::Reference(reference) = &tree[id].kind else {
        panic!("expected a reference");
    };
    assert_eq!(reference.syntax(), ReferenceSyntax::Brace);
    assert_eq!(reference.path(), ["theme", "primary"]);
}

#[test]
fn test_parsed_value_prints_back() {
    let mut tree = Tree::new();
    parse_value(
        &mut tree,
        vec![
            Token::at(TokenKind::Word, "solid", 1, 1),
            Token::at(TokenKind::Space, " ", 1, 6),
            Token::at(TokenKind::OpenCurly, "{", 1, 7),
            Token::at(TokenKind::Word, "color.border", 1, 8),
            Token::at(TokenKind::CloseCurly, "}", 1, 20),
            Token::at(TokenKind::Space, "  ", 1, 21),
            Token::at(TokenKind::Word, "$width", 1, 23),
            Token::at(TokenKind::Space, " ", 1, 29),
            Token::at(TokenKind::Word, "$", 1, 30),
        ],
        ParseOptions::new(),
    )
    .unwrap();

    let root = tree.root();
    let kinds: Vec<_> = tree
        .children(root)
        .iter()
        .map(|id| tree[*id].node_type().as_str())
        .collect();
    assert_eq!(kinds, ["word", "reference", "reference", "word"]);

    assert_eq!(
        values_to_string(&tree, root, None).unwrap(),
        "solid {color.border}  $width $"
    );
}

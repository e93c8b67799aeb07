use rawcss::node::{Node, NodeId};
use rawcss::raws::Raws;
use rawcss::stringifier::{concat, stringify, to_string, Chunk, Position};
use rawcss::tree::Tree;

const DOCUMENT: &str = "a {
  color: red;
  margin: 0 !important;
}

@media print {
  b { }
}
/* end */
";

/// Builds `DOCUMENT` with the raws a parser would record for it.
fn parsed_document() -> (Tree, NodeId) {
    let mut tree = Tree::with_root(
        Node::root().with_raws(Raws::new().after("\n").semicolon(false)),
    );
    let root = tree.root();

    let a = tree.append(
        root,
        Node::rule("a").with_raws(Raws::new().before("").between(" ").after("\n").semicolon(true)),
    );
    tree.append(
        a,
        Node::decl("color", "red").with_raws(Raws::new().before("\n  ").between(": ")),
    );
    tree.append(
        a,
        Node::decl("margin", "0")
            .important()
            .with_raws(Raws::new().before("\n  ").between(": ").important(" !important")),
    );

    let media = tree.append(
        root,
        Node::at_rule("media", "print").with_block().with_raws(
            Raws::new()
                .before("\n\n")
                .after_name(" ")
                .between(" ")
                .after("\n"),
        ),
    );
    tree.append(
        media,
        Node::rule("b").with_raws(Raws::new().before("\n  ").between(" ").after(" ")),
    );

    tree.append(
        root,
        Node::comment("end").with_raws(Raws::new().before("\n").left(" ").right(" ")),
    );

    (tree, a)
}

#[test]
fn test_unmodified_document_is_reproduced() {
    let (tree, _) = parsed_document();
    assert_eq!(to_string(&tree, tree.root()).unwrap(), DOCUMENT);
}

#[test]
fn test_added_nodes_follow_document_style() {
    let (mut tree, a) = parsed_document();
    let root = tree.root();

    tree.append(a, Node::decl("padding", "1px"));
    let p = tree.append(root, Node::rule("p"));
    tree.append(p, Node::decl("top", "0"));

    assert_eq!(
        to_string(&tree, root).unwrap(),
        "a {
  color: red;
  margin: 0 !important;
  padding: 1px;
}

@media print {
  b { }
}
/* end */

p {
  top: 0;
}
"
    );
}

#[test]
fn test_trailing_comment_does_not_take_terminator() {
    let mut tree = Tree::new();
    let root = tree.root();
    let rule = tree.append(
        root,
        Node::rule("a").with_raws(Raws::new().between("").after("").semicolon(false)),
    );
    tree.append(
        rule,
        Node::decl("color", "red").with_raws(Raws::new().before("").between(":")),
    );
    tree.append(
        rule,
        Node::decl("margin", "0").with_raws(Raws::new().before("").between(":")),
    );
    tree.append(
        rule,
        Node::comment("x").with_raws(Raws::new().before("").left(" ").right(" ")),
    );

    assert_eq!(to_string(&tree, root).unwrap(), "a{color:red;margin:0/* x */}");

    tree.node_mut(rule).raws.semicolon = Some(true);
    assert_eq!(to_string(&tree, root).unwrap(), "a{color:red;margin:0;/* x */}");
}

#[test]
fn test_moved_node_keeps_own_raws() {
    let (mut tree, a) = parsed_document();
    let root = tree.root();
    let color = tree.first(a).unwrap();

    tree.detach(color);
    assert_eq!(to_string(&tree, color).unwrap(), "color: red");

    tree.attach(root, color).unwrap();
    let out = to_string(&tree, root).unwrap();
    assert!(out.ends_with("/* end */\n  color: red\n"), "{out:?}");
}

#[tokio::test]
async fn test_chunks_cover_the_document() {
    let (tree, a) = parsed_document();
    let chunks: Vec<Chunk> = stringify(&tree, tree.root(), vec![]).await.unwrap();

    assert_eq!(concat(&chunks), DOCUMENT);

    let opened = chunks
        .iter()
        .position(|c| c.node == Some(a) && c.position == Some(Position::Start))
        .unwrap();
    let closed = chunks
        .iter()
        .position(|c| c.node == Some(a) && c.position == Some(Position::End))
        .unwrap();
    assert_eq!(chunks[opened].text, "a {");
    assert_eq!(chunks[closed].text, "}");
    assert!(opened < closed);
}

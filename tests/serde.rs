#![cfg(feature = "serde")]

use rawcss::node::{Node, NodeKind, ReferenceSyntax};
use rawcss::raws::Raws;
use rawcss::stringifier::to_string;
use rawcss::tree::Tree;

#[test]
fn test_tree_survives_json() {
    let mut tree = Tree::new();
    let root = tree.root();
    let rule = tree.append(
        root,
        Node::rule("a").with_raws(Raws::new().between("").after("").semicolon(true)),
    );
    tree.append(
        rule,
        Node::decl("color", "red").with_raws(Raws::new().before("").between(":")),
    );
    let expected = to_string(&tree, root).unwrap();
    assert_eq!(expected, "a{color:red;}");

    let json = serde_json::to_string(&tree).unwrap();
    let restored: Tree = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.node_count(), tree.node_count());
    assert_eq!(restored.parent(restored.first(rule).unwrap()), Some(rule));
    assert_eq!(to_string(&restored, restored.root()).unwrap(), expected);
}

#[test]
fn test_reference_path_is_rebuilt_on_load() {
    let mut tree = Tree::new();
    let root = tree.root();
    let id = tree.append(root, Node::reference(ReferenceSyntax::Dollar, "a.b"));

    let json = serde_json::to_string(&tree).unwrap();
    assert!(!json.contains("\"path\""), "{json}");

    let restored: Tree = serde_json::from_str(&json).unwrap();
    let NodeKind::Reference(reference) = &restored[id].kind else {
        panic!("expected a reference");
    };
    assert_eq!(reference.value(), "a.b");
    assert_eq!(reference.path(), ["a", "b"]);
}

fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> serde_json::Result<Tree> {
    let mut tree = Tree::new();
    let root = tree.root();
    let rule = tree.append(root, Node::rule("a"));
    tree.append(rule, Node::decl("color", "red"));

    let mut json = serde_json::to_value(&tree).unwrap();
    edit(&mut json);
    serde_json::from_value(json)
}

#[test]
fn test_dangling_ids_are_rejected() {
    let err = tampered(|json| json["nodes"][1]["children"][0] = 42.into()).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");

    let err = tampered(|json| json["root"] = 7.into()).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[test]
fn test_parent_cycles_are_rejected() {
    // the rule claims the declaration as its parent as well as its child
    let err = tampered(|json| {
        json["nodes"][1]["parent"] = 2.into();
        json["nodes"][2]["children"] = serde_json::json!([1]);
        json["nodes"][0]["children"] = serde_json::json!([]);
    })
    .unwrap_err();
    assert!(err.to_string().contains("descendant"), "{err}");
}

#[test]
fn test_unlinked_child_is_rejected() {
    let err = tampered(|json| json["nodes"][0]["children"] = serde_json::json!([])).unwrap_err();
    assert!(err.to_string().contains("not linked"), "{err}");
}

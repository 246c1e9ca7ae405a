use indexmap::IndexMap;
use quill::error::Error;
use quill::merge::{merge, merge_all, Node};
use serde_json::json;

fn node(value: serde_json::Value) -> Node {
    Node::from(value)
}

#[test]
fn test_empty_mapping_is_identity() {
    let x = node(json!({"a": 1, "b": [1, 2]}));
    assert_eq!(merge(x.clone(), Node::mapping()).unwrap(), x);
    assert_eq!(merge(Node::mapping(), x.clone()).unwrap(), x);
}

#[test]
fn test_merge_is_idempotent() {
    let x = node(json!({"tool": {"pytest": {"addopts": "-q"}}, "deps": ["numpy", "pandas"]}));
    assert_eq!(merge(x.clone(), x.clone()).unwrap(), x);
}

#[test]
fn test_right_fold() {
    let a = node(json!({"a": 1, "list": ["x"]}));
    let b = node(json!({"b": 2, "list": ["y"]}));
    let c = node(json!({"a": 3, "c": 4, "list": ["x", "z"]}));
    let folded = merge_all([a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(folded, merge(a, merge(b, c).unwrap()).unwrap());
    assert_eq!(folded, node(json!({"a": 1, "list": ["x", "y", "z"], "b": 2, "c": 4})));
}

#[test]
fn test_merge_all_edges() {
    assert_eq!(merge_all(Vec::new()).unwrap(), Node::mapping());
    assert_eq!(merge_all([Node::from("only")]).unwrap(), Node::from("only"));
}

#[test]
fn test_sequence_keeps_left_and_appends_novel() {
    let merged = merge(node(json!([1, 2])), node(json!([2, 3]))).unwrap();
    assert_eq!(merged, node(json!([1, 2, 3])));
}

#[test]
fn test_set_union_is_sorted_sequence() {
    let merged = merge(Node::set(["pandas", "numpy"]), Node::set(["attrs", "numpy"])).unwrap();
    assert_eq!(merged, Node::from(vec!["attrs", "numpy", "pandas"]));
}

#[test]
fn test_scalar_coalesce() {
    assert_eq!(merge(Node::from("a"), Node::from("b")).unwrap(), Node::from("a"));
    assert_eq!(merge(Node::from(""), Node::from("b")).unwrap(), Node::from("b"));
    assert_eq!(merge(Node::Null, Node::Integer(2)).unwrap(), Node::Integer(2));
    assert_eq!(merge(Node::Bool(false), Node::Bool(true)).unwrap(), Node::Bool(true));
}

#[test]
fn test_user_edits_survive() {
    let existing = node(json!({"project": {"name": "mine", "dependencies": ["requests"]}}));
    let inferred = node(json!({"project": {"name": "inferred", "dependencies": ["numpy"]}}));
    let merged = merge(existing, inferred).unwrap();
    assert_eq!(
        merged,
        node(json!({"project": {"name": "mine", "dependencies": ["requests", "numpy"]}}))
    );
}

#[test]
fn test_container_conflict() {
    let result = merge(node(json!([1])), node(json!({"a": 1})));
    assert!(matches!(
        result,
        Err(Error::MergeTypeConflict { left: "sequence", right: "mapping" })
    ));
}

#[test]
fn test_sections_create_then_assign() {
    let merged = merge(
        Node::Sections(IndexMap::new()),
        node(json!({"metadata": {"name": "demo"}})),
    )
    .unwrap();
    assert_eq!(merged.get("metadata"), Some(node(json!({"name": "demo"}))));
    assert!(matches!(merged, Node::Sections(_)));

    let result = merge(Node::Sections(IndexMap::new()), node(json!({"name": "demo"})));
    assert!(matches!(result, Err(Error::MergeTypeConflict { .. })));
}

#[test]
fn test_sequence_dedup_against_left() {
    let merged = merge(node(json!([1, 2, 3])), node(json!([2, 3, 4]))).unwrap();
    assert_eq!(merged, node(json!([1, 2, 3, 4])));
    assert_eq!(merge(Node::from("set"), Node::from("fallback")).unwrap(), Node::from("set"));
}

#[test]
fn test_empty_mapping_is_identity_for_collections() {
    for x in [node(json!([1, 2])), Node::set(["b", "a"])] {
        assert_eq!(merge(x.clone(), Node::mapping()).unwrap(), x);
        assert_eq!(merge(Node::mapping(), x.clone()).unwrap(), x);
    }
}

#[test]
fn test_scalar_against_empty_container_coalesces() {
    assert_eq!(merge(Node::from(""), Node::mapping()).unwrap(), Node::mapping());
    assert_eq!(merge(Node::Null, node(json!([]))).unwrap(), node(json!([])));
    assert_eq!(merge(Node::from("kept"), Node::mapping()).unwrap(), Node::from("kept"));
}

#[test]
fn test_empty_mapping_keeps_sections_shape() {
    let mut metadata = IndexMap::new();
    metadata.insert("name".to_string(), Node::from("quill"));
    let mut sections = IndexMap::new();
    sections.insert("metadata".to_string(), metadata);
    let sections = Node::Sections(sections);

    let merged = merge(Node::mapping(), sections.clone()).unwrap();
    assert_eq!(merged.kind(), "sections");
    assert_eq!(merged, sections);
}

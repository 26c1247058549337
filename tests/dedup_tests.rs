use uast_normalize::{Node, roles_dedup};

fn obj(pairs: Vec<(&str, Node)>) -> Node {
    Node::object(pairs)
}

// ============================================================================
// Roles Dedup
// ============================================================================

#[test]
fn test_dedup_keeps_first_occurrence() {
    let node = obj(vec![(
        "@role",
        Node::array([Node::Int(3), Node::Int(1), Node::Int(3), Node::Int(2), Node::Int(1)]),
    )]);
    let out = roles_dedup(node);
    assert_eq!(
        out.get("@role"),
        Some(&Node::array([Node::Int(3), Node::Int(1), Node::Int(2)]))
    );
}

#[test]
fn test_dedup_reaches_nested_objects() {
    let node = Node::array([obj(vec![(
        "body",
        obj(vec![("@role", Node::array([Node::Int(5), Node::Int(5)]))]),
    )])]);
    let expected = Node::array([obj(vec![(
        "body",
        obj(vec![("@role", Node::array([Node::Int(5)]))]),
    )])]);
    assert_eq!(roles_dedup(node), expected);
}

#[test]
fn test_dedup_leaves_malformed_roles_alone() {
    let node = obj(vec![("@role", obj(vec![("@role", Node::array([Node::Int(1), Node::Int(1)]))]))]);
    assert_eq!(roles_dedup(node.clone()), node);
}

#[test]
fn test_dedup_ignores_other_keys() {
    let node = obj(vec![("items", Node::array([Node::Int(1), Node::Int(1)]))]);
    assert_eq!(roles_dedup(node.clone()), node);
}

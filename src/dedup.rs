use crate::node::{KEY_ROLES, Node};

/// Removes repeated role ids from every `@role` array in the tree.
///
/// The first occurrence of each id is kept and relative order is preserved.
/// A `@role` that is not an array is left untouched.
///
/// ```
/// use uast_normalize::{roles_dedup, Node};
///
/// let node = Node::object([("@role", Node::array([Node::Int(1), Node::Int(2), Node::Int(1)]))]);
/// let out = roles_dedup(node);
/// assert_eq!(out.get("@role"), Some(&Node::array([Node::Int(1), Node::Int(2)])));
/// ```
pub fn roles_dedup(node: Node) -> Node {
    match node {
        Node::Array(items) => Node::Array(items.into_iter().map(roles_dedup).collect()),
        Node::Object(fields) => Node::Object(
            fields
                .into_iter()
                .map(|(key, value)| {
                    let value = if key == KEY_ROLES {
                        dedup_role_list(value)
                    } else {
                        roles_dedup(value)
                    };
                    (key, value)
                })
                .collect(),
        ),
        other => other,
    }
}

fn dedup_role_list(value: Node) -> Node {
    match value {
        Node::Array(items) => {
            let mut kept: Vec<Node> = Vec::with_capacity(items.len());
            for item in items {
                if !kept.contains(&item) {
                    kept.push(item);
                }
            }
            Node::Array(kept)
        }
        other => other,
    }
}

//! JSON <-> Node conversion utilities

use std::fmt;

use crate::{error::Error, node::Node};

/// Convert serde_json::Value to Node
pub fn from_json(v: serde_json::Value) -> Node {
    match v {
        serde_json::Value::Null => Node::Nil,
        serde_json::Value::Bool(b) => Node::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Node::Int(i),
            None => n.as_f64().map(Node::Float).unwrap_or(Node::Nil),
        },
        serde_json::Value::String(s) => Node::String(s),
        serde_json::Value::Array(arr) => Node::Array(arr.into_iter().map(from_json).collect()),
        serde_json::Value::Object(obj) => {
            Node::Object(obj.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

/// Convert Node to serde_json::Value
pub fn to_json(node: Node) -> serde_json::Value {
    match node {
        Node::Nil => serde_json::Value::Null,
        Node::Bool(b) => serde_json::Value::Bool(b),
        Node::Int(i) => serde_json::Value::Number(i.into()),
        Node::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Node::String(s) => serde_json::Value::String(s),
        Node::Array(arr) => serde_json::Value::Array(arr.into_iter().map(to_json).collect()),
        Node::Object(obj) => {
            serde_json::Value::Object(obj.into_iter().map(|(k, v)| (k, to_json(v))).collect())
        }
    }
}

impl Node {
    /// Parses a JSON document into a tree.
    pub fn from_json_str(input: &str) -> Result<Node, Error> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Ok(from_json(value))
    }
}

impl From<serde_json::Value> for Node {
    fn from(v: serde_json::Value) -> Self {
        from_json(v)
    }
}

/// Compact JSON with sorted keys.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_json(self.clone()))
    }
}

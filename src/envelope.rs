use tracing::debug;

use crate::{error::EnvelopeError, node::Node};

/// Key a denormalized tree is wrapped under when the envelope is restored.
pub const DEFAULT_ROOT_KEY: &str = "root";

/// Trims or restores the single-key wrapper object that transports put
/// around a tree.
///
/// With `top_level_is_root_node` set, both directions are the identity.
/// Otherwise [`trim`](Self::trim) requires the tree to be an object whose
/// only key is `root_key` and returns that key's value, and
/// [`restore`](Self::restore) wraps a tree back under `root_key`. Every
/// successful trim is undone exactly by restore.
///
/// # Examples
///
/// ```
/// use uast_normalize::{Node, ResponseMetadata};
///
/// let tree = Node::object([("the_root", Node::object([("k", Node::from("v"))]))]);
///
/// let envelope = ResponseMetadata::new(false).with_root_key("the_root");
/// let trimmed = envelope.trim(tree.clone()).unwrap();
/// assert_eq!(trimmed, Node::object([("k", Node::from("v"))]));
/// assert_eq!(envelope.restore(trimmed), tree);
///
/// let kept = ResponseMetadata::new(true).trim(tree.clone()).unwrap();
/// assert_eq!(kept, tree);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub top_level_is_root_node: bool,
    pub root_key: String,
}

impl ResponseMetadata {
    pub fn new(top_level_is_root_node: bool) -> Self {
        ResponseMetadata {
            top_level_is_root_node,
            root_key: DEFAULT_ROOT_KEY.to_string(),
        }
    }

    pub fn with_root_key(mut self, root_key: impl Into<String>) -> Self {
        self.root_key = root_key.into();
        self
    }

    /// Removes the envelope (normalize direction).
    pub fn trim(&self, tree: Node) -> Result<Node, EnvelopeError> {
        if self.top_level_is_root_node {
            return Ok(tree);
        }

        let fields = match tree {
            Node::Object(fields) => fields,
            other => {
                return Err(EnvelopeError::NotAnObject {
                    found: other.kind(),
                });
            }
        };

        if fields.len() != 1 {
            return Err(EnvelopeError::KeyCount {
                count: fields.len(),
            });
        }

        match fields.into_iter().next() {
            Some((key, root)) if key == self.root_key => {
                debug!(key = %key, "trimmed response envelope");
                Ok(root)
            }
            Some((found, _)) => Err(EnvelopeError::UnexpectedKey {
                expected: self.root_key.clone(),
                found,
            }),
            None => Err(EnvelopeError::KeyCount { count: 0 }),
        }
    }

    /// Puts the envelope back (denormalize direction).
    pub fn restore(&self, tree: Node) -> Node {
        if self.top_level_is_root_node {
            return tree;
        }
        debug!(key = %self.root_key, "restored response envelope");
        Node::object([(self.root_key.clone(), tree)])
    }
}

impl Default for ResponseMetadata {
    /// The identity envelope: the tree's top level already is the root node.
    fn default() -> Self {
        ResponseMetadata::new(true)
    }
}

//! Index-addressed, read-only view of a canonical tree.
//!
//! A [`Tree`] flattens a [`Node`] into arena entries addressed by [`NodeId`].
//! Parent, child and sibling relations are stored as ids, so navigation in any
//! direction is O(1) and no entry owns or borrows another. This is the shape
//! query adapters walk; rewriting always happens on [`Node`] values.
//!
//! Ids are assigned in pre-order: the root is always the first entry and a
//! parent always precedes its children.

use std::fmt;

use crate::{
    node::{KEY_ROLES, KEY_TYPE, Node, Object, split_type_name},
    role::Role,
};

/// Position of an entry in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// What an entry holds. Containers keep their contents as child entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Object,
    Array,
    Leaf(Node),
}

/// How an entry is reached from its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edge {
    Root,
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone)]
struct Entry {
    shape: Shape,
    edge: Edge,
    parent: Option<NodeId>,
    // index in the parent's child list
    position: usize,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    entries: Vec<Entry>,
}

impl From<Node> for Tree {
    fn from(node: Node) -> Self {
        let mut tree = Tree {
            entries: Vec::new(),
        };
        tree.insert(node, Edge::Root, None, 0);
        tree
    }
}

/// Accessors take ids produced by the same tree and panic on foreign ids.
impl Tree {
    fn insert(&mut self, node: Node, edge: Edge, parent: Option<NodeId>, position: usize) -> NodeId {
        let id = NodeId(self.entries.len());

        let (shape, children): (Shape, Vec<(Edge, Node)>) = match node {
            Node::Object(fields) => (
                Shape::Object,
                fields.into_iter().map(|(k, v)| (Edge::Field(k), v)).collect(),
            ),
            Node::Array(items) => (
                Shape::Array,
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (Edge::Index(i), v))
                    .collect(),
            ),
            leaf => (Shape::Leaf(leaf), Vec::new()),
        };

        self.entries.push(Entry {
            shape,
            edge,
            parent,
            position,
            children: Vec::new(),
        });

        let ids: Vec<NodeId> = children
            .into_iter()
            .enumerate()
            .map(|(pos, (edge, child))| self.insert(child, edge, Some(id), pos))
            .collect();
        self.entries[id.0].children = ids;

        id
    }

    fn entry(&self, id: NodeId) -> &Entry {
        &self.entries[id.0]
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            tree: self,
            current: self.root(),
        }
    }

    pub fn shape(&self, id: NodeId) -> &Shape {
        &self.entry(id).shape
    }

    pub fn edge(&self, id: NodeId) -> &Edge {
        &self.entry(id).edge
    }

    /// Scalar value of a leaf entry.
    pub fn value(&self, id: NodeId) -> Option<&Node> {
        match self.shape(id) {
            Shape::Leaf(node) => Some(node),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.entry(id).children
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let entry = self.entry(id);
        let parent = entry.parent?;
        self.children(parent).get(entry.position + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let entry = self.entry(id);
        let parent = entry.parent?;
        let position = entry.position.checked_sub(1)?;
        self.children(parent).get(position).copied()
    }

    /// Child of an object entry reached through `key`.
    pub fn field(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| matches!(self.edge(*child), Edge::Field(k) if k == key))
    }

    pub fn type_name(&self, id: NodeId) -> Option<&str> {
        let type_id = self.field(id, KEY_TYPE)?;
        self.value(type_id).and_then(Node::as_str)
    }

    /// `@type` split into namespace and local name.
    pub fn type_parts(&self, id: NodeId) -> Option<(Option<&str>, &str)> {
        self.type_name(id).map(split_type_name)
    }

    pub fn roles(&self, id: NodeId) -> Vec<Role> {
        match self.field(id, KEY_ROLES) {
            Some(list) => self
                .children(list)
                .iter()
                .filter_map(|item| self.value(*item).and_then(Node::as_role))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Pre-order walk of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Rebuilds the subtree rooted at `id` as an owned node.
    pub fn to_node(&self, id: NodeId) -> Node {
        let entry = self.entry(id);
        match &entry.shape {
            Shape::Leaf(node) => node.clone(),
            Shape::Array => Node::Array(entry.children.iter().map(|c| self.to_node(*c)).collect()),
            Shape::Object => {
                let fields: Object = entry
                    .children
                    .iter()
                    .filter_map(|c| match self.edge(*c) {
                        Edge::Field(key) => Some((key.clone(), self.to_node(*c))),
                        _ => None,
                    })
                    .collect();
                Node::Object(fields)
            }
        }
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Stateful navigator over a [`Tree`]. Every `move_*` returns `false` and
/// stays put when the target does not exist.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    tree: &'a Tree,
    current: NodeId,
}

impl<'a> Cursor<'a> {
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn move_to_root(&mut self) {
        self.current = self.tree.root();
    }

    pub fn move_to_parent(&mut self) -> bool {
        self.move_to(self.tree.parent(self.current))
    }

    pub fn move_to_first_child(&mut self) -> bool {
        self.move_to(self.tree.children(self.current).first().copied())
    }

    pub fn move_to_next(&mut self) -> bool {
        self.move_to(self.tree.next_sibling(self.current))
    }

    pub fn move_to_prev(&mut self) -> bool {
        self.move_to(self.tree.prev_sibling(self.current))
    }

    fn move_to(&mut self, target: Option<NodeId>) -> bool {
        match target {
            Some(id) => {
                self.current = id;
                true
            }
            None => false,
        }
    }
}

use std::collections::BTreeMap;

use crate::role::Role;

/// Reserved key holding a node's declared type (`"namespace:name"` or `"name"`).
pub const KEY_TYPE: &str = "@type";

/// Reserved key holding a node's ordered role identifiers.
pub const KEY_ROLES: &str = "@role";

/// Field map of an object node.
pub type Object = BTreeMap<String, Node>;

/// A node of a native or canonical syntax tree.
///
/// Every tree exchanged with loaders and consumers is built from this type.
/// Objects may carry the reserved keys [`KEY_TYPE`] and [`KEY_ROLES`]; both are
/// optional and treated as empty when absent.
///
/// # Equality
///
/// `PartialEq` is structural: arrays compare element-wise in order, objects
/// compare by key set and per-key value regardless of insertion order, and
/// scalars compare by variant and value (an integer never equals a float).
///
/// # Examples
///
/// ```
/// use uast_normalize::Node;
///
/// let ident = Node::object([
///     ("@type", Node::from("go:Ident")),
///     ("Name", Node::from("main")),
/// ]);
///
/// assert_eq!(ident.type_name(), Some("go:Ident"));
/// assert!(ident.roles().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// Absent value
    #[default]
    Nil,

    /// Boolean scalar
    Bool(bool),

    /// Integer scalar (kept apart from floats)
    Int(i64),

    /// Floating-point scalar
    Float(f64),

    /// UTF-8 string scalar
    String(String),

    /// Ordered sequence of nodes
    Array(Vec<Node>),

    /// String-keyed fields
    Object(Object),
}

impl Node {
    /// Builds an object node from key/value pairs. Later pairs replace earlier
    /// ones with the same key.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds an array node.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Node::Array(items.into_iter().collect())
    }

    /// Builds the `@role` value for a list of roles.
    pub fn role_list<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Node::Array(roles.into_iter().map(Node::from).collect())
    }

    /// Human-readable name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Nil => "nil",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::Float(_) => "float",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Node::Nil)
    }

    /// True for every variant except arrays and objects.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Node::Array(_) | Node::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Interprets the node as a role identifier.
    pub fn as_role(&self) -> Option<Role> {
        self.as_int()
            .and_then(|n| u32::try_from(n).ok())
            .map(Role::new)
    }

    /// Field lookup; `None` for missing keys and for non-object nodes.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// The declared `@type` of an object node.
    pub fn type_name(&self) -> Option<&str> {
        self.get(KEY_TYPE).and_then(Node::as_str)
    }

    /// The `@role` identifiers of an object node, in order and including
    /// duplicates. A missing or malformed `@role` reads as empty.
    pub fn roles(&self) -> Vec<Role> {
        self.get(KEY_ROLES)
            .and_then(Node::as_array)
            .map(|items| items.iter().filter_map(Node::as_role).collect())
            .unwrap_or_default()
    }

    /// True when the node carries a non-empty `@role` array.
    pub fn has_roles(&self) -> bool {
        self.get(KEY_ROLES)
            .and_then(Node::as_array)
            .is_some_and(|items| !items.is_empty())
    }
}

/// Splits a type name into its namespace and local name.
///
/// ```
/// use uast_normalize::node::split_type_name;
///
/// assert_eq!(split_type_name("go:Ident"), (Some("go"), "Ident"));
/// assert_eq!(split_type_name("internal-type"), (None, "internal-type"));
/// ```
pub fn split_type_name(type_name: &str) -> (Option<&str>, &str) {
    match type_name.split_once(':') {
        Some((ns, name)) => (Some(ns), name),
        None => (None, type_name),
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Int(n)
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Node::Float(n)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Array(items)
    }
}

impl From<Object> for Node {
    fn from(obj: Object) -> Self {
        Node::Object(obj)
    }
}

impl From<Role> for Node {
    fn from(role: Role) -> Self {
        Node::Int(i64::from(role.id()))
    }
}

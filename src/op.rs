//! # Pattern algebra
//!
//! An [`Op`] is a pattern over [`Node`] that works both ways: on the *match*
//! side it checks a candidate node and binds variables, on the *build* side it
//! constructs a node from those bindings. A [`Mapping`](crate::Mapping) pairs a
//! match op with a build op.
//!
//! ## Notation
//!
//! The examples below use a compact notation for patterns:
//!
//! ```text
//! x                    Var("x")
//! "typed"              Is("typed")
//! {k: x}               Obj, exact key set
//! {k: x, ..rest}       Obj, partial; other keys bound to `rest`
//! [x, y]               Arr
//! ```
//!
//! ## Direction
//!
//! Plain ops (`Var`, `Is`, `Arr`, `Obj`) behave the same in both directions.
//! The composite ops (`MapObj`, `AnnotateType`, `AnnotateIfNoRoles`) stand on
//! both sides of their mapping and use [`Direction`] to decide which half of
//! the rewrite they perform.

use std::fmt;

use crate::{node::Node, role::Role};

/// Binding name under which composite ops carry the residual object from the
/// match side to the build side. Never a valid user variable name.
pub(crate) const REST: &str = "@rest";

/// Which way a mapping is being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Native to canonical (normalize)
    Forward,
    /// Canonical to native (denormalize)
    Reverse,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reverse => write!(f, "reverse"),
        }
    }
}

/// Ordered `key -> pattern` list of an object pattern.
///
/// Kept as a list rather than a map so that duplicate keys survive until
/// mapping validation rejects them.
pub type Fields = Vec<(String, Op)>;

/// How an object pattern treats keys it does not declare.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjMode {
    /// The node's key set must equal the declared keys.
    Exact,

    /// Declared keys must be present; the remaining fields are bound, as one
    /// object, to the named rest variable.
    Partial(String),
}

/// Object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Obj {
    pub fields: Fields,
    pub mode: ObjMode,
}

/// Paired extract/construct object patterns.
///
/// Forward: `extract` is matched partially against the node and `construct`
/// builds the replacement over the untouched residual fields. Reverse swaps
/// the two lists.
///
/// ```text
/// MapObj({k: x}, {key: x})
///   {"@type": "t", "k": 1}  =>  {"@type": "t", "key": 1}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MapObj {
    pub extract: Fields,
    pub construct: Fields,
}

impl MapObj {
    pub fn new<K1, I1, K2, I2>(extract: I1, construct: I2) -> Self
    where
        K1: Into<String>,
        I1: IntoIterator<Item = (K1, Op)>,
        K2: Into<String>,
        I2: IntoIterator<Item = (K2, Op)>,
    {
        MapObj {
            extract: collect_fields(extract),
            construct: collect_fields(construct),
        }
    }

    /// The list matched against the node in the given direction.
    pub(crate) fn source(&self, dir: Direction) -> &Fields {
        match dir {
            Direction::Forward => &self.extract,
            Direction::Reverse => &self.construct,
        }
    }

    /// The list built into the output in the given direction.
    pub(crate) fn target(&self, dir: Direction) -> &Fields {
        match dir {
            Direction::Forward => &self.construct,
            Direction::Reverse => &self.extract,
        }
    }
}

/// A pattern node.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Named variable
    ///
    /// The first occurrence in a match pattern binds the matched subtree; any
    /// later occurrence must match a structurally equal subtree. On the build
    /// side it yields the bound subtree.
    ///
    /// # Example
    /// ```text
    /// {left: x, right: x}   matches {"left": 1, "right": 1}
    ///                       fails   {"left": 1, "right": 2}
    /// ```
    Var(String),

    /// Constant
    ///
    /// Matches a structurally equal node and builds a copy of it. Used to
    /// scope a rule, e.g. `{"@type": "go:Ident", ..rest}`.
    Is(Node),

    /// Fixed-length array, matched and built element-wise.
    Arr(Vec<Op>),

    /// Object pattern, exact or partial.
    Obj(Obj),

    /// Field rename/reshape over a partially matched object.
    MapObj(MapObj),

    /// Role annotation for nodes of one `@type`
    ///
    /// Matches objects whose `@type` equals `type_name` (and whose fields match
    /// the optional field mapping); builds the same object with `roles`
    /// appended to `@role`. Duplicates are left for the dedup pass.
    ///
    /// # Example
    /// ```text
    /// AnnotateType("typed", MapObj({k: x}, {key: x}), [10])
    ///   {"@type": "typed", "k": "v"}
    ///     => {"@type": "typed", "@role": [10], "key": "v"}
    /// ```
    AnnotateType {
        type_name: String,
        fields: Option<MapObj>,
        roles: Vec<Role>,
    },

    /// Role annotation that only fires while the node has no roles yet, so
    /// re-applying it is a no-op.
    AnnotateIfNoRoles { type_name: String, roles: Vec<Role> },
}

impl Op {
    pub fn var(name: impl Into<String>) -> Self {
        Op::Var(name.into())
    }

    pub fn is(node: impl Into<Node>) -> Self {
        Op::Is(node.into())
    }

    pub fn arr<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Op>,
    {
        Op::Arr(items.into_iter().collect())
    }

    /// Exact object pattern.
    pub fn obj<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Op)>,
    {
        Op::Obj(Obj {
            fields: collect_fields(fields),
            mode: ObjMode::Exact,
        })
    }

    /// Partial object pattern; undeclared fields are bound to `rest`.
    pub fn part<K, I>(rest: impl Into<String>, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Op)>,
    {
        Op::Obj(Obj {
            fields: collect_fields(fields),
            mode: ObjMode::Partial(rest.into()),
        })
    }

    pub fn map_obj(map: MapObj) -> Self {
        Op::MapObj(map)
    }

    /// True for ops that rewrite a node on their own and may only stand at
    /// the top of a pattern.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Op::MapObj(_) | Op::AnnotateType { .. } | Op::AnnotateIfNoRoles { .. }
        )
    }

    /// Short name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Op::Var(_) => "Var",
            Op::Is(_) => "Is",
            Op::Arr(_) => "Arr",
            Op::Obj(_) => "Obj",
            Op::MapObj(_) => "MapObj",
            Op::AnnotateType { .. } => "AnnotateType",
            Op::AnnotateIfNoRoles { .. } => "AnnotateIfNoRoles",
        }
    }
}

fn collect_fields<K, I>(fields: I) -> Fields
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Op)>,
{
    fields.into_iter().map(|(k, op)| (k.into(), op)).collect()
}

//! Matching and construction over [`Op`] patterns.
//!
//! A rewrite runs in two phases. [`match_node`] checks a candidate node
//! against the match side of a pattern and fills a [`Bindings`] environment
//! that only borrows from the node. Once the match succeeds and the build
//! side is known to fit, [`rewrite`] takes the node apart and moves the bound
//! subtrees into the output. A subtree is cloned only when the build side
//! uses its variable more than once.
//!
//! Structural mismatch is never an error: it is reported as `false` /
//! `Err(node)` so the caller can try the next rule.

use std::collections::HashMap;

use crate::{
    node::{KEY_ROLES, KEY_TYPE, Node, Object},
    op::{Direction, MapObj, Obj, ObjMode, Op, REST},
    role::Role,
};

/// A subtree bound by a match, borrowed from the matched node.
#[derive(Debug, Clone)]
enum Bound<'a> {
    Node(&'a Node),

    /// The fields of an object that its pattern did not claim.
    Rest {
        fields: &'a Object,
        claimed: Vec<&'a str>,
    },
}

impl Bound<'_> {
    fn entries(&self) -> Option<Vec<(&String, &Node)>> {
        match self {
            Bound::Node(node) => node.as_object().map(|fields| fields.iter().collect()),
            Bound::Rest { fields, claimed } => Some(unclaimed(fields, claimed).collect()),
        }
    }

    fn is_object(&self) -> bool {
        match self {
            Bound::Node(node) => node.as_object().is_some(),
            Bound::Rest { .. } => true,
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        match self {
            Bound::Node(node) => node.get(key).is_some(),
            Bound::Rest { fields, claimed } => {
                fields.contains_key(key) && !claimed.iter().any(|c| *c == key)
            }
        }
    }

    fn same_as(&self, other: &Bound<'_>) -> bool {
        match (self, other) {
            (Bound::Node(a), Bound::Node(b)) => a == b,
            _ => match (self.entries(), other.entries()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    fn to_node(&self) -> Node {
        match self {
            Bound::Node(node) => (*node).clone(),
            Bound::Rest { fields, claimed } => Node::Object(
                unclaimed(fields, claimed)
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
        }
    }
}

fn unclaimed<'b>(
    fields: &'b Object,
    claimed: &'b [&'b str],
) -> impl Iterator<Item = (&'b String, &'b Node)> + 'b {
    fields
        .iter()
        .filter(move |(key, _)| !claimed.iter().any(|c| *c == key.as_str()))
}

/// Variable environment produced by a successful match. Borrows from the
/// matched node.
#[derive(Debug, Clone, Default)]
pub struct Bindings<'a> {
    vars: HashMap<String, Bound<'a>>,
}

impl<'a> Bindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// An owned copy of the subtree bound to `name`.
    pub fn resolve(&self, name: &str) -> Option<Node> {
        self.vars.get(name).map(Bound::to_node)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Binds `name` to `node`, or checks `node` against an existing binding.
    ///
    /// Returns `false` when the name is already bound to a different subtree.
    pub fn bind(&mut self, name: &str, node: &'a Node) -> bool {
        self.bind_bound(name, Bound::Node(node))
    }

    fn bind_bound(&mut self, name: &str, bound: Bound<'a>) -> bool {
        match self.vars.get(name) {
            Some(existing) => existing.same_as(&bound),
            None => {
                self.vars.insert(name.to_string(), bound);
                true
            }
        }
    }

    fn require(&self, name: &str) -> &Bound<'a> {
        match self.vars.get(name) {
            Some(bound) => bound,
            None => panic!("build pattern references unbound variable `{}`", name),
        }
    }
}

/// Rewrites `node` by matching `from` and building `to`.
///
/// Hands the node back untouched when `from` does not match, or when `to`
/// cannot be assembled without overwriting carried data: a constructed key
/// that already exists in a rest binding, or a rest binding that is not an
/// object.
///
/// # Panics
///
/// Panics if `to` references a variable that `from` does not bind. Validated
/// mappings never do.
pub fn rewrite(from: &Op, to: &Op, node: Node, dir: Direction) -> Result<Node, Node> {
    let fits_build = {
        let mut bindings = Bindings::new();
        match_node(from, &node, dir, &mut bindings) && fits(to, dir, &bindings)
    };
    if !fits_build {
        return Err(node);
    }

    let mut captures = Captures::new(to, dir);
    extract(from, node, dir, &mut captures);
    Ok(build(to, dir, &mut captures))
}

/// Matches `node` against the match side of `op`, extending `bindings`.
///
/// On `false` the environment may hold partial bindings and must be
/// discarded.
pub fn match_node<'a>(op: &Op, node: &'a Node, dir: Direction, bindings: &mut Bindings<'a>) -> bool {
    match op {
        Op::Var(name) => bindings.bind(name, node),

        Op::Is(expected) => expected == node,

        Op::Arr(items) => match node {
            Node::Array(nodes) => {
                items.len() == nodes.len()
                    && items
                        .iter()
                        .zip(nodes)
                        .all(|(item, n)| match_node(item, n, dir, bindings))
            }
            _ => false,
        },

        Op::Obj(obj) => match_obj(obj, node, dir, bindings),

        Op::MapObj(map) => match node {
            Node::Object(fields) => match_fields(map.source(dir), fields, Some(REST), dir, bindings),
            _ => false,
        },

        Op::AnnotateType {
            type_name,
            fields,
            roles,
        } => match_annotation(type_name, fields.as_ref(), roles, false, node, dir, bindings),

        Op::AnnotateIfNoRoles { type_name, roles } => {
            match_annotation(type_name, None, roles, true, node, dir, bindings)
        }
    }
}

fn match_obj<'a>(obj: &Obj, node: &'a Node, dir: Direction, bindings: &mut Bindings<'a>) -> bool {
    let Node::Object(fields) = node else {
        return false;
    };

    match &obj.mode {
        ObjMode::Exact => {
            fields.len() == obj.fields.len() && match_fields(&obj.fields, fields, None, dir, bindings)
        }
        ObjMode::Partial(rest) => {
            match_fields(&obj.fields, fields, Some(rest.as_str()), dir, bindings)
        }
    }
}

/// Matches declared fields and, when `rest` is given, binds the undeclared
/// remainder as one object.
fn match_fields<'a>(
    pattern: &[(String, Op)],
    fields: &'a Object,
    rest: Option<&str>,
    dir: Direction,
    bindings: &mut Bindings<'a>,
) -> bool {
    let mut claimed = Vec::with_capacity(pattern.len());
    for (key, op) in pattern {
        match fields.get_key_value(key.as_str()) {
            Some((key, value)) if match_node(op, value, dir, bindings) => {
                claimed.push(key.as_str())
            }
            _ => return false,
        }
    }

    match rest {
        Some(rest) => bindings.bind_bound(rest, Bound::Rest { fields, claimed }),
        None => true,
    }
}

fn match_annotation<'a>(
    type_name: &str,
    fields: Option<&MapObj>,
    roles: &[Role],
    guarded: bool,
    node: &'a Node,
    dir: Direction,
    bindings: &mut Bindings<'a>,
) -> bool {
    let Node::Object(obj) = node else {
        return false;
    };

    if obj.get(KEY_TYPE).and_then(Node::as_str) != Some(type_name) {
        return false;
    }

    // A malformed @role is left alone rather than overwritten.
    let current: &[Node] = match obj.get(KEY_ROLES) {
        None => &[],
        Some(Node::Array(items)) => items,
        Some(_) => return false,
    };

    let roles_ok = match (dir, guarded) {
        (Direction::Forward, false) => true,
        (Direction::Forward, true) => current.is_empty(),
        (Direction::Reverse, false) => carries_all(current, roles),
        (Direction::Reverse, true) => {
            carries_all(current, roles)
                && current
                    .iter()
                    .all(|n| n.as_role().is_some_and(|r| roles.contains(&r)))
        }
    };
    if !roles_ok {
        return false;
    }

    match_fields(annotation_fields(fields, dir, Side::Match), obj, Some(REST), dir, bindings)
}

/// Whether the build side of `op` can be assembled from `bindings` without
/// overwriting a carried field.
fn fits(op: &Op, dir: Direction, bindings: &Bindings<'_>) -> bool {
    match op {
        Op::Var(_) | Op::Is(_) => true,
        Op::Arr(items) => items.iter().all(|item| fits(item, dir, bindings)),
        Op::Obj(obj) => match &obj.mode {
            ObjMode::Exact => obj.fields.iter().all(|(_, op)| fits(op, dir, bindings)),
            ObjMode::Partial(rest) => fields_fit(&obj.fields, bindings.require(rest), dir, bindings),
        },
        Op::MapObj(map) => fields_fit(map.target(dir), bindings.require(REST), dir, bindings),
        Op::AnnotateType { fields, .. } => fields_fit(
            annotation_fields(fields.as_ref(), dir, Side::Build),
            bindings.require(REST),
            dir,
            bindings,
        ),
        Op::AnnotateIfNoRoles { .. } => bindings.require(REST).is_object(),
    }
}

fn fields_fit(pattern: &[(String, Op)], base: &Bound<'_>, dir: Direction, bindings: &Bindings<'_>) -> bool {
    base.is_object()
        && pattern
            .iter()
            .all(|(key, op)| !base.contains_key(key) && fits(op, dir, bindings))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Match,
    Build,
}

fn annotation_fields(fields: Option<&MapObj>, dir: Direction, side: Side) -> &[(String, Op)] {
    match (fields, side) {
        (Some(map), Side::Match) => map.source(dir),
        (Some(map), Side::Build) => map.target(dir),
        (None, _) => &[],
    }
}

/// Owned subtrees moved out of a matched node for the build side.
struct Captures {
    vars: HashMap<String, Node>,
    // remaining build-side uses per variable
    uses: HashMap<String, usize>,
}

impl Captures {
    fn new(build: &Op, dir: Direction) -> Self {
        let mut uses = HashMap::new();
        count_uses(build, dir, &mut uses);
        Captures {
            vars: HashMap::new(),
            uses,
        }
    }

    /// Keeps the first subtree captured under `name`; later occurrences are
    /// equal to it and are dropped.
    fn capture(&mut self, name: &str, node: Node) {
        if self.uses.contains_key(name) && !self.vars.contains_key(name) {
            self.vars.insert(name.to_string(), node);
        }
    }

    fn take(&mut self, name: &str) -> Node {
        let remaining = match self.uses.get_mut(name) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        let node = if remaining > 0 {
            self.vars.get(name).cloned()
        } else {
            self.vars.remove(name)
        };
        match node {
            Some(node) => node,
            None => panic!("build pattern references unbound variable `{}`", name),
        }
    }

    fn take_object(&mut self, name: &str) -> Object {
        match self.take(name) {
            Node::Object(fields) => fields,
            // rest bindings are checked to be objects before the build starts
            _ => Object::new(),
        }
    }
}

fn count_uses(op: &Op, dir: Direction, uses: &mut HashMap<String, usize>) {
    match op {
        Op::Var(name) => bump(uses, name),
        Op::Is(_) => {}
        Op::Arr(items) => {
            for item in items {
                count_uses(item, dir, uses);
            }
        }
        Op::Obj(obj) => {
            if let ObjMode::Partial(rest) = &obj.mode {
                bump(uses, rest);
            }
            for (_, field) in &obj.fields {
                count_uses(field, dir, uses);
            }
        }
        Op::MapObj(map) => {
            bump(uses, REST);
            for (_, field) in map.target(dir) {
                count_uses(field, dir, uses);
            }
        }
        Op::AnnotateType { fields, .. } => {
            bump(uses, REST);
            for (_, field) in annotation_fields(fields.as_ref(), dir, Side::Build) {
                count_uses(field, dir, uses);
            }
        }
        Op::AnnotateIfNoRoles { .. } => bump(uses, REST),
    }
}

fn bump(uses: &mut HashMap<String, usize>, name: &str) {
    *uses.entry(name.to_string()).or_insert(0) += 1;
}

/// Moves the subtrees bound by the match side of `op` out of `node`. Only
/// called after `op` matched `node`.
fn extract(op: &Op, node: Node, dir: Direction, captures: &mut Captures) {
    match (op, node) {
        (Op::Var(name), node) => captures.capture(name, node),

        (Op::Arr(items), Node::Array(nodes)) => {
            for (item, n) in items.iter().zip(nodes) {
                extract(item, n, dir, captures);
            }
        }

        (Op::Obj(obj), Node::Object(fields)) => {
            let rest = match &obj.mode {
                ObjMode::Exact => None,
                ObjMode::Partial(rest) => Some(rest.as_str()),
            };
            extract_fields(&obj.fields, fields, rest, dir, captures);
        }

        (Op::MapObj(map), Node::Object(fields)) => {
            extract_fields(map.source(dir), fields, Some(REST), dir, captures)
        }

        (Op::AnnotateType { fields: map, .. }, Node::Object(fields)) => extract_fields(
            annotation_fields(map.as_ref(), dir, Side::Match),
            fields,
            Some(REST),
            dir,
            captures,
        ),

        (Op::AnnotateIfNoRoles { .. }, Node::Object(fields)) => {
            extract_fields(&[], fields, Some(REST), dir, captures)
        }

        _ => {}
    }
}

fn extract_fields(
    pattern: &[(String, Op)],
    mut fields: Object,
    rest: Option<&str>,
    dir: Direction,
    captures: &mut Captures,
) {
    for (key, op) in pattern {
        if let Some(value) = fields.remove(key) {
            extract(op, value, dir, captures);
        }
    }
    if let Some(rest) = rest {
        captures.capture(rest, Node::Object(fields));
    }
}

fn build(op: &Op, dir: Direction, captures: &mut Captures) -> Node {
    match op {
        Op::Var(name) => captures.take(name),

        Op::Is(node) => node.clone(),

        Op::Arr(items) => Node::Array(items.iter().map(|item| build(item, dir, captures)).collect()),

        Op::Obj(obj) => {
            let base = match &obj.mode {
                ObjMode::Exact => Object::new(),
                ObjMode::Partial(rest) => captures.take_object(rest),
            };
            Node::Object(build_fields(&obj.fields, base, dir, captures))
        }

        Op::MapObj(map) => {
            let base = captures.take_object(REST);
            Node::Object(build_fields(map.target(dir), base, dir, captures))
        }

        Op::AnnotateType { fields, roles, .. } => {
            build_annotation(fields.as_ref(), roles, dir, captures)
        }

        Op::AnnotateIfNoRoles { roles, .. } => build_annotation(None, roles, dir, captures),
    }
}

fn build_annotation(
    fields: Option<&MapObj>,
    roles: &[Role],
    dir: Direction,
    captures: &mut Captures,
) -> Node {
    let mut obj = captures.take_object(REST);

    let had_roles = obj.contains_key(KEY_ROLES);
    let mut current = match obj.remove(KEY_ROLES) {
        Some(Node::Array(items)) => items,
        _ => Vec::new(),
    };

    match dir {
        Direction::Forward => current.extend(roles.iter().copied().map(Node::from)),
        Direction::Reverse => {
            current.retain(|n| !n.as_role().is_some_and(|r| roles.contains(&r)))
        }
    }

    if !current.is_empty() || (dir == Direction::Forward && had_roles) {
        obj.insert(KEY_ROLES.to_string(), Node::Array(current));
    }

    let pattern = annotation_fields(fields, dir, Side::Build);
    Node::Object(build_fields(pattern, obj, dir, captures))
}

fn build_fields(
    pattern: &[(String, Op)],
    mut base: Object,
    dir: Direction,
    captures: &mut Captures,
) -> Object {
    for (key, op) in pattern {
        let value = build(op, dir, captures);
        base.insert(key.clone(), value);
    }
    base
}

fn carries_all(current: &[Node], roles: &[Role]) -> bool {
    roles
        .iter()
        .all(|role| current.iter().any(|n| n.as_role() == Some(*role)))
}

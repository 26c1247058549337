use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::{
    error::MappingError,
    matcher,
    node::{KEY_ROLES, KEY_TYPE, Node},
    op::{Direction, MapObj, ObjMode, Op, REST},
};

static VARIABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid variable regex"));

static TYPE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^:\s]+:)?[^:\s]+$").expect("valid type name regex"));

/// A bidirectional rewrite rule.
///
/// The forward direction matches `matcher` and builds `builder`; the reverse
/// direction matches `builder` and builds `matcher`. Both directions are
/// validated when the mapping is created, so applying a mapping can only
/// succeed or fall through, never fail.
///
/// # Examples
///
/// ```
/// use uast_normalize::{Direction, Mapping, Node, Op};
///
/// // Rename `pred` to `p`, keeping every other field.
/// let rename = Mapping::new(
///     Op::part("rest", [("pred", Op::var("x"))]),
///     Op::part("rest", [("p", Op::var("x"))]),
/// )
/// .unwrap();
///
/// let node = Node::object([("pred", Node::from("v")), ("k", Node::Int(1))]);
/// let out = rename.apply(&node, Direction::Forward).unwrap();
/// assert_eq!(out, Node::object([("p", Node::from("v")), ("k", Node::Int(1))]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    matcher: Op,
    builder: Op,
}

impl Mapping {
    pub fn new(matcher: Op, builder: Op) -> Result<Self, MappingError> {
        check_op(&matcher, true)?;
        check_op(&builder, true)?;

        let mapping = Mapping { matcher, builder };
        for dir in [Direction::Forward, Direction::Reverse] {
            let (from, to) = mapping.sides(dir);
            if to.is_composite() && !from.is_composite() {
                return Err(MappingError::UnpairedComposite(to.kind()));
            }
            let bound = variables(from, Side::Match, dir);
            let used = variables(to, Side::Build, dir);
            if let Some(name) = used.difference(&bound).next() {
                return Err(MappingError::UnboundVariable {
                    name: name.clone(),
                    direction: dir,
                });
            }
        }
        Ok(mapping)
    }

    /// Match and build patterns used in `dir`.
    pub fn sides(&self, dir: Direction) -> (&Op, &Op) {
        match dir {
            Direction::Forward => (&self.matcher, &self.builder),
            Direction::Reverse => (&self.builder, &self.matcher),
        }
    }

    /// Rewrites `node` if the mapping applies in `dir`. The matched subtrees
    /// are moved into the result; `Err` hands the node back untouched for the
    /// next mapping.
    pub fn rewrite(&self, node: Node, dir: Direction) -> Result<Node, Node> {
        let (from, to) = self.sides(dir);
        matcher::rewrite(from, to, node, dir)
    }

    /// Borrowing form of [`rewrite`](Self::rewrite); `None` means the node
    /// does not match.
    pub fn apply(&self, node: &Node, dir: Direction) -> Option<Node> {
        self.rewrite(node.clone(), dir).ok()
    }
}

/// A mapping that renames or reshapes a bounded set of fields and keeps all
/// other fields as they are.
pub fn map_obj(map: MapObj) -> Result<Mapping, MappingError> {
    let op = Op::MapObj(map);
    Mapping::new(op.clone(), op)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Match,
    Build,
}

/// Structural checks that do not depend on the paired pattern.
fn check_op(op: &Op, top: bool) -> Result<(), MappingError> {
    if op.is_composite() && !top {
        return Err(MappingError::NestedComposite(op.kind()));
    }

    match op {
        Op::Var(name) => check_variable(name),
        Op::Is(_) => Ok(()),
        Op::Arr(items) => items.iter().try_for_each(|item| check_op(item, false)),
        Op::Obj(obj) => {
            if let ObjMode::Partial(rest) = &obj.mode {
                check_variable(rest)?;
            }
            check_fields(&obj.fields)
        }
        Op::MapObj(map) => check_map_obj(map),
        Op::AnnotateType {
            type_name, fields, ..
        } => {
            check_type_name(type_name)?;
            match fields {
                Some(map) => {
                    for (key, _) in map.extract.iter().chain(&map.construct) {
                        if key == KEY_TYPE || key == KEY_ROLES {
                            return Err(MappingError::ReservedKey(key.clone()));
                        }
                    }
                    check_map_obj(map)
                }
                None => Ok(()),
            }
        }
        Op::AnnotateIfNoRoles { type_name, .. } => check_type_name(type_name),
    }
}

fn check_map_obj(map: &MapObj) -> Result<(), MappingError> {
    check_fields(&map.extract)?;
    check_fields(&map.construct)
}

fn check_fields(fields: &[(String, Op)]) -> Result<(), MappingError> {
    let mut seen = BTreeSet::new();
    for (key, op) in fields {
        if !seen.insert(key.as_str()) {
            return Err(MappingError::DuplicateKey { key: key.clone() });
        }
        check_op(op, false)?;
    }
    Ok(())
}

fn check_variable(name: &str) -> Result<(), MappingError> {
    if VARIABLE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(MappingError::InvalidVariable(name.to_string()))
    }
}

fn check_type_name(type_name: &str) -> Result<(), MappingError> {
    if TYPE_NAME.is_match(type_name) {
        Ok(())
    } else {
        Err(MappingError::InvalidTypeName(type_name.to_string()))
    }
}

/// Variables an op binds (match side) or requires (build side) in `dir`.
fn variables(op: &Op, side: Side, dir: Direction) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect_variables(op, side, dir, &mut out);
    out
}

fn collect_variables(op: &Op, side: Side, dir: Direction, out: &mut BTreeSet<String>) {
    match op {
        Op::Var(name) => {
            out.insert(name.clone());
        }
        Op::Is(_) => {}
        Op::Arr(items) => {
            for item in items {
                collect_variables(item, side, dir, out);
            }
        }
        Op::Obj(obj) => {
            if let ObjMode::Partial(rest) = &obj.mode {
                out.insert(rest.clone());
            }
            for (_, field) in &obj.fields {
                collect_variables(field, side, dir, out);
            }
        }
        Op::MapObj(map) => {
            out.insert(REST.to_string());
            collect_map_obj(map, side, dir, out);
        }
        Op::AnnotateType { fields, .. } => {
            out.insert(REST.to_string());
            if let Some(map) = fields {
                collect_map_obj(map, side, dir, out);
            }
        }
        Op::AnnotateIfNoRoles { .. } => {
            out.insert(REST.to_string());
        }
    }
}

fn collect_map_obj(map: &MapObj, side: Side, dir: Direction, out: &mut BTreeSet<String>) {
    let fields = match side {
        Side::Match => map.source(dir),
        Side::Build => map.target(dir),
    };
    for (_, field) in fields {
        collect_variables(field, side, dir, out);
    }
}

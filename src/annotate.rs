//! Mapping factories that attach roles to nodes of a given `@type`.
//!
//! Both factories desugar into an ordinary [`Mapping`] whose match and build
//! sides are the same annotation op; the matcher does the rest.

use crate::{
    error::MappingError,
    mapping::Mapping,
    op::{MapObj, Op},
    role::Role,
};

/// Appends `roles` to every object whose `@type` is `type_name`, optionally
/// rewriting fields with `fields`.
///
/// Roles already present are appended again; the dedup pass that ends every
/// pipeline collapses them.
///
/// # Examples
///
/// ```
/// use uast_normalize::{annotate_type, Direction, MapObj, Node, Op, Role};
///
/// let rule = annotate_type(
///     "typed",
///     Some(MapObj::new([("k", Op::var("x"))], [("key", Op::var("x"))])),
///     [Role::new(10)],
/// )
/// .unwrap();
///
/// let node = Node::object([("@type", Node::from("typed")), ("k", Node::from("v"))]);
/// let out = rule.apply(&node, Direction::Forward).unwrap();
///
/// assert_eq!(out.roles(), vec![Role::new(10)]);
/// assert_eq!(out.get("key"), Some(&Node::from("v")));
/// ```
pub fn annotate_type<I>(
    type_name: impl Into<String>,
    fields: Option<MapObj>,
    roles: I,
) -> Result<Mapping, MappingError>
where
    I: IntoIterator<Item = Role>,
{
    let op = Op::AnnotateType {
        type_name: type_name.into(),
        fields,
        roles: ordered_set(roles),
    };
    Mapping::new(op.clone(), op)
}

/// Like [`annotate_type`], but only for objects that carry no roles yet.
/// Applying it to its own output never matches again.
pub fn annotate_if_no_roles<I>(type_name: impl Into<String>, roles: I) -> Result<Mapping, MappingError>
where
    I: IntoIterator<Item = Role>,
{
    let op = Op::AnnotateIfNoRoles {
        type_name: type_name.into(),
        roles: ordered_set(roles),
    };
    Mapping::new(op.clone(), op)
}

fn ordered_set<I>(roles: I) -> Vec<Role>
where
    I: IntoIterator<Item = Role>,
{
    let mut out: Vec<Role> = Vec::new();
    for role in roles {
        if !out.contains(&role) {
            out.push(role);
        }
    }
    out
}

use uast_normalize::{
    Direction, MapObj, Mapping, MappingError, Node, Op, Role, annotate_if_no_roles,
    annotate_type, map_obj,
};

fn obj(pairs: Vec<(&str, Node)>) -> Node {
    Node::object(pairs)
}

fn s(v: &str) -> Node {
    Node::from(v)
}

fn var(name: &str) -> Op {
    Op::var(name)
}

fn roles(ids: &[u32]) -> Node {
    Node::role_list(ids.iter().copied().map(Role::new))
}

fn rename_pred() -> Mapping {
    Mapping::new(
        Op::part("rest", [("pred", var("x"))]),
        Op::part("rest", [("p", var("x"))]),
    )
    .unwrap()
}

// ============================================================================
// Construction-Time Validation
// ============================================================================

#[test]
fn test_duplicate_key_is_rejected() {
    let err = Mapping::new(
        Op::obj([("k", var("x")), ("k", var("y"))]),
        Op::obj([("k", var("x"))]),
    )
    .unwrap_err();
    assert_eq!(err, MappingError::DuplicateKey { key: "k".into() });
}

#[test]
fn test_duplicate_key_in_map_obj_is_rejected() {
    let err = map_obj(MapObj::new(
        [("k", var("x"))],
        [("key", var("x")), ("key", var("x"))],
    ))
    .unwrap_err();
    assert_eq!(err, MappingError::DuplicateKey { key: "key".into() });
}

#[test]
fn test_unbound_build_variable_is_rejected() {
    let err = Mapping::new(Op::obj([("a", var("x"))]), Op::obj([("b", var("y"))])).unwrap_err();
    assert_eq!(
        err,
        MappingError::UnboundVariable {
            name: "y".into(),
            direction: Direction::Forward,
        }
    );
}

#[test]
fn test_lossy_mapping_is_rejected_in_reverse() {
    // Forward drops `y`, so the reverse build cannot restore it.
    let err = Mapping::new(
        Op::part("rest", [("a", var("x")), ("b", var("y"))]),
        Op::part("rest", [("a", var("x"))]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        MappingError::UnboundVariable {
            name: "y".into(),
            direction: Direction::Reverse,
        }
    );
}

#[test]
fn test_mismatched_rest_names_are_rejected() {
    let err = Mapping::new(
        Op::part("a", [("pred", var("x"))]),
        Op::part("b", [("p", var("x"))]),
    )
    .unwrap_err();
    assert!(matches!(err, MappingError::UnboundVariable { ref name, .. } if name == "b"));
}

#[test]
fn test_invalid_variable_names_are_rejected() {
    for name in ["@rest", "1x", "", "a-b"] {
        let err = Mapping::new(var(name), var(name)).unwrap_err();
        assert_eq!(err, MappingError::InvalidVariable(name.to_string()));
    }
}

#[test]
fn test_invalid_type_names_are_rejected() {
    for name in ["", "a:b:c", "has space", ":name"] {
        let err = annotate_type(name, None, [Role::IDENTIFIER]).unwrap_err();
        assert_eq!(err, MappingError::InvalidTypeName(name.to_string()));
    }
    assert!(annotate_if_no_roles("go:Ident", [Role::IDENTIFIER]).is_ok());
    assert!(annotate_if_no_roles("internal-type", [Role::IDENTIFIER]).is_ok());
}

#[test]
fn test_nested_composite_is_rejected() {
    let nested = Op::obj([(
        "child",
        Op::map_obj(MapObj::new([("k", var("x"))], [("key", var("x"))])),
    )]);
    let err = Mapping::new(nested.clone(), nested).unwrap_err();
    assert_eq!(err, MappingError::NestedComposite("MapObj"));
}

#[test]
fn test_annotation_fields_may_not_touch_reserved_keys() {
    let err = annotate_type(
        "typed",
        Some(MapObj::new([("@role", var("x"))], [("r", var("x"))])),
        [Role::new(10)],
    )
    .unwrap_err();
    assert_eq!(err, MappingError::ReservedKey("@role".into()));
}

#[test]
fn test_composite_build_needs_composite_match() {
    let reshape = Op::map_obj(MapObj::new([("k", var("x"))], [("key", var("x"))]));

    let err = Mapping::new(Op::part("rest", [("k", var("x"))]), reshape.clone()).unwrap_err();
    assert_eq!(err, MappingError::UnpairedComposite("MapObj"));

    let err = Mapping::new(var("x"), reshape).unwrap_err();
    assert_eq!(
        err.to_string(),
        "MapObj build pattern needs a composite match pattern on the other side"
    );
}

#[test]
fn test_error_messages() {
    let err = Mapping::new(var("x"), var("y")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "variable `y` is used by the forward build pattern but never bound by its match pattern"
    );
}

// ============================================================================
// Applying Mappings
// ============================================================================

#[test]
fn test_rename_forward_and_reverse() {
    let mapping = rename_pred();
    let native = obj(vec![("pred", s("val")), ("k", s("v"))]);
    let canonical = obj(vec![("p", s("val")), ("k", s("v"))]);

    assert_eq!(mapping.apply(&native, Direction::Forward), Some(canonical.clone()));
    assert_eq!(mapping.apply(&canonical, Direction::Reverse), Some(native.clone()));
    assert_eq!(mapping.apply(&native, Direction::Reverse), None);
}

#[test]
fn test_apply_non_matching_returns_none() {
    let mapping = rename_pred();
    assert_eq!(mapping.apply(&obj(vec![("pred2", s("v"))]), Direction::Forward), None);
    assert_eq!(mapping.apply(&Node::array([]), Direction::Forward), None);
}

#[test]
fn test_apply_with_key_conflict_returns_none() {
    let mapping = rename_pred();
    let node = obj(vec![("pred", s("new")), ("p", s("old"))]);
    assert_eq!(mapping.apply(&node, Direction::Forward), None);
}

#[test]
fn test_sides_swap_in_reverse() {
    let mapping = rename_pred();
    let (fwd_match, fwd_build) = mapping.sides(Direction::Forward);
    let (rev_match, rev_build) = mapping.sides(Direction::Reverse);
    assert_eq!(fwd_match, rev_build);
    assert_eq!(fwd_build, rev_match);
}

// ============================================================================
// Annotations
// ============================================================================

#[test]
fn test_annotate_type_appends_roles() {
    let mapping = annotate_type("typed", None, [Role::new(10)]).unwrap();
    let node = obj(vec![("@type", s("typed")), ("@role", roles(&[1])), ("k", s("v"))]);

    let out = mapping.apply(&node, Direction::Forward).unwrap();
    assert_eq!(
        out,
        obj(vec![("@type", s("typed")), ("@role", roles(&[1, 10])), ("k", s("v"))])
    );
}

#[test]
fn test_annotate_type_keeps_duplicates_for_dedup() {
    let mapping = annotate_type("typed", None, [Role::new(1)]).unwrap();
    let node = obj(vec![("@type", s("typed")), ("@role", roles(&[1]))]);

    let out = mapping.apply(&node, Direction::Forward).unwrap();
    assert_eq!(out.get("@role"), Some(&roles(&[1, 1])));
}

#[test]
fn test_annotate_type_ignores_other_types() {
    let mapping = annotate_type("typed", None, [Role::new(10)]).unwrap();
    assert_eq!(mapping.apply(&obj(vec![("@type", s("other"))]), Direction::Forward), None);
    assert_eq!(mapping.apply(&obj(vec![("k", s("v"))]), Direction::Forward), None);
    assert_eq!(mapping.apply(&s("typed"), Direction::Forward), None);
}

#[test]
fn test_annotate_type_leaves_malformed_roles_alone() {
    let mapping = annotate_type("typed", None, [Role::new(10)]).unwrap();
    let node = obj(vec![("@type", s("typed")), ("@role", s("broken"))]);
    assert_eq!(mapping.apply(&node, Direction::Forward), None);
}

#[test]
fn test_annotate_type_role_list_is_an_ordered_set() {
    let mapping = annotate_type("typed", None, [Role::new(10), Role::new(2), Role::new(10)]).unwrap();
    let out = mapping
        .apply(&obj(vec![("@type", s("typed"))]), Direction::Forward)
        .unwrap();
    assert_eq!(out.roles(), vec![Role::new(10), Role::new(2)]);
}

#[test]
fn test_annotate_type_with_field_mapping() {
    let mapping = annotate_type(
        "typed",
        Some(MapObj::new([("k", var("x"))], [("key", var("x"))])),
        [Role::new(10)],
    )
    .unwrap();

    let native = obj(vec![("@type", s("typed")), ("k", s("v")), ("other", Node::Int(1))]);
    let canonical = obj(vec![
        ("@type", s("typed")),
        ("@role", roles(&[10])),
        ("key", s("v")),
        ("other", Node::Int(1)),
    ]);

    assert_eq!(mapping.apply(&native, Direction::Forward), Some(canonical.clone()));
    assert_eq!(mapping.apply(&canonical, Direction::Reverse), Some(native));
}

#[test]
fn test_annotate_type_field_mapping_must_match() {
    let mapping = annotate_type(
        "typed",
        Some(MapObj::new([("k", var("x"))], [("key", var("x"))])),
        [Role::new(10)],
    )
    .unwrap();
    let node = obj(vec![("@type", s("typed")), ("pred", s("v"))]);
    assert_eq!(mapping.apply(&node, Direction::Forward), None);
}

#[test]
fn test_annotate_type_reverse_requires_roles() {
    let mapping = annotate_type("typed", None, [Role::new(10)]).unwrap();
    let node = obj(vec![("@type", s("typed")), ("@role", roles(&[1]))]);
    assert_eq!(mapping.apply(&node, Direction::Reverse), None);

    let annotated = obj(vec![("@type", s("typed")), ("@role", roles(&[1, 10]))]);
    assert_eq!(mapping.apply(&annotated, Direction::Reverse), Some(node));
}

#[test]
fn test_annotate_if_no_roles_is_guarded() {
    let mapping = annotate_if_no_roles("typed", [Role::new(10)]).unwrap();

    let with_roles = obj(vec![("@type", s("typed")), ("@role", roles(&[1])), ("pred", s("val1"))]);
    assert_eq!(mapping.apply(&with_roles, Direction::Forward), None);

    let without = obj(vec![("@type", s("typed")), ("pred", s("val2"))]);
    let annotated = mapping.apply(&without, Direction::Forward).unwrap();
    assert_eq!(
        annotated,
        obj(vec![("@type", s("typed")), ("@role", roles(&[10])), ("pred", s("val2"))])
    );

    // Its own output never matches again.
    assert_eq!(mapping.apply(&annotated, Direction::Forward), None);
}

#[test]
fn test_annotate_if_no_roles_accepts_empty_role_list() {
    let mapping = annotate_if_no_roles("typed", [Role::new(10)]).unwrap();
    let node = obj(vec![("@type", s("typed")), ("@role", Node::array([]))]);
    let out = mapping.apply(&node, Direction::Forward).unwrap();
    assert_eq!(out.roles(), vec![Role::new(10)]);
}

#[test]
fn test_annotate_if_no_roles_reverse_requires_exact_roles() {
    let mapping = annotate_if_no_roles("typed", [Role::new(10)]).unwrap();

    let extra = obj(vec![("@type", s("typed")), ("@role", roles(&[10, 1]))]);
    assert_eq!(mapping.apply(&extra, Direction::Reverse), None);

    let exact = obj(vec![("@type", s("typed")), ("@role", roles(&[10]))]);
    assert_eq!(
        mapping.apply(&exact, Direction::Reverse),
        Some(obj(vec![("@type", s("typed"))]))
    );
}

use proptest::prelude::*;
use uast_normalize::{
    Direction, MapObj, Mapping, Node, Op, Pipeline, ResponseMetadata, Role, annotate_if_no_roles,
    annotate_type, node::Object, normalizer, roles_dedup,
};

const KEYS: &[&str] = &["@type", "@role", "pred", "p", "k", "key", "name"];

fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::Nil),
        any::<bool>().prop_map(Node::Bool),
        (-3i64..12).prop_map(Node::Int),
        prop::sample::select(vec!["typed", "internal-type", "guarded", "v"]).prop_map(Node::from),
        prop::collection::vec((0i64..4).prop_map(Node::Int), 0..5).prop_map(Node::Array),
    ]
}

fn tree() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(4, 64, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Node::Array),
            prop::collection::btree_map(prop::sample::select(KEYS), inner, 0..5)
                .prop_map(Node::object),
        ]
    })
}

fn extras() -> impl Strategy<Value = Object> {
    // keys never start with `p`, so they cannot collide with `pred` / `p`
    prop::collection::btree_map("[a-o]{1,6}", tree(), 0..6)
}

fn rename_pred() -> Mapping {
    Mapping::new(
        Op::part("rest", [("pred", Op::var("x"))]),
        Op::part("rest", [("p", Op::var("x"))]),
    )
    .unwrap()
}

fn baseline() -> Pipeline {
    let mut annotations = normalizer::annotations();
    annotations.push(annotate_type(
        "typed",
        Some(MapObj::new([("k", Op::var("x"))], [("key", Op::var("x"))])),
        [Role::new(10)],
    ));
    annotations.push(annotate_if_no_roles("guarded", [Role::new(1)]));

    Pipeline::builder()
        .stage(
            "rename",
            [
                Mapping::new(
                    Op::part("rest", [("@type", Op::is("typed")), ("pred", Op::var("x"))]),
                    Op::part("rest", [("@type", Op::is("typed")), ("p", Op::var("x"))]),
                ),
                Ok(rename_pred()),
            ],
        )
        .stage("annotations", annotations)
        .build()
        .unwrap()
}

fn role_lists_are_unique(node: &Node) -> bool {
    match node {
        Node::Array(items) => items.iter().all(role_lists_are_unique),
        Node::Object(fields) => fields.iter().all(|(key, value)| {
            let unique = match (key.as_str(), value) {
                ("@role", Node::Array(items)) => items
                    .iter()
                    .enumerate()
                    .all(|(i, item)| !items[..i].contains(item)),
                _ => true,
            };
            unique && role_lists_are_unique(value)
        }),
        _ => true,
    }
}

proptest! {
    #[test]
    fn roles_dedup_is_idempotent(t in tree()) {
        let once = roles_dedup(t);
        prop_assert!(role_lists_are_unique(&once));
        prop_assert_eq!(roles_dedup(once.clone()), once);
    }

    #[test]
    fn baseline_pipeline_is_idempotent(t in tree()) {
        let pipeline = baseline();
        let once = pipeline.normalize(t).unwrap();
        let twice = pipeline.normalize(once.clone()).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn envelope_round_trip(t in tree()) {
        let envelope = ResponseMetadata::new(false);
        let wrapped = Node::object([("root", t)]);
        let trimmed = envelope.trim(wrapped.clone()).unwrap();
        prop_assert_eq!(envelope.restore(trimmed), wrapped);
    }

    #[test]
    fn identity_envelope_leaves_tree_alone(t in tree()) {
        let envelope = ResponseMetadata::new(true);
        prop_assert_eq!(envelope.trim(t.clone()).unwrap(), t.clone());
        prop_assert_eq!(envelope.restore(t.clone()), t);
    }

    #[test]
    fn partial_match_keeps_undeclared_fields(extra in extras(), value in tree()) {
        let mut fields = extra.clone();
        fields.insert("pred".to_string(), value.clone());

        let out = rename_pred().apply(&Node::Object(fields), Direction::Forward).unwrap();
        let out = out.as_object().unwrap();

        prop_assert_eq!(out.get("p"), Some(&value));
        prop_assert!(!out.contains_key("pred"));
        prop_assert_eq!(out.len(), extra.len() + 1);
        for (key, original) in &extra {
            prop_assert_eq!(out.get(key), Some(original));
        }
    }

    #[test]
    fn rename_reverses(extra in extras(), value in tree()) {
        let mut fields = extra;
        fields.insert("pred".to_string(), value);
        let native = Node::Object(fields);

        let mapping = rename_pred();
        let canonical = mapping.apply(&native, Direction::Forward).unwrap();
        prop_assert_eq!(mapping.apply(&canonical, Direction::Reverse), Some(native));
    }
}

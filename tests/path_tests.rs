use tenpen::{EvalError, Expr, Path, Step, parse_document};

fn path(text: &str) -> Path {
    Path::parse(text).unwrap()
}

fn doc(text: &str) -> Expr {
    parse_document(text).unwrap()
}

#[test]
fn test_parse_keys_and_indices() {
    assert_eq!(
        path("order.items.0.price").steps(),
        &[
            Step::Key("order".into()),
            Step::Key("items".into()),
            Step::Index(0),
            Step::Key("price".into()),
        ]
    );
}

#[test]
fn test_parse_mixed_segment_is_key() {
    assert_eq!(path("a.0b").steps(), &[Step::from("a"), Step::from("0b")]);
}

#[test]
fn test_parse_rejects_empty_segments() {
    for text in ["", "a..b", ".a", "a."] {
        assert!(
            matches!(Path::parse(text), Err(EvalError::InvalidDocument(_))),
            "{:?} should be rejected",
            text
        );
    }
}

#[test]
fn test_display_round_trip() {
    let p = path("a.b.12.c");
    assert_eq!(p.to_string(), "a.b.12.c");
    assert_eq!(p.to_string().parse::<Path>().unwrap(), p);
}

#[test]
fn test_get_nested_value() {
    let data = doc(r#"{"user": {"tags": ["x", "y"]}}"#);
    assert_eq!(path("user.tags.1").get(&data).unwrap(), Expr::from("y"));
}

#[test]
fn test_get_root_path_returns_container() {
    let data = doc(r#"{"a": 1}"#);
    assert_eq!(Path::root().get(&data).unwrap(), data);
}

#[test]
fn test_get_missing_key_is_null() {
    let data = doc(r#"{"a": 1}"#);
    assert_eq!(path("b").get(&data).unwrap(), Expr::Null);
}

#[test]
fn test_get_out_of_range_index_is_null() {
    let data = doc(r#"{"xs": [1, 2]}"#);
    assert_eq!(path("xs.5").get(&data).unwrap(), Expr::Null);
}

#[test]
fn test_get_key_into_array_is_no_reference() {
    let data = doc(r#"{"xs": [1, 2]}"#);
    assert!(matches!(
        path("xs.first").get(&data),
        Err(EvalError::NoReference(_))
    ));
}

#[test]
fn test_get_index_into_object_is_no_reference() {
    let data = doc(r#"{"a": {"b": 1}}"#);
    assert!(matches!(path("a.0").get(&data), Err(EvalError::NoReference(_))));
}

#[test]
fn test_get_through_scalar_is_no_reference() {
    let data = doc(r#"{"a": 1}"#);
    assert!(matches!(path("a.b").get(&data), Err(EvalError::NoReference(_))));
}

#[test]
fn test_lookup_tells_absent_from_null() {
    let data = doc(r#"{"a": null}"#);
    assert_eq!(path("a").lookup(&data).unwrap(), Some(&Expr::Null));
    assert_eq!(path("b").lookup(&data).unwrap(), None);
}

#[test]
fn test_set_autovivifies_from_null() {
    let mut data = Expr::Null;
    path("a.b").set(&mut data, Expr::from(1.0)).unwrap();
    assert_eq!(data, doc(r#"{"a": {"b": 1}}"#));
}

#[test]
fn test_set_pads_arrays_with_null() {
    let mut data = Expr::Null;
    path("xs.2").set(&mut data, Expr::from(true)).unwrap();
    assert_eq!(data, doc(r#"{"xs": [null, null, true]}"#));
}

#[test]
fn test_set_overwrites_existing_value() {
    let mut data = doc(r#"{"a": {"b": 1, "c": 2}}"#);
    path("a.b").set(&mut data, Expr::from("new")).unwrap();
    assert_eq!(data, doc(r#"{"a": {"b": "new", "c": 2}}"#));
}

#[test]
fn test_set_into_scalar_is_no_reference() {
    let mut data = doc(r#"{"a": 1}"#);
    assert!(matches!(
        path("a.b").set(&mut data, Expr::Null),
        Err(EvalError::NoReference(_))
    ));
}

#[test]
fn test_is_child_of_is_strict() {
    let parent = path("a.b");
    assert!(path("a.b.c").is_child_of(&parent));
    assert!(!path("a.b").is_child_of(&parent));
    assert!(!path("a.c.d").is_child_of(&parent));
    assert!(path("a").is_child_of(&Path::root()));
}

#[test]
fn test_step_ordering_puts_keys_first() {
    let mut steps = vec![Step::Index(1), Step::from("b"), Step::Index(0), Step::from("a")];
    steps.sort();
    assert_eq!(
        steps,
        vec![Step::from("a"), Step::from("b"), Step::Index(0), Step::Index(1)]
    );
}

#[test]
fn test_set_rejects_index_past_usize_max() {
    let mut data = Expr::Null;
    let p = path(&format!("a.{}", usize::MAX));
    assert!(matches!(
        p.set(&mut data, Expr::Null),
        Err(EvalError::NoReference(_))
    ));
}

//! Purpose: Lock the observable add/get contract of the node facade.
//! Exports: Integration tests only (no runtime exports).
//! Role: Covers default suppression, skip-on-absent, round trips, and the
//! absent-vs-empty distinctions of the map getters.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;

use jnode::{ErrorKind, JsonItem, JsonNode, JsonSerializable};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
enum Color {
    Red,
    DeepBlue,
}

struct Widget {
    id: i64,
}

impl JsonSerializable for Widget {
    fn to_json_node(&self, _config: Option<&(dyn Any + Send + Sync)>) -> JsonNode {
        let mut node = JsonNode::new();
        node.add_primitive("id", Some(self.id), None).unwrap();
        node
    }
}

#[test]
fn primitive_default_suppression() {
    let mut node = JsonNode::new();
    node.add_primitive("count", Some(5), Some(0)).unwrap();
    node.add_primitive("retries", Some(0), Some(0)).unwrap();
    node.add_primitive::<&str>("name", None, None).unwrap();
    assert_eq!(node.serialize().unwrap(), r#"{"count":5}"#);
}

#[test]
fn enum_round_trip_uses_string_names() {
    let mut node = JsonNode::new();
    node.add_enum("color", Color::DeepBlue).unwrap();
    node.add_opt_enum("accent", Some(Color::Red)).unwrap();
    node.add_opt_enum::<Color>("missing", None).unwrap();

    assert_eq!(node.get_token("color"), Some(&json!("DeepBlue")));
    assert_eq!(node.get_enum("color", Color::Red).unwrap(), Color::DeepBlue);
    assert_eq!(node.get_enum("absent", Color::Red).unwrap(), Color::Red);
    assert_eq!(
        node.get_nullable_enum::<Color>("accent").unwrap(),
        Some(Color::Red)
    );
    assert_eq!(node.get_nullable_enum::<Color>("missing").unwrap(), None);
}

#[test]
fn malformed_enum_token_is_an_invalid_enum_error() {
    let node = JsonNode::deserialize_from_str(r#"{"color":"Chartreuse"}"#).unwrap();
    let err = node.get_enum("color", Color::Red).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnum);
    let err = node.get_nullable_enum::<Color>("color").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnum);
}

#[test]
fn present_non_array_values_are_convert_errors() {
    let node = JsonNode::deserialize_from_str(r#"{"scalar":5}"#).unwrap();

    let err = node.get_array::<i64>("scalar").next().unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convert);

    let err = node
        .get_array_first::<i64>(&["missing", "scalar"])
        .next()
        .unwrap()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convert);

    let err = node
        .get_array_zip(
            "scalar",
            Vec::<fn(&Value) -> Result<String, jnode::Error>>::new(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convert);

    let err = node.get_node_array("scalar").next().unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convert);
}

#[test]
fn non_string_enum_tokens_are_invalid_enum_errors() {
    let node = JsonNode::deserialize_from_str(r#"{"color":3,"shade":null}"#).unwrap();

    let err = node.get_enum("color", Color::Red).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnum);
    let err = node.get_nullable_enum::<Color>("color").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnum);

    // Explicit null reads like absence.
    assert_eq!(node.get_enum("shade", Color::Red).unwrap(), Color::Red);
    assert_eq!(node.get_nullable_enum::<Color>("shade").unwrap(), None);
}

#[test]
fn array_round_trip_preserves_order() {
    let mut node = JsonNode::new();
    node.add_array("tags", vec!["b", "a", "c"]).unwrap();
    let back: Vec<String> = node.get_array("tags").collect::<Result<_, _>>().unwrap();
    assert_eq!(back, vec!["b", "a", "c"]);

    // Restartable: a second call walks the same elements again.
    let again: Vec<String> = node.get_array("tags").collect::<Result<_, _>>().unwrap();
    assert_eq!(again, back);
}

#[test]
fn empty_array_adds_nothing() {
    let mut node = JsonNode::new();
    node.add_array("tags", Vec::<String>::new()).unwrap();
    node.add_array_with("built", Vec::<i64>::new(), |_| JsonNode::new())
        .unwrap();
    assert!(node.is_empty());
}

#[test]
fn array_of_serializables_and_nodes() {
    let widgets = [Widget { id: 1 }, Widget { id: 2 }];
    let mut node = JsonNode::new();
    node.add_array(
        "widgets",
        widgets.iter().map(|w| JsonItem::serializable(w)),
    )
    .unwrap();
    node.add_array_with("doubled", widgets.iter(), |w| {
        let mut item = JsonNode::new();
        item.add_primitive("id", Some(w.id * 2), None).unwrap();
        item
    })
    .unwrap();

    assert_eq!(
        node.get_token("widgets"),
        Some(&json!([{"id": 1}, {"id": 2}]))
    );
    assert_eq!(
        node.get_token("doubled"),
        Some(&json!([{"id": 2}, {"id": 4}]))
    );

    let nodes: Vec<JsonNode> = node
        .get_node_array("widgets")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].get_or("id", 0_i64).unwrap(), 1);
}

#[test]
fn serializable_property_converts_with_no_config() {
    let mut node = JsonNode::new();
    node.add_serializable("widget", Some(&Widget { id: 9 })).unwrap();
    node.add_serializable("absent", None).unwrap();
    assert_eq!(node.get_token("widget"), Some(&json!({"id": 9})));
    assert_eq!(node.get_token("absent"), None);
}

#[test]
fn map_keys_are_verbatim_and_empty_maps_are_skipped() {
    let mut node = JsonNode::new();
    let mut map = HashMap::new();
    map.insert("Foo".to_string(), 1_i64);
    map.insert("barBaz".to_string(), 2_i64);
    node.add_map("values", map).unwrap();
    node.add_map("nothing", HashMap::<String, i64>::new()).unwrap();

    assert_eq!(node.get_token("nothing"), None);
    let back: HashMap<String, i64> = node.get_map("values").unwrap();
    assert_eq!(back.get("Foo"), Some(&1));
    assert_eq!(back.get("barBaz"), Some(&2));
}

#[test]
fn map_values_follow_the_conversion_rule() {
    let mut inner = JsonNode::new();
    inner.add_primitive("x", Some(1), None).unwrap();

    let mut node = JsonNode::new();
    node.add_map(
        "mixed",
        vec![
            ("node".to_string(), JsonItem::from(inner)),
            ("scalar".to_string(), JsonItem::from(10_i64)),
            ("absent".to_string(), JsonItem::from(None::<i64>)),
        ],
    )
    .unwrap();

    assert_eq!(
        node.get_token("mixed"),
        Some(&json!({"node": {"x": 1}, "scalar": 10, "absent": null}))
    );
}

#[test]
fn add_node_skips_absent_and_empty() {
    let mut node = JsonNode::new();
    node.add_node("empty", Some(JsonNode::new())).unwrap();
    node.add_node("absent", None).unwrap();
    assert!(node.is_empty());

    let mut child = JsonNode::new();
    child.add_primitive("x", Some(1), None).unwrap();
    node.add_node("child", Some(child)).unwrap();
    assert_eq!(node.get_token("child"), Some(&json!({"x": 1})));
}

#[test]
fn get_returns_absent_never_errors_on_missing() {
    let node = JsonNode::new();
    assert_eq!(node.get::<i64>("missing").unwrap(), None);
    assert_eq!(node.get_or("missing", 7_i64).unwrap(), 7);
    assert_eq!(node.get_or_default::<i64>("missing").unwrap(), 0);
    assert_eq!(node.get_token("missing"), None);
    assert_eq!(node.get_array::<i64>("missing").count(), 0);
    assert!(node.get_map::<i64>("missing").unwrap().is_empty());
    assert_eq!(node.get_node("missing").unwrap(), None);
    assert_eq!(node.get_node_map("missing").unwrap(), None);
    assert_eq!(node.get_node_array_map("missing").unwrap(), None);
}

#[test]
fn get_seed_drives_runtime_conversion() {
    let node = JsonNode::deserialize_from_str(r#"{"count":5}"#).unwrap();
    let value = node.get_seed("count", PhantomData::<i64>).unwrap();
    assert_eq!(value, Some(5));
    let absent = node.get_seed("missing", PhantomData::<i64>).unwrap();
    assert_eq!(absent, None);
}

#[test]
fn get_array_first_uses_the_first_present_name() {
    let node = JsonNode::deserialize_from_str(r#"{"new_name":[1,2],"old_name":[9]}"#).unwrap();
    let values: Vec<i64> = node
        .get_array_first(&["missing", "new_name", "old_name"])
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn get_array_zip_stops_at_the_shorter_sequence() {
    let node = JsonNode::deserialize_from_str(r#"{"mixed":[1,"two",true]}"#).unwrap();
    let converters: Vec<fn(&Value) -> Result<String, jnode::Error>> = vec![
        |value| Ok(format!("int:{value}")),
        |value| Ok(format!("raw:{value}")),
    ];
    let out = node.get_array_zip("mixed", converters).unwrap();
    assert_eq!(out, vec!["int:1".to_string(), "raw:\"two\"".to_string()]);

    let empty = node
        .get_array_zip("missing", Vec::<fn(&Value) -> Result<String, jnode::Error>>::new())
        .unwrap();
    assert!(empty.is_empty());
}

#[test]
fn get_map_with_distinguishes_absent_from_empty() {
    let node = JsonNode::deserialize_from_str(r#"{"empty":{},"typed":{"a":1,"b":"x"}}"#).unwrap();

    let absent = node.get_map_with("missing", |_, _| Ok(())).unwrap();
    assert_eq!(absent, None);

    let empty = node.get_map_with("empty", |_, _| Ok(())).unwrap();
    assert_eq!(empty, Some(HashMap::new()));

    // Per-key target selection: "a" reads as a number, everything else as text.
    let typed = node
        .get_map_with("typed", |key, value| match key {
            "a" => Ok(value.to_string()),
            _ => Ok(format!("text:{value}")),
        })
        .unwrap()
        .unwrap();
    assert_eq!(typed.get("a").map(String::as_str), Some("1"));
    assert_eq!(typed.get("b").map(String::as_str), Some("text:\"x\""));
}

#[test]
fn node_map_getters_wrap_sub_objects() {
    let node = JsonNode::deserialize_from_str(
        r#"{"groups":{"a":{"x":1},"b":{"x":2}},"lists":{"a":[{"x":1},{"x":2}]}}"#,
    )
    .unwrap();

    let groups = node.get_node_map("groups").unwrap().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["a"].get_or("x", 0_i64).unwrap(), 1);

    let lists = node.get_node_array_map("lists").unwrap().unwrap();
    assert_eq!(lists["a"].len(), 2);
    assert_eq!(lists["a"][1].get_or("x", 0_i64).unwrap(), 2);
}

#[test]
fn built_nodes_round_trip_through_text() {
    let mut node = JsonNode::new();
    node.add_primitive("count", Some(5), None).unwrap();
    node.add_enum("color", Color::Red).unwrap();
    node.add_array("tags", vec!["a", "b"]).unwrap();
    let mut child = JsonNode::new();
    child.add_primitive("x", Some(true), None).unwrap();
    node.add_node("child", Some(child)).unwrap();

    let text = node.serialize().unwrap();
    let back = JsonNode::deserialize_from_str(&text).unwrap();
    assert_eq!(back, node);
}

#[test]
fn datetime_tokens_keep_their_offset() {
    let node =
        JsonNode::deserialize_from_str(r#"{"when":"2026-08-24T10:00:00+02:00"}"#).unwrap();
    let when = node.get_datetime("when").unwrap().unwrap();
    assert_eq!(when.offset().whole_hours(), 2);
    assert_eq!(
        when.format(&time::format_description::well_known::Rfc3339)
            .unwrap(),
        "2026-08-24T10:00:00+02:00"
    );
    assert_eq!(node.get_datetime("missing").unwrap(), None);
}

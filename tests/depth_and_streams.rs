//! Purpose: Lock the nesting-depth cap and the stream serialize/deserialize paths.
//! Exports: Integration tests only (no runtime exports).
//! Role: Depth 128 is accepted and 129 rejected on both read and write; the
//! stream sink is rewound after writing so it reads from the start.

use std::io::Read;

use jnode::{ErrorKind, JsonNode, MAX_DEPTH};
use serde_json::{Map, Value};

// `levels` nested objects, the outermost included.
fn nested_value(levels: usize) -> Value {
    let mut value = Value::Object(Map::new());
    for _ in 1..levels {
        let mut map = Map::new();
        map.insert("next".to_string(), value);
        value = Value::Object(map);
    }
    value
}

// `levels` nested objects as text, e.g. {"a":{"a":null}} for two.
fn nested_text(levels: usize) -> String {
    let mut text = String::new();
    for _ in 0..levels {
        text.push_str(r#"{"a":"#);
    }
    text.push_str("null");
    for _ in 0..levels {
        text.push('}');
    }
    text
}

fn node_of_depth(levels: usize) -> JsonNode {
    // The node's own object is one level; the payload supplies the rest.
    let mut map = Map::new();
    map.insert("deep".to_string(), nested_value(levels - 1));
    JsonNode::from_map(map)
}

#[test]
fn serialize_accepts_the_cap_and_rejects_one_past_it() {
    assert!(node_of_depth(MAX_DEPTH).serialize().is_ok());

    let err = node_of_depth(MAX_DEPTH + 1).serialize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);

    let err = node_of_depth(MAX_DEPTH + 1)
        .serialize_to_writer(Vec::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
}

#[test]
fn deserialize_accepts_the_cap_and_rejects_one_past_it() {
    assert!(JsonNode::deserialize_from_str(&nested_text(MAX_DEPTH)).is_ok());

    let err = JsonNode::deserialize_from_str(&nested_text(MAX_DEPTH + 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);

    assert!(JsonNode::deserialize_from_reader(nested_text(MAX_DEPTH).as_bytes()).is_ok());
    let err = JsonNode::deserialize_from_reader(nested_text(MAX_DEPTH + 1).as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
}

// Read and write share one fencepost: a node at the cap parses its own output.
#[test]
fn deep_nodes_round_trip_through_text() {
    let node = node_of_depth(MAX_DEPTH);
    let text = node.serialize().unwrap();
    let back = JsonNode::deserialize_from_str(&text).unwrap();
    assert_eq!(back, node);
}

#[test]
fn malformed_text_is_a_parse_error() {
    let err = JsonNode::deserialize_from_str("{oops").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn non_object_roots_are_rejected() {
    let err = JsonNode::deserialize_from_str("[1,2]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convert);
}

#[test]
fn stream_sink_is_readable_from_the_start_after_writing() {
    let mut node = JsonNode::new();
    node.add_primitive("count", Some(5), None).unwrap();

    let mut file = tempfile::tempfile().unwrap();
    node.serialize_to_stream(&mut file).unwrap();

    // No explicit rewind here: the write left the position at zero.
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    assert_eq!(text, r#"{"count":5}"#);
}

#[test]
fn writer_and_reader_paths_round_trip() {
    let mut node = JsonNode::new();
    node.add_primitive("count", Some(5), None).unwrap();
    node.add_array("tags", vec!["a", "b"]).unwrap();

    let mut buffer = Vec::new();
    node.serialize_to_writer(&mut buffer).unwrap();
    let back = JsonNode::deserialize_from_reader(buffer.as_slice()).unwrap();
    assert_eq!(back, node);
}

//! Purpose: Deep structural hashing matching deep equality.
//! Exports: `hash_value`, `hash_object`.
//! Role: Backs `Hash` for nodes so hash agrees with the deep-equality contract.
//! Invariants: Object entry order does not affect the hash (object equality is
//! order-independent); array element order does.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::{Map, Value};

pub(crate) fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => state.write_u8(0),
        Value::Bool(flag) => {
            state.write_u8(1);
            flag.hash(state);
        }
        Value::Number(number) => {
            state.write_u8(2);
            number.hash(state);
        }
        Value::String(text) => {
            state.write_u8(3);
            text.hash(state);
        }
        Value::Array(items) => {
            state.write_u8(4);
            state.write_usize(items.len());
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            state.write_u8(5);
            hash_object(map, state);
        }
    }
}

pub(crate) fn hash_object<H: Hasher>(map: &Map<String, Value>, state: &mut H) {
    let mut combined: u64 = 0;
    for (key, value) in map {
        let mut entry = DefaultHasher::new();
        key.hash(&mut entry);
        hash_value(value, &mut entry);
        combined = combined.wrapping_add(entry.finish());
    }
    state.write_usize(map.len());
    state.write_u64(combined);
}

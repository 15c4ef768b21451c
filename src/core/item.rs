//! Purpose: Element conversion rule for array/map adds, plus the serializable capability.
//! Exports: `JsonSerializable`, `JsonItem`.
//! Role: Normalizes heterogeneous inputs (nodes, node lists, serializables, scalars) to values.
//! Invariants: Serializable conversion is always invoked with no configuration.
//! Invariants: `None` inputs convert to JSON null rather than being dropped here;
//! skip-on-absent decisions belong to the node's Add methods.

use std::any::Any;

use serde::Serialize;
use serde_json::Value;

use crate::core::error::Error;
use crate::core::node::JsonNode;

/// Capability contract for domain types that shape their own JSON.
pub trait JsonSerializable {
    fn to_json_node(&self, config: Option<&(dyn Any + Send + Sync)>) -> JsonNode;
}

/// A single array element or map value, normalized for insertion.
pub enum JsonItem {
    Value(Value),
    Node(JsonNode),
    Nodes(Vec<JsonNode>),
}

impl JsonItem {
    /// Converts through the serializable capability, with no configuration.
    pub fn serializable(item: &dyn JsonSerializable) -> Self {
        JsonItem::Node(item.to_json_node(None))
    }

    /// Converts any serde-serializable value through the engine's default path.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(value).map_err(Error::from_json)?;
        Ok(JsonItem::Value(value))
    }

    pub(crate) fn into_value(self) -> Value {
        match self {
            JsonItem::Value(value) => value,
            JsonItem::Node(node) => node.into_value(),
            JsonItem::Nodes(nodes) => {
                Value::Array(nodes.into_iter().map(JsonNode::into_value).collect())
            }
        }
    }
}

impl From<JsonNode> for JsonItem {
    fn from(node: JsonNode) -> Self {
        JsonItem::Node(node)
    }
}

impl From<Vec<JsonNode>> for JsonItem {
    fn from(nodes: Vec<JsonNode>) -> Self {
        JsonItem::Nodes(nodes)
    }
}

impl From<Value> for JsonItem {
    fn from(value: Value) -> Self {
        JsonItem::Value(value)
    }
}

impl<T: Into<JsonItem>> From<Option<T>> for JsonItem {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => JsonItem::Value(Value::Null),
        }
    }
}

macro_rules! scalar_items {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for JsonItem {
                fn from(value: $ty) -> Self {
                    JsonItem::Value(Value::from(value))
                }
            }
        )*
    };
}

scalar_items!(bool, i32, i64, u32, u64, f64, String, &str);

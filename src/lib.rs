//! Purpose: Typed facade over serde_json object graphs (build-by-add, read-by-get).
//! Exports: `core` (node facade, conversion items, errors), `json` (engine boundary).
//! Role: Thin adapter between entity-data model code and the serde_json engine.
//! Invariants: All parsing/serialization delegates to serde_json; nothing is hand-parsed.
//! Invariants: Object key insertion order is preserved end to end (preserve_order).
pub mod core;
pub mod json;

pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::item::{JsonItem, JsonSerializable};
pub use crate::core::node::JsonNode;
pub use crate::json::MAX_DEPTH;

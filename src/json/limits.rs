//! Purpose: Nesting-depth cap shared by the read and write paths.
//! Exports: `MAX_DEPTH`, `depth_within`.
//! Role: One guard for both directions. serde_json's own recursion limit sits
//! one level below the cap, so the read paths disable it and check the parsed
//! tree here instead; serialization has no engine cap at all.
//! Invariants: Every container level counts, the root object included.

use serde_json::Value;

/// Hard cap on container nesting, enforced on both read and write.
pub const MAX_DEPTH: usize = 128;

pub(crate) fn depth_within(value: &Value, budget: usize) -> bool {
    match value {
        Value::Array(items) => budget > 0 && items.iter().all(|item| depth_within(item, budget - 1)),
        Value::Object(map) => budget > 0 && map.values().all(|item| depth_within(item, budget - 1)),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_DEPTH, depth_within};
    use serde_json::{Map, Value, json};

    fn nested(levels: usize) -> Value {
        let mut value = Value::Object(Map::new());
        for _ in 1..levels {
            let mut map = Map::new();
            map.insert("next".to_string(), value);
            value = Value::Object(map);
        }
        value
    }

    #[test]
    fn scalars_always_fit() {
        assert!(depth_within(&json!(5), 0));
        assert!(depth_within(&json!("text"), 0));
    }

    #[test]
    fn budget_counts_container_levels() {
        assert!(depth_within(&nested(3), 3));
        assert!(!depth_within(&nested(3), 2));
    }

    #[test]
    fn cap_boundary_is_exact() {
        assert!(depth_within(&nested(MAX_DEPTH), MAX_DEPTH));
        assert!(!depth_within(&nested(MAX_DEPTH + 1), MAX_DEPTH));
    }
}

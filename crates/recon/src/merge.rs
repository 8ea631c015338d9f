use serde_json::{Map, Value};

use crate::coerce::clean_movement;

/// Overwrite `movement`, `source` and `role` on a manifest item from its
/// per-item source document. Prior values are never consulted. Other item
/// keys are left alone, and existing keys keep their position.
pub fn apply_source(item: &mut Map<String, Value>, source: &Map<String, Value>) {
    item.insert("movement".into(), clean_movement(source.get("movement")).to_value());
    item.insert("source".into(), copied_or_empty(source, "source"));
    item.insert("role".into(), copied_or_empty(source, "role"));
}

fn copied_or_empty(source: &Map<String, Value>, key: &str) -> Value {
    source.get(key).cloned().unwrap_or_else(|| Value::String(String::new()))
}

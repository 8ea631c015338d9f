use serde_json::{Map, Value};

/// Where an item's source file lives, relative to the manifest directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Path(String),
    /// No usable path. `label` is the item's display name or model, if any.
    NoPath { label: Option<String> },
}

/// Resolve an item's relative source path.
///
/// A non-empty string `path` wins. Otherwise `bucket` and `file` are joined
/// with `/` and stripped of leading/trailing slashes.
pub fn resolve_item(item: &Value) -> Resolution {
    let Some(obj) = item.as_object() else {
        return Resolution::NoPath { label: None };
    };

    if let Some(path) = non_empty_str(obj, "path") {
        return Resolution::Path(path.to_string());
    }

    let joined = format!("{}/{}", str_or_empty(obj, "bucket"), str_or_empty(obj, "file"));
    let trimmed = joined.trim_matches('/');
    if trimmed.is_empty() {
        return Resolution::NoPath { label: display_label(obj) };
    }
    Resolution::Path(trimmed.to_string())
}

/// First non-empty of `displayName`, `model`.
pub fn display_label(obj: &Map<String, Value>) -> Option<String> {
    non_empty_str(obj, "displayName")
        .or_else(|| non_empty_str(obj, "model"))
        .map(str::to_string)
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn str_or_empty<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or("")
}

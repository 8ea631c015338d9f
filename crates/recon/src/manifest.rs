//! The manifest document: load, stamp, serialize, persist.
//!
//! The document is held as an untyped JSON object so that fields this crate
//! does not know about survive a run unchanged and in their original order.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ReconError;

/// Format used for the `generated` stamp, e.g. `2024-05-01T12:34:56Z`.
pub const GENERATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_generated(now: DateTime<Utc>) -> String {
    now.format(GENERATED_FORMAT).to_string()
}

#[derive(Debug, Clone)]
pub struct ManifestDoc {
    root: Map<String, Value>,
}

impl ManifestDoc {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, ReconError> {
        let text = std::fs::read_to_string(path).map_err(|e| ReconError::ManifestLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let doc = Self::from_json_str(&text).map_err(|err| match err {
            ReconError::ManifestLoad { reason, .. } => ReconError::ManifestLoad {
                path: path.display().to_string(),
                reason,
            },
            ReconError::ManifestShape { reason, .. } => ReconError::ManifestShape {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        log::info!("loaded manifest {} ({} items)", path.display(), doc.item_count());
        Ok(doc)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ReconError> {
        let value: Value = serde_json::from_str(text).map_err(|e| ReconError::ManifestLoad {
            path: String::new(),
            reason: e.to_string(),
        })?;
        let Value::Object(root) = value else {
            return Err(ReconError::ManifestShape {
                path: String::new(),
                reason: "top level is not a JSON object".into(),
            });
        };
        match root.get("items") {
            None | Some(Value::Array(_)) => Ok(Self { root }),
            Some(_) => Err(ReconError::ManifestShape {
                path: String::new(),
                reason: "\"items\" is not an array".into(),
            }),
        }
    }

    pub fn item_count(&self) -> usize {
        self.items().len()
    }

    /// Items in document order. An absent `items` key reads as empty.
    pub fn items(&self) -> &[Value] {
        match self.root.get("items") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// Mutable items in document order. Does not create an `items` key.
    pub fn items_mut(&mut self) -> &mut [Value] {
        match self.root.get_mut("items") {
            Some(Value::Array(items)) => items.as_mut_slice(),
            _ => &mut [],
        }
    }

    pub fn generated(&self) -> Option<&str> {
        self.root.get("generated").and_then(Value::as_str)
    }

    /// Set `generated`, returning the stamp written.
    pub fn stamp(&mut self, now: DateTime<Utc>) -> String {
        let stamp = format_generated(now);
        self.root.insert("generated".into(), Value::String(stamp.clone()));
        stamp
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Pretty JSON with 2-space indentation, no trailing newline.
    pub fn to_pretty_json(&self) -> Result<String, ReconError> {
        serde_json::to_string_pretty(&self.root).map_err(|e| ReconError::Serialize(e.to_string()))
    }

    /// Write the document to `backup`, then to `primary`. Not atomic: a
    /// failure on the primary write leaves the backup already updated.
    pub fn persist(&self, backup: &Path, primary: &Path) -> Result<(), ReconError> {
        let json = self.to_pretty_json()?;
        for path in [backup, primary] {
            std::fs::write(path, &json).map_err(|e| ReconError::ManifestWrite {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            log::info!("wrote {}", path.display());
        }
        Ok(())
    }
}

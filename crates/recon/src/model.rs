use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Merged fields
// ---------------------------------------------------------------------------

/// Movement profile copied from a per-item file. Always integral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub walk: i64,
    pub jump: i64,
}

impl Movement {
    pub fn to_value(self) -> Value {
        json!({ "walk": self.walk, "jump": self.jump })
    }
}

// ---------------------------------------------------------------------------
// Per-item outcomes
// ---------------------------------------------------------------------------

/// An item that was skipped because its source file could not be located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason")]
pub enum MissingEntry {
    /// Neither `path` nor `bucket`/`file` yielded a relative path.
    #[serde(rename = "no path")]
    NoPath { index: usize, item: Option<String> },
    /// The resolved path is not a regular file.
    #[serde(rename = "file not found")]
    FileNotFound { index: usize, path: String },
}

impl MissingEntry {
    pub fn index(&self) -> usize {
        match self {
            Self::NoPath { index, .. } | Self::FileNotFound { index, .. } => *index,
        }
    }
}

impl fmt::Display for MissingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPath { index, item: Some(label) } => {
                write!(f, "#{index} no path ({label})")
            }
            Self::NoPath { index, item: None } => write!(f, "#{index} no path"),
            Self::FileNotFound { index, path } => write!(f, "#{index} file not found: {path}"),
        }
    }
}

/// An item whose source file exists but could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub index: usize,
    pub path: String,
    pub error: String,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.index, self.path, self.error)
    }
}

/// Counters and lists collected by one pass over the items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemTally {
    pub total: usize,
    pub updated: usize,
    pub missing: Vec<MissingEntry>,
    pub errors: Vec<ItemFailure>,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub manifest: String,
    pub backup: String,
    pub generated: String,
    pub dry_run: bool,
    pub items: usize,
    pub updated: usize,
    pub missing: Vec<MissingEntry>,
    pub errors: Vec<ItemFailure>,
    #[serde(skip)]
    pub sample_limit: usize,
}

impl ReconSummary {
    pub fn missing_sample(&self) -> &[MissingEntry] {
        &self.missing[..self.missing.len().min(self.sample_limit)]
    }

    pub fn error_sample(&self) -> &[ItemFailure] {
        &self.errors[..self.errors.len().min(self.sample_limit)]
    }

    /// True when every item resolved, loaded and merged.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.errors.is_empty()
    }
}

use std::fmt;

/// Run-level failures. Per-item problems are never errors; they are
/// recorded in the summary and the pass continues.
#[derive(Debug)]
pub enum ReconError {
    /// Manifest file missing, unreadable, or not valid JSON.
    ManifestLoad { path: String, reason: String },
    /// Manifest parsed but its shape cannot hold an item list.
    ManifestShape { path: String, reason: String },
    /// In-memory document could not be serialized.
    Serialize(String),
    /// Backup or primary manifest write failed.
    ManifestWrite { path: String, reason: String },
}

impl ReconError {
    /// True for failures that happened before anything was written.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::ManifestLoad { .. } | Self::ManifestShape { .. })
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestLoad { path, reason } => {
                write!(f, "cannot load manifest '{path}': {reason}")
            }
            Self::ManifestShape { path, reason } => {
                write!(f, "manifest '{path}' is malformed: {reason}")
            }
            Self::Serialize(msg) => write!(f, "JSON serialization error: {msg}"),
            Self::ManifestWrite { path, reason } => {
                write!(f, "cannot write '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for ReconError {}

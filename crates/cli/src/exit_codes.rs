//! CLI Exit Code Registry
//!
//! Single source of truth for `mechsync` exit codes. Scripts rely on them.
//!
//! | Code | Description                                              |
//! |------|----------------------------------------------------------|
//! | 0    | Success (missing/errored items do not change this)       |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (bad args; emitted by clap)              |
//! | 3    | Manifest could not be loaded; nothing was written        |
//! | 4    | Manifest could not be serialized or written              |
//! | 5    | `--strict` and at least one item was missing or errored  |

use mechsync_recon::ReconError;

/// Success - reconciliation completed and files were written.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Manifest missing, unreadable, not JSON, or wrongly shaped.
pub const EXIT_MANIFEST_LOAD: u8 = 3;

/// Backup or primary write failed (or serialization did).
/// Whichever write succeeded before the failure stays on disk.
pub const EXIT_MANIFEST_WRITE: u8 = 4;

/// `--strict` run finished but some items were skipped.
pub const EXIT_INCOMPLETE: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ManifestLoad { .. } | ReconError::ManifestShape { .. } => EXIT_MANIFEST_LOAD,
        ReconError::Serialize(_) | ReconError::ManifestWrite { .. } => EXIT_MANIFEST_WRITE,
    }
}

//! `mechsync-recon` — reconciles a mech inventory manifest with the
//! per-item data files it points at.
//!
//! One sequential pass: each item's source file is resolved relative to the
//! manifest's directory, loaded, and its `movement`, `source` and `role`
//! overwrite the item's. Per-item problems are collected in the summary;
//! only manifest-level load/write failures are errors.

pub mod coerce;
pub mod config;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod model;
pub mod resolve;

pub use config::ReconOptions;
pub use engine::{reconcile, reconcile_at};
pub use error::ReconError;
pub use manifest::{format_generated, ManifestDoc};
pub use model::{ItemFailure, MissingEntry, Movement, ReconSummary};

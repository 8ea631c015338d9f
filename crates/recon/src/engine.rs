use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::config::ReconOptions;
use crate::error::ReconError;
use crate::manifest::ManifestDoc;
use crate::merge::apply_source;
use crate::model::{ItemFailure, ItemTally, MissingEntry, ReconSummary};
use crate::resolve::{resolve_item, Resolution};

/// Reconcile the manifest at `manifest_path` against its per-item files,
/// stamp it with the current time, and write backup + primary.
pub fn reconcile(manifest_path: &Path, options: &ReconOptions) -> Result<ReconSummary, ReconError> {
    reconcile_at(manifest_path, options, Utc::now())
}

/// [`reconcile`] with an explicit clock for the `generated` stamp.
pub fn reconcile_at(
    manifest_path: &Path,
    options: &ReconOptions,
    now: DateTime<Utc>,
) -> Result<ReconSummary, ReconError> {
    let mut doc = ManifestDoc::load(manifest_path)?;

    let tally = reconcile_items(&mut doc, base_dir(manifest_path));
    let generated = doc.stamp(now);

    let backup = backup_path(manifest_path, options);
    if options.dry_run {
        log::info!("dry run: skipping writes to {} and {}", backup.display(), manifest_path.display());
    } else {
        doc.persist(&backup, manifest_path)?;
    }

    Ok(ReconSummary {
        manifest: manifest_path.display().to_string(),
        backup: backup.display().to_string(),
        generated,
        dry_run: options.dry_run,
        items: tally.total,
        updated: tally.updated,
        missing: tally.missing,
        errors: tally.errors,
        sample_limit: options.sample_limit,
    })
}

/// Directory that item paths are relative to. A bare file name resolves
/// against the current directory.
pub fn base_dir(manifest_path: &Path) -> &Path {
    manifest_path.parent().unwrap_or_else(|| Path::new(""))
}

/// One pass over the items, in order, merging each resolvable source file.
/// Items that are missing or fail to load are left untouched.
pub fn reconcile_items(doc: &mut ManifestDoc, base_dir: &Path) -> ItemTally {
    let mut tally = ItemTally::default();

    for (index, item) in doc.items_mut().iter_mut().enumerate() {
        tally.total += 1;

        let rel_path = match resolve_item(item) {
            Resolution::Path(p) => p,
            Resolution::NoPath { label } => {
                log::debug!("item #{index}: no path ({})", label.as_deref().unwrap_or("-"));
                tally.missing.push(MissingEntry::NoPath { index, item: label });
                continue;
            }
        };

        let source_path = base_dir.join(&rel_path);
        if !source_path.is_file() {
            log::debug!("item #{index}: file not found: {}", source_path.display());
            tally.missing.push(MissingEntry::FileNotFound { index, path: rel_path });
            continue;
        }

        let source = match load_source(&source_path) {
            Ok(source) => source,
            Err(error) => {
                log::debug!("item #{index}: cannot load {}: {error}", source_path.display());
                tally.errors.push(ItemFailure { index, path: rel_path, error });
                continue;
            }
        };

        // resolve_item only returns a path for objects
        if let Value::Object(fields) = item {
            apply_source(fields, &source);
            tally.updated += 1;
            log::debug!("item #{index}: updated from {rel_path}");
        }
    }

    tally
}

/// Read and parse one per-item file. The error is a display string so the
/// caller can record it and move on.
pub fn load_source(path: &Path) -> Result<Map<String, Value>, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let value: Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err("expected a JSON object at top level".to_string()),
    }
}

/// Backup location for a manifest under the given options.
pub fn backup_path(manifest_path: &Path, options: &ReconOptions) -> PathBuf {
    base_dir(manifest_path).join(&options.backup_file_name)
}

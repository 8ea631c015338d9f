/// File name of the backup copy, written next to the manifest.
pub const BACKUP_FILE_NAME: &str = "manifest.backup.json";

/// Number of missing/error entries shown in the report.
pub const DEFAULT_SAMPLE_LIMIT: usize = 3;

/// Options for a single reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconOptions {
    /// Backup file name, resolved against the manifest's directory.
    pub backup_file_name: String,
    /// How many missing/error entries `ReconSummary::*_sample` returns.
    pub sample_limit: usize,
    /// Run the full pass and stamp, but write nothing.
    pub dry_run: bool,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self {
            backup_file_name: BACKUP_FILE_NAME.to_string(),
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            dry_run: false,
        }
    }
}

impl ReconOptions {
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

// mechsync - reconcile a mech manifest with its per-item data files

mod exit_codes;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mechsync_recon::{ReconError, ReconOptions, ReconSummary};

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_INCOMPLETE, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "mechsync")]
#[command(about = "Copy movement/source/role from per-item files into the manifest")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Examples:
  mechsync -m data/manifest.json
  mechsync -m data/manifest.json --dry-run --json
  mechsync --manifest data/manifest.json --strict")]
struct Cli {
    /// Full path to the manifest (item paths resolve against its directory)
    #[arg(short, long, value_name = "PATH")]
    manifest: PathBuf,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Reconcile in memory but write neither the backup nor the manifest
    #[arg(long)]
    dry_run: bool,

    /// Exit with code 5 if any item was missing or failed to load
    #[arg(long)]
    strict: bool,

    /// Suppress the human summary on stderr
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  mechsync-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Also installs the `log` bridge, so the engine's records show up here.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cmd_reconcile(&cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_reconcile(cli: &Cli) -> Result<(), CliError> {
    let options = ReconOptions::default().dry_run(cli.dry_run);
    let summary = mechsync_recon::reconcile(&cli.manifest, &options).map_err(CliError::recon)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }
    if !cli.quiet {
        report::print_human(&summary);
    }

    check_strict(cli.strict, &summary)
}

fn check_strict(strict: bool, summary: &ReconSummary) -> Result<(), CliError> {
    if strict && !summary.is_clean() {
        return Err(CliError::new(
            EXIT_INCOMPLETE,
            format!(
                "{} item(s) missing, {} item(s) failed to load",
                summary.missing.len(),
                summary.errors.len()
            ),
        ));
    }
    Ok(())
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::ManifestLoad { .. } | ReconError::ManifestShape { .. } => {
                Some("nothing was written".to_string())
            }
            ReconError::ManifestWrite { .. } => {
                Some("the backup is written first; check it before re-running".to_string())
            }
            ReconError::Serialize(_) => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

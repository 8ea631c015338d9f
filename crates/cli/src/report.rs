//! Human-readable run summary (stderr).

use std::fmt::Display;

use mechsync_recon::ReconSummary;

/// Summary lines in print order.
pub fn human_lines(summary: &ReconSummary) -> Vec<String> {
    let mut lines = vec![
        format!("updated: {}", summary.updated),
        format!(
            "missing files: {} | json errors: {}",
            summary.missing.len(),
            summary.errors.len()
        ),
    ];

    if !summary.missing.is_empty() {
        lines.push(sample_line("missing", summary.missing_sample(), summary.sample_limit));
    }
    if !summary.errors.is_empty() {
        lines.push(sample_line("errors", summary.error_sample(), summary.sample_limit));
    }

    if summary.dry_run {
        lines.push("dry run: nothing written".to_string());
    } else {
        lines.push(format!("wrote {}", summary.backup));
        lines.push(format!("wrote {}", summary.manifest));
    }
    lines
}

fn sample_line<T: Display>(label: &str, sample: &[T], limit: usize) -> String {
    let joined = sample.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
    format!("{label} (first {limit}): {joined}")
}

pub fn print_human(summary: &ReconSummary) {
    for line in human_lines(summary) {
        eprintln!("{line}");
    }
}

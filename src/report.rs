//! Plain-text result artifacts.
//!
//! Two outputs: the classification report covering every processed patient,
//! and one condensed-note file per patient. Both are flat UTF-8 text,
//! written verbatim; nothing here is meant to be machine-parsed beyond the
//! fixed section markers.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const REPORT_HEADER: &str = "--- Patient Follow-up Classification Results ---\n\n";
const REPORT_SEPARATOR: &str = "------------------------------\n";

/// Write the classification report.
///
/// Format, per patient in the given order: `Patient ID: <id>`,
/// `Classification: <label>`, then a 30-dash separator line.
pub fn save_results(
    results: &[(String, String)],
    results_dir: &Path,
    filename: &str,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(results_dir)?;
    let output_path = results_dir.join(filename);

    let mut content = String::from(REPORT_HEADER);
    for (patient_id, classification) in results {
        content.push_str(&format!("Patient ID: {patient_id}\n"));
        content.push_str(&format!("Classification: {classification}\n"));
        content.push_str(REPORT_SEPARATOR);
    }

    fs::write(&output_path, content)?;
    tracing::info!(path = %output_path.display(), patients = results.len(), "saved classification report");
    Ok(output_path)
}

/// Write one patient's condensed note to `<patient_id>_shortened.txt`.
pub fn save_shortened_note(
    patient_id: &str,
    content: &str,
    shortened_notes_dir: &Path,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(shortened_notes_dir)?;
    let output_path = shortened_notes_dir.join(format!("{patient_id}_shortened.txt"));
    fs::write(&output_path, content)?;
    tracing::info!(path = %output_path.display(), "saved condensed note");
    Ok(output_path)
}

//! Per-patient note loading.
//!
//! The data directory holds one subdirectory per patient; every `*.txt`
//! file inside is one visit's free-text note. Files are read in sorted
//! filename order so the pipeline always sees the same note sequence.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotesError {
    #[error("patient directory not found: {0}")]
    PatientDirNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// List patient IDs, one per subdirectory of the data directory, sorted.
pub fn list_patient_ids(data_dir: &Path) -> Result<Vec<String>, NotesError> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

/// Load every `*.txt` note for one patient, in sorted filename order.
///
/// A missing patient directory is an error. An individual file that fails
/// to read is logged and skipped; the remaining notes still load.
pub fn load_patient_notes(data_dir: &Path, patient_id: &str) -> Result<Vec<String>, NotesError> {
    let patient_dir = data_dir.join(patient_id);
    if !patient_dir.is_dir() {
        return Err(NotesError::PatientDirNotFound(patient_dir));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(&patient_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort_unstable();

    let mut notes = Vec::with_capacity(paths.len());
    for path in &paths {
        match fs::read_to_string(path) {
            Ok(content) => notes.push(content),
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "failed to read note, skipping");
            }
        }
    }

    tracing::info!(patient = patient_id, notes = notes.len(), "loaded patient notes");
    Ok(notes)
}

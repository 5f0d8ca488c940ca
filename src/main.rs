//! End-to-end workflow: load each patient's notes, condense them, classify
//! the condensed document and write the report.

use std::path::Path;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use condensa::ollama::{self, LlmClient, LlmError, OllamaClient};
use condensa::triage::NoteClassifier;
use condensa::{config, notes, pipeline, report};

#[derive(Debug, Error)]
enum WorkflowError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Notes(#[from] notes::NotesError),

    #[error(transparent)]
    Report(#[from] report::ReportError),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    if let Err(e) = run_workflow() {
        tracing::error!(error = %e, "workflow aborted");
        std::process::exit(1);
    }
}

fn run_workflow() -> Result<(), WorkflowError> {
    let data_dir = config::data_dir();
    let results_dir = config::results_dir();
    let shortened_dir = config::shortened_notes_dir();

    // The classifier is constructed once and passed through explicitly;
    // a failure here aborts before any patient work starts.
    let client = OllamaClient::new(&config::ollama_base_url(), config::OLLAMA_TIMEOUT_SECS);
    let model = ollama::find_best_model(&client)?;
    let classifier = NoteClassifier::new(client, model);
    tracing::info!(model = classifier.model(), "triage model selected");

    let patient_ids = notes::list_patient_ids(&data_dir)?;
    if patient_ids.is_empty() {
        tracing::warn!(
            dir = %data_dir.display(),
            "no patient directories found; run the simulate binary first"
        );
        return Ok(());
    }

    let mut results: Vec<(String, String)> = Vec::with_capacity(patient_ids.len());

    for patient_id in &patient_ids {
        tracing::info!(patient = %patient_id, "processing");
        if let Some(label) = process_patient(&classifier, &data_dir, &shortened_dir, patient_id) {
            tracing::info!(patient = %patient_id, label = %label, "classified");
            results.push((patient_id.clone(), label));
        }
    }

    let report_path = report::save_results(&results, &results_dir, config::RESULTS_FILENAME)?;
    tracing::info!(path = %report_path.display(), "workflow complete");
    Ok(())
}

/// Run one patient end to end. Returns the report label, or None for a
/// patient without notes.
///
/// Any failure along the way (load, save, inference) becomes an
/// `Error: ...` sentinel label; one broken patient never aborts the batch.
fn process_patient<C: LlmClient>(
    classifier: &NoteClassifier<C>,
    data_dir: &Path,
    shortened_dir: &Path,
    patient_id: &str,
) -> Option<String> {
    let patient_notes = match notes::load_patient_notes(data_dir, patient_id) {
        Ok(loaded) if loaded.is_empty() => {
            tracing::info!(patient = %patient_id, "no notes found, skipping");
            return None;
        }
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(patient = %patient_id, error = %e, "failed to load notes");
            return Some(format!("Error: {e}"));
        }
    };

    let condensed = pipeline::condense_patient_notes(&patient_notes);

    if let Err(e) = report::save_shortened_note(patient_id, &condensed, shortened_dir) {
        tracing::error!(patient = %patient_id, error = %e, "failed to save condensed note");
        return Some(format!("Error: {e}"));
    }

    match classifier.classify(&condensed) {
        Ok(label) => Some(label.to_string()),
        Err(e) => {
            tracing::error!(patient = %patient_id, error = %e, "classification failed");
            Some(format!("Error: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use condensa::ollama::GenerationOptions;

    struct MockLlm {
        reply: Result<&'static str, ()>,
    }

    impl LlmClient for MockLlm {
        fn generate(
            &self,
            _model: &str,
            _system: &str,
            _prompt: &str,
            _options: GenerationOptions,
        ) -> Result<String, LlmError> {
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(LlmError::Connection("http://localhost:11434".to_string())),
            }
        }

        fn list_models(&self) -> Result<Vec<String>, LlmError> {
            Ok(vec!["mock".to_string()])
        }
    }

    fn classifier(reply: Result<&'static str, ()>) -> NoteClassifier<MockLlm> {
        NoteClassifier::new(MockLlm { reply }, "mock".to_string())
    }

    fn seed_patient(data_dir: &Path, patient_id: &str, note: &str) {
        let dir = data_dir.join(patient_id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("note_01.txt"), note).unwrap();
    }

    #[test]
    fn happy_path_yields_the_model_label() {
        let tmp = tempfile::tempdir().unwrap();
        seed_patient(tmp.path(), "patient_001", "Nodule stable. Blood Count: 500.");

        let label = process_patient(
            &classifier(Ok("No Follow-up")),
            tmp.path(),
            &tmp.path().join("shortened"),
            "patient_001",
        );
        assert_eq!(label.as_deref(), Some("No Follow-up"));
        assert!(tmp.path().join("shortened/patient_001_shortened.txt").exists());
    }

    #[test]
    fn patient_without_notes_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("patient_001")).unwrap();

        let label = process_patient(
            &classifier(Ok("No Follow-up")),
            tmp.path(),
            &tmp.path().join("shortened"),
            "patient_001",
        );
        assert_eq!(label, None);
    }

    #[test]
    fn save_failure_becomes_sentinel_not_abort() {
        let tmp = tempfile::tempdir().unwrap();
        seed_patient(tmp.path(), "patient_001", "Nodule stable.");
        // A plain file where the condensed-notes directory should go makes
        // the save fail for this patient.
        let blocked = tmp.path().join("shortened");
        fs::write(&blocked, "in the way").unwrap();

        let label = process_patient(&classifier(Ok("No Follow-up")), tmp.path(), &blocked, "patient_001");
        assert!(
            label.as_deref().is_some_and(|l| l.starts_with("Error:")),
            "got: {label:?}"
        );
    }

    #[test]
    fn inference_failure_becomes_sentinel() {
        let tmp = tempfile::tempdir().unwrap();
        seed_patient(tmp.path(), "patient_001", "Nodule stable.");

        let label = process_patient(
            &classifier(Err(())),
            tmp.path(),
            &tmp.path().join("shortened"),
            "patient_001",
        );
        assert!(label.as_deref().is_some_and(|l| l.starts_with("Error:")));
    }

    #[test]
    fn missing_patient_dir_becomes_sentinel() {
        let tmp = tempfile::tempdir().unwrap();
        let label = process_patient(
            &classifier(Ok("No Follow-up")),
            tmp.path(),
            &tmp.path().join("shortened"),
            "patient_404",
        );
        assert!(label.as_deref().is_some_and(|l| l.starts_with("Error:")));
    }
}

use std::env;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Condensa";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the classification report inside the results directory.
pub const RESULTS_FILENAME: &str = "follow_up_results.txt";

/// Request timeout for local LLM inference.
pub const OLLAMA_TIMEOUT_SECS: u64 = 300;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info".to_string()
}

/// Directory holding one subdirectory of note files per patient.
/// Override with CONDENSA_DATA_DIR.
pub fn data_dir() -> PathBuf {
    env::var_os("CONDENSA_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Directory the report and condensed notes are written to.
/// Override with CONDENSA_RESULTS_DIR.
pub fn results_dir() -> PathBuf {
    env::var_os("CONDENSA_RESULTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results"))
}

/// Directory for the per-patient condensed note artifacts.
pub fn shortened_notes_dir() -> PathBuf {
    results_dir().join("shortened_notes")
}

/// Base URL of the local Ollama instance.
/// Override with CONDENSA_OLLAMA_URL.
pub fn ollama_base_url() -> String {
    env::var("CONDENSA_OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortened_notes_dir_under_results() {
        let shortened = shortened_notes_dir();
        assert!(shortened.starts_with(results_dir()));
        assert!(shortened.ends_with("shortened_notes"));
    }

    #[test]
    fn app_name_is_condensa() {
        assert_eq!(APP_NAME, "Condensa");
    }

    #[test]
    fn results_filename_is_stable() {
        // The display layer greps for this file by name.
        assert_eq!(RESULTS_FILENAME, "follow_up_results.txt");
    }
}

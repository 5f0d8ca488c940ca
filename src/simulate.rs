//! Synthetic patient data generation.
//!
//! Fills the data directory with LLM-generated clinical notes for a fixed
//! roster of patients, 2 to 5 notes each. The prompt nudges the model to
//! repeat phrases and lab results across a patient's notes so the
//! deduplication and aggregation stages have something to work on. When
//! generation fails the note is written with placeholder content instead,
//! so a partially reachable model never aborts the whole run.

use std::fs;
use std::path::Path;

use rand::Rng;
use thiserror::Error;

use crate::ollama::{GenerationOptions, LlmClient};

#[derive(Debug, Error)]
pub enum SimulateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Roster entry for one simulated patient.
pub struct SimulatedPatient {
    pub id: &'static str,
    pub name: &'static str,
    pub dob: &'static str,
    pub physician: &'static str,
}

/// Fixed simulation roster; names and DOBs exist to exercise the
/// generalization rules downstream.
pub const PATIENT_ROSTER: &[SimulatedPatient] = &[
    SimulatedPatient {
        id: "patient_001",
        name: "John Doe",
        dob: "1985-03-15",
        physician: "Smith",
    },
    SimulatedPatient {
        id: "patient_002",
        name: "James Luis",
        dob: "1978-11-22",
        physician: "Jones",
    },
    SimulatedPatient {
        id: "patient_003",
        name: "Ben Don",
        dob: "1992-07-01",
        physician: "Williams",
    },
];

const SIMULATION_SYSTEM_PROMPT: &str = "You are a medical professional writing a concise \
clinical note. Ensure there is some variation in content but also some common medical \
phrases and lab results across notes for the same patient to simulate real-world scenarios.";

/// Higher temperature than triage: the notes should vary.
const SIMULATION_OPTIONS: GenerationOptions = GenerationOptions {
    temperature: 0.7,
    num_predict: 250,
};

fn build_note_prompt(patient: &SimulatedPatient) -> String {
    format!(
        "Generate a clinical note for Patient {name} (DOB: {dob}) with lung nodule, \
         seen by Dr. {physician}.\n\
         The note should include:\n\
         - Patient name: {name}\n\
         - Date of Birth: {dob}\n\
         - Visited Physician: Dr. {physician}\n\
         - Date:\n\
         - Chief Complaint:\n\
         - History of Present Illness (HPI):\n\
         - Physical Examination Findings:\n\
         - Lab Results: (e.g., Blood Count: 500, Hemoglobin: 12.5, Glucose: 100)\n\
         - Assessment:\n\
         - Plan:\n\
         - Next visit:\n\n\
         Clinical Note:",
        name = patient.name,
        dob = patient.dob,
        physician = patient.physician,
    )
}

fn placeholder_note(patient_id: &str, note_id: &str) -> String {
    format!("Placeholder clinical note for {patient_id}, {note_id}. LLM generation failed.")
}

/// Generate note files for the whole roster under `data_dir`.
///
/// Layout: `data/<patient_id>/note_NN.txt`. Each patient gets a random
/// number of notes between 2 and 5.
pub fn create_simulated_data(
    client: &impl LlmClient,
    model: &str,
    data_dir: &Path,
) -> Result<(), SimulateError> {
    fs::create_dir_all(data_dir)?;
    let mut rng = rand::thread_rng();

    for patient in PATIENT_ROSTER {
        let patient_dir = data_dir.join(patient.id);
        fs::create_dir_all(&patient_dir)?;

        let note_count = rng.gen_range(2..=5);
        tracing::info!(patient = patient.id, notes = note_count, "generating notes");

        for note_index in 1..=note_count {
            let note_id = format!("note_{note_index:02}.txt");
            let prompt = build_note_prompt(patient);

            let content = match client.generate(
                model,
                SIMULATION_SYSTEM_PROMPT,
                &prompt,
                SIMULATION_OPTIONS,
            ) {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    tracing::error!(
                        patient = patient.id,
                        note = %note_id,
                        error = %e,
                        "note generation failed, writing placeholder"
                    );
                    placeholder_note(patient.id, &note_id)
                }
            };

            fs::write(patient_dir.join(&note_id), content)?;
        }
    }

    tracing::info!("simulated data creation complete");
    Ok(())
}

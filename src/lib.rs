//! Condensa: local clinical note condensation and follow-up triage.
//!
//! A patient's free-text notes are condensed into one deduplicated,
//! de-identified, lab-aggregated document ([`pipeline`]), which a local LLM
//! then classifies as needing follow-up or not ([`triage`]). Everything
//! runs on the machine; the only network hop is to a local Ollama
//! instance.

pub mod config;
pub mod notes;
pub mod ollama;
pub mod pipeline;
pub mod report;
pub mod simulate;
pub mod triage;

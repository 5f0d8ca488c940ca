//! Note preprocessing pipeline.
//!
//! Turns a patient's ordered list of raw clinical notes into a single
//! condensed document: sensitive tokens generalized, repeated sentences
//! removed, lab values pulled out of the narrative and aggregated into one
//! trailing summary line.
//!
//! Every stage is a total function over strings; the pipeline has no error
//! type. Empty input produces an empty document, never a failure.

pub mod compose;
pub mod dedup;
pub mod generalize;
pub mod labs;
pub mod sentence;

pub use compose::{cleanup_text, condense_patient_notes};
pub use dedup::{deduplicate_notes, SentenceSet};
pub use generalize::generalize_sensitive_info;
pub use labs::{extract_lab_results, lab_result_pattern, LabExtraction, LabSeries, LabTable};
pub use sentence::split_sentences;

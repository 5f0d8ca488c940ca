//! Follow-up triage of a condensed clinical note.
//!
//! The condensed document goes to a small local model with a few-shot
//! prompt; the model answers "Needs Follow-up" or "No Follow-up" and the
//! answer is parsed back with forgiving regexes. The classifier owns no
//! transport details; any [`LlmClient`] will do.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::ollama::{self, GenerationOptions, LlmClient, LlmError};

pub const TRIAGE_SYSTEM_PROMPT: &str = "You are a clinical expert in lung nodule. \
Analyze the following clinical notes and determine if the patient needs a follow-up \
for lung nodule only. Respond concisely with either 'Needs Follow-up' or 'No Follow-up'.";

/// Low temperature, short answer: this is a binary decision, not prose.
const TRIAGE_OPTIONS: GenerationOptions = GenerationOptions {
    temperature: 0.1,
    num_predict: 20,
};

static NEEDS_FOLLOW_UP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)needs\s+follow-up").unwrap());
static NO_FOLLOW_UP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)no\s+follow-up").unwrap());

/// Outcome of classifying one patient's condensed note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUpLabel {
    NeedsFollowUp,
    NoFollowUp,
    /// The model answered something that matches neither label; the raw
    /// response is kept for the report.
    Uncertain(String),
}

impl fmt::Display for FollowUpLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeedsFollowUp => write!(f, "Needs Follow-up"),
            Self::NoFollowUp => write!(f, "No Follow-up"),
            Self::Uncertain(raw) => write!(f, "Uncertain (model response: '{raw}')"),
        }
    }
}

/// Parse the model's free-text answer into a label.
///
/// "Needs" wins over "No" when both appear, since a hedging answer like
/// "needs follow-up, not no follow-up" should err toward review.
pub fn parse_label(response: &str) -> FollowUpLabel {
    let cleaned = ollama::strip_reasoning_markers(response);
    if NEEDS_FOLLOW_UP.is_match(&cleaned) {
        FollowUpLabel::NeedsFollowUp
    } else if NO_FOLLOW_UP.is_match(&cleaned) {
        FollowUpLabel::NoFollowUp
    } else {
        tracing::warn!(response = %cleaned, "ambiguous triage response");
        FollowUpLabel::Uncertain(cleaned)
    }
}

/// Build the few-shot triage prompt around one condensed note.
pub fn build_triage_prompt(note: &str) -> String {
    format!(
        "Example 1:\n\
         Clinical Note: Patient presented with a 5mm stable lung nodule, no changes from previous scans. No new symptoms.\n\
         Classification: No Follow-up\n\n\
         Example 2:\n\
         Clinical Note: New 1.2cm lung nodule identified. Patient reports recent weight loss and persistent cough. Biopsy recommended.\n\
         Classification: Needs Follow-up\n\n\
         Example 3:\n\
         Clinical Note: Patient has a history of smoking. A 8mm lung nodule was found, which has slightly increased in size since the last imaging. Further imaging in 3 months is advised.\n\
         Classification: Needs Follow-up\n\n\
         Clinical Note: {note}\n\n\
         Classification:"
    )
}

/// Binary follow-up classifier over an injected LLM client.
pub struct NoteClassifier<C: LlmClient> {
    client: C,
    model: String,
}

impl<C: LlmClient> NoteClassifier<C> {
    pub fn new(client: C, model: String) -> Self {
        Self { client, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Classify one condensed note. Transport failures bubble up; the
    /// caller decides whether to abort or record a sentinel label.
    pub fn classify(&self, note: &str) -> Result<FollowUpLabel, LlmError> {
        let prompt = build_triage_prompt(note);
        let response =
            self.client
                .generate(&self.model, TRIAGE_SYSTEM_PROMPT, &prompt, TRIAGE_OPTIONS)?;
        Ok(parse_label(&response))
    }
}

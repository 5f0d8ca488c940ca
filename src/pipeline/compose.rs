//! Final document assembly.
//!
//! Drives the whole pipeline for one patient: generalize each note,
//! deduplicate across notes, aggregate lab results, strip the raw lab
//! mentions out of the narrative, tidy the remaining text and append the
//! lab summary.

use std::sync::LazyLock;

use regex::Regex;

use super::{dedup, generalize, labs};

static BLANK_LINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static HYPHEN_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-\s*").unwrap());
static COMMA_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",,+").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());
static SPACE_BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+([,.;])").unwrap());

/// Textual cleanup left behind by sentence surgery, applied in a fixed
/// order: hyphen spacing, comma runs, whitespace runs, whitespace before
/// `,` `.` `;`. Idempotent: running it on its own output changes nothing.
pub fn cleanup_text(text: &str) -> String {
    let text = HYPHEN_SPACING.replace_all(text, " - ");
    let text = COMMA_RUN.replace_all(&text, ",");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    // Dropping the whitespace out of ", ," butts the commas together, so
    // comma runs need one more collapse to keep the output a fixed point.
    let text = COMMA_RUN.replace_all(&text, ",");
    text.trim().to_string()
}

/// Produce the condensed document for one patient's ordered notes.
///
/// Narrative first (deduplicated, de-labeled, cleaned), then a blank line
/// and the aggregated lab summary when one exists. Empty input yields an
/// empty string; a patient whose notes contain nothing but lab values gets
/// a summary-only document. Never fails.
pub fn condense_patient_notes(notes: &[String]) -> String {
    let generalized: Vec<String> = notes
        .iter()
        .map(|note| generalize::generalize_sensitive_info(note))
        .collect();

    let narrative = dedup::deduplicate_notes(&generalized);

    // Labs come from the generalized notes, not the deduplicated narrative:
    // the same mention in three notes is three observations even though the
    // narrative keeps a single sentence copy.
    let extraction = labs::extract_lab_results(&generalized);

    let narrative = if extraction.table.is_empty() {
        narrative
    } else {
        let stripped = labs::lab_result_pattern().replace_all(&narrative, "");
        BLANK_LINE_RUN
            .replace_all(&stripped, "\n\n")
            .trim()
            .to_string()
    };

    let mut document = cleanup_text(&narrative);

    if !extraction.summary.is_empty() {
        if document.is_empty() {
            document = extraction.summary;
        } else {
            document.push_str("\n\n");
            document.push_str(&extraction.summary);
        }
    }

    tracing::debug!(len = document.len(), "condensed patient notes");
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::labs::lab_result_pattern;

    fn notes(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    /// Narrative part of a document, with the trailing lab summary cut off.
    fn narrative_of(document: &str) -> &str {
        match document.find("\n\nLab Results:") {
            Some(idx) => &document[..idx],
            None => document,
        }
    }

    #[test]
    fn cleanup_normalizes_hyphen_spacing() {
        assert_eq!(cleanup_text("follow-up in 3 months"), "follow - up in 3 months");
        assert_eq!(cleanup_text("a  -  b"), "a - b");
    }

    #[test]
    fn cleanup_collapses_comma_runs() {
        assert_eq!(cleanup_text("fever,,, cough"), "fever, cough");
    }

    #[test]
    fn cleanup_collapses_whitespace_runs() {
        assert_eq!(cleanup_text("a   b\t\tc"), "a b c");
    }

    #[test]
    fn cleanup_removes_whitespace_before_punctuation() {
        assert_eq!(cleanup_text("rest , hydrate ; recheck ."), "rest, hydrate; recheck.");
    }

    #[test]
    fn cleanup_collapses_whitespace_separated_comma_runs() {
        assert_eq!(cleanup_text("fever , , cough"), "fever, cough");
        assert_eq!(cleanup_text("fever , ,, cough"), "fever, cough");
    }

    #[test]
    fn cleanup_is_idempotent() {
        let inputs = [
            "Patient stable ,, advised  rest - and fluids .",
            "a - b, c. d ; e",
            "  leading and trailing  ",
            // Whitespace-separated comma runs only become adjacent once
            // the punctuation rule has run.
            "fever , , cough",
            "a , , . b",
        ];
        for input in inputs {
            let once = cleanup_text(input);
            let twice = cleanup_text(&once);
            assert_eq!(once, twice, "not a fixed point for {input:?}");
        }
    }

    #[test]
    fn composer_output_is_a_cleanup_fixed_point() {
        let document = condense_patient_notes(&notes(&[
            "Patient presented with symptoms. Vital signs stable. Blood Count: 500.",
            "Vital signs stable. Advised rest. Hemoglobin: 12.5.",
        ]));
        let narrative = narrative_of(&document);
        assert_eq!(cleanup_text(narrative), narrative);
    }

    #[test]
    fn composer_fixed_point_survives_spaced_comma_runs() {
        let document = condense_patient_notes(&notes(&[
            "Patient reports fever , , cough. Vitals stable.",
        ]));
        assert_eq!(cleanup_text(&document), document);
        assert!(document.contains("fever, cough"), "got: {document}");
    }

    #[test]
    fn deduplicates_across_notes_in_first_seen_order() {
        let document = condense_patient_notes(&notes(&["A. B.", "B. C."]));
        assert_eq!(document, "A.\nB.\nC.");
    }

    #[test]
    fn lab_values_aggregate_in_encounter_order() {
        let document =
            condense_patient_notes(&notes(&["Blood Count: 300.", "Blood Count: 400."]));
        assert!(
            document.contains("Blood Count: 300, 400"),
            "got: {document}"
        );
    }

    #[test]
    fn narrative_contains_no_lab_mentions() {
        let document = condense_patient_notes(&notes(&[
            "Patient presented with symptoms. Blood Count: 500. Discussed options.",
            "Glucose: 100. No acute distress noted.",
        ]));
        let narrative = narrative_of(&document);
        assert!(
            !lab_result_pattern().is_match(narrative),
            "lab mention left in narrative: {narrative}"
        );
        assert!(document.ends_with("Lab Results: Blood Count: 500; Glucose: 100"));
    }

    #[test]
    fn generalization_applies_before_everything_else() {
        let document = condense_patient_notes(&notes(&[
            "Patient John Doe was seen by Dr. Smith on 3/14/2024. Hemoglobin: 11.0.",
        ]));
        assert!(!document.contains("John"));
        assert!(!document.contains("Smith"));
        assert!(document.contains("[PATIENT_NAME]"));
        assert!(document.contains("Hemoglobin: 11.0"));
    }

    #[test]
    fn labs_count_per_note_even_when_sentences_deduplicate() {
        // The identical sentence survives once in the narrative, but both
        // observations survive in the aggregate.
        let document = condense_patient_notes(&notes(&[
            "Vitals stable. Sodium: 140.",
            "Vitals stable. Sodium: 140.",
        ]));
        assert!(document.contains("Sodium: 140, 140"), "got: {document}");
        let narrative = narrative_of(&document);
        assert_eq!(narrative.matches("Vitals stable.").count(), 1);
    }

    #[test]
    fn empty_note_list_yields_empty_document() {
        assert_eq!(condense_patient_notes(&[]), "");
        assert_eq!(condense_patient_notes(&notes(&["", "  "])), "");
    }

    #[test]
    fn lab_only_notes_yield_summary_only_document() {
        let document = condense_patient_notes(&notes(&["Glucose: 95"]));
        assert_eq!(document, "Lab Results: Glucose: 95");
    }

    #[test]
    fn deterministic_across_runs() {
        let input = notes(&[
            "Patient presented with symptoms. Vital signs stable. Blood Count: 500.",
            "Vital signs stable. Advised rest. Hemoglobin: 12.5.",
            "Patient presented with symptoms. Chief complaint: fever. Glucose: 100.",
        ]);
        let first = condense_patient_notes(&input);
        for _ in 0..5 {
            assert_eq!(condense_patient_notes(&input), first);
        }
    }
}

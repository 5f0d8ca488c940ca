//! Sentence-level deduplication across a patient's notes.

use std::collections::HashSet;

use super::sentence::split_sentences;

/// Insertion-ordered set of trimmed sentences.
///
/// A plain ordered map keyed by sentence would do the same job; keeping the
/// order vector and the membership set separate makes the two roles
/// explicit. Comparison is literal string equality, case-sensitive,
/// whitespace-normalized at the trim boundaries only.
#[derive(Debug, Default)]
pub struct SentenceSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl SentenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sentence unless its trimmed form is empty or already
    /// present. Returns true when the sentence was appended.
    pub fn insert(&mut self, sentence: &str) -> bool {
        let trimmed = sentence.trim();
        if trimmed.is_empty() || self.seen.contains(trimmed) {
            return false;
        }
        self.seen.insert(trimmed.to_string());
        self.ordered.push(trimmed.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Unique sentences in first-seen order, newline-joined.
    pub fn join(&self) -> String {
        self.ordered.join("\n")
    }
}

/// Merge the sentences of all notes, in note order then sentence order,
/// keeping only the first occurrence of each trimmed sentence.
///
/// Reordering the input changes which note contributes the surviving copy
/// of a shared sentence, but since comparison is literal equality the kept
/// text is the same either way.
pub fn deduplicate_notes(notes: &[String]) -> String {
    let mut unique = SentenceSet::new();
    for note in notes {
        for sentence in split_sentences(note) {
            unique.insert(&sentence);
        }
    }

    tracing::debug!(
        notes = notes.len(),
        unique_sentences = unique.len(),
        "deduplicated notes"
    );

    unique.join()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn keeps_first_seen_order_across_notes() {
        let out = deduplicate_notes(&notes(&["A. B.", "B. C."]));
        assert_eq!(out, "A.\nB.\nC.");
    }

    #[test]
    fn exact_repeats_within_one_note_collapse() {
        let out = deduplicate_notes(&notes(&["Stable. Stable. Improving."]));
        assert_eq!(out, "Stable.\nImproving.");
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let out = deduplicate_notes(&notes(&["stable. Stable."]));
        assert_eq!(out, "stable.\nStable.");
    }

    #[test]
    fn reordered_input_keeps_same_sentences() {
        let forward = deduplicate_notes(&notes(&["A. B.", "B. C."]));
        let backward = deduplicate_notes(&notes(&["B. C.", "A. B."]));
        let mut f: Vec<&str> = forward.lines().collect();
        let mut b: Vec<&str> = backward.lines().collect();
        f.sort_unstable();
        b.sort_unstable();
        assert_eq!(f, b);
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(deduplicate_notes(&[]), "");
        assert_eq!(deduplicate_notes(&notes(&["", "   "])), "");
    }

    #[test]
    fn sentence_set_rejects_duplicates_and_blanks() {
        let mut set = SentenceSet::new();
        assert!(set.insert("  One.  "));
        assert!(!set.insert("One."));
        assert!(!set.insert("   "));
        assert!(set.insert("Two."));
        assert_eq!(set.join(), "One.\nTwo.");
        assert_eq!(set.len(), 2);
    }
}

//! Lab-result extraction and aggregation.
//!
//! Scans notes for mentions of a fixed, closed vocabulary of lab tests
//! ("Blood Count: 300", "hemoglobin: 12.5", ...) and aggregates every value
//! under its normalized test name, in document scan order. Values stay
//! literal strings; they round-trip into the summary line exactly as they
//! were written.

use std::sync::LazyLock;

use regex::Regex;

/// One lab test mention: closed vocabulary name, then `:`, optional
/// whitespace, then an integer or decimal value.
///
/// The composer reuses this exact pattern to strip mentions out of the
/// narrative, so the substrings that fed the aggregate are precisely the
/// ones removed.
static LAB_RESULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(blood count|hemoglobin|glucose|creatinine|cholesterol|sodium|potassium|wbc|rbc|platelets|hba1c|tsh|hematocrit|white blood cell count)\s*:\s*(\d+(?:\.\d+)?)",
    )
    .unwrap()
});

/// The compiled lab mention pattern shared by extraction and stripping.
pub fn lab_result_pattern() -> &'static Regex {
    &LAB_RESULT_PATTERN
}

/// Ordered series of values observed for one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabSeries {
    /// Title-cased test name, e.g. "Blood Count".
    pub name: String,
    /// Literal value strings in encounter order, duplicates preserved.
    pub values: Vec<String>,
}

/// Mapping from normalized test name to its ordered value series.
/// Iteration order is first-seen order; the vocabulary is small enough
/// that linear lookup is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabTable {
    entries: Vec<LabSeries>,
}

impl LabTable {
    fn push(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(series) => series.values.push(value),
            None => self.entries.push(LabSeries {
                name,
                values: vec![value],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabSeries> {
        self.entries.iter()
    }

    /// Values recorded for a test, if any.
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.values.as_slice())
    }

    /// One-line summary: `Lab Results: Name: v1, v2; Other: v3`.
    /// Empty string when no observation was recorded.
    pub fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}: {}", e.name, e.values.join(", ")))
            .collect();
        format!("Lab Results: {}", parts.join("; "))
    }
}

/// Result of scanning a set of notes for lab mentions.
#[derive(Debug, Clone)]
pub struct LabExtraction {
    /// Formatted summary line, empty when nothing matched.
    pub summary: String,
    pub table: LabTable,
}

/// Scan every note in order and aggregate all lab mentions.
pub fn extract_lab_results(notes: &[String]) -> LabExtraction {
    let mut table = LabTable::default();

    for note in notes {
        for capture in LAB_RESULT_PATTERN.captures_iter(note) {
            let name = title_case(capture[1].trim());
            let value = capture[2].trim().to_string();
            table.push(name, value);
        }
    }

    let summary = table.format_summary();
    if summary.is_empty() {
        tracing::debug!("no lab results found in notes");
    } else {
        tracing::debug!(summary = %summary, "aggregated lab results");
    }

    LabExtraction { summary, table }
}

/// Title-case a test name: any letter that follows a non-letter starts a
/// new word and is uppercased, everything else is lowercased. Note that a
/// digit ends a word, so "hba1c" becomes "Hba1C".
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

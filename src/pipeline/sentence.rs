/// Split a block of text into trimmed sentence-like units.
///
/// A boundary sits immediately after `.`, `!` or `?` when the next character
/// is whitespace; the terminal character stays attached to the preceding
/// sentence. Empty and whitespace-only segments are dropped.
///
/// This is a heuristic: it knows nothing about abbreviations and will split
/// after the period of a lab value like "Count: 300. Hemoglobin". Accepted
/// policy, since lab values are re-extracted separately with a stricter
/// pattern.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    let mut chars = text.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_idx, next)) = chars.peek() {
                if next.is_whitespace() {
                    let segment = text[start..next_idx].trim();
                    if !segment.is_empty() {
                        sentences.push(segment.to_string());
                    }
                    start = next_idx;
                }
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

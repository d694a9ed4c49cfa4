use std::sync::LazyLock;

use regex::Regex;

use crate::types::Word;

static EDGE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{P}\p{S}\s]+|[\p{P}\p{S}\s]+$").expect("valid edge pattern")
});

static EDGE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{P}\p{S}]+|[\p{P}\p{S}]+$").expect("valid punct pattern"));

static WORD_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z'-]+$").expect("valid word pattern"));

/// Extracts the first word of a text selection.
///
/// - Leading and trailing punctuation, symbols and whitespace are stripped
///   (Unicode-aware)
/// - Only the part before the first whitespace run is kept, with its own
///   edge punctuation stripped
/// - The result must consist of ASCII letters, `-` and `'` only
///
/// Returns the lowercased word, or `None` when the selection holds no valid word.
#[must_use]
pub fn selected_word(text: Option<&str>) -> Option<Word> {
    let text = text.filter(|t| !t.is_empty())?;
    let trimmed = EDGE_NOISE.replace_all(text, "");
    let first = trimmed.split_whitespace().next()?;
    let first = EDGE_PUNCT.replace_all(first, "");

    if WORD_SHAPE.is_match(&first) {
        Some(Word::from_sanitized(first.to_ascii_lowercase()))
    } else {
        None
    }
}

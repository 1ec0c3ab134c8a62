//! String utilities for the domain layer.

/// Characters stripped from the end of a truncated string.
const TRAILING_PUNCTUATION: &[char] = &[',', ';', ':', '.', '-', '/', '&', '–', '—'];

/// Truncate generated text to at most `max_chars` characters at a word boundary.
///
/// Text that already fits is returned trimmed and otherwise untouched. Longer
/// text is cut at `max_chars`, then backed off to the last space only if that
/// space sits at or after 60% of the cut (a long final word would otherwise
/// leave almost nothing). Trailing whitespace and punctuation are then removed.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: Vec<char> = text.chars().take(max_chars).collect();
    let min_keep = (max_chars * 3).div_ceil(5);

    let keep = cut
        .iter()
        .rposition(|c| *c == ' ')
        .filter(|&space| space >= min_keep)
        .unwrap_or(cut.len());

    let truncated: String = cut[..keep].iter().collect();
    truncated
        .trim_end_matches(|c: char| c.is_whitespace() || TRAILING_PUNCTUATION.contains(&c))
        .to_string()
}

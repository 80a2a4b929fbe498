//! Key normalization.

use unicode_normalization::UnicodeNormalization;

/// True for codepoints that decorate a title without contributing to its
/// identity: pictographs, symbols, dingbats, flags, keycaps, variation
/// selectors.
fn is_decorative(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F1E6..=0x1F1FF   // regional indicators (flags)
        | 0x1F300..=0x1FAFF // symbols & pictographs, incl. supplemental
        | 0x2600..=0x26FF   // miscellaneous symbols
        | 0x2700..=0x27BF   // dingbats
        | 0xFE00..=0xFE0F   // variation selectors
        | 0x20E3            // combining enclosing keycap
    )
}

/// Removes decorative codepoints, keeping the text.
#[must_use]
pub fn strip_decorative(input: &str) -> String {
    input.chars().filter(|c| !is_decorative(*c)).collect()
}

/// Produces the canonical comparison key for a piece of row text.
///
/// Deterministic in the input alone: decorative glyphs contribute nothing,
/// compatibility forms decompose (NFKD), whitespace runs collapse to one
/// space, surrounding whitespace is trimmed, and the result is lowercased.
/// Defined for all strings; the empty input yields the empty key.
#[must_use]
pub fn normalize_key(input: &str) -> String {
    let decomposed: String = strip_decorative(input).nfkd().collect();
    decomposed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decorative_ranges_are_stripped() {
        assert_eq!(strip_decorative("🔥hot"), "hot");
        assert_eq!(strip_decorative("1\u{FE0F}\u{20E3} one"), "1 one");
        assert_eq!(strip_decorative("\u{1F1E7}\u{1F1F7} brazil"), " brazil");
        assert_eq!(strip_decorative("✂ cut ✈"), " cut ");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(strip_decorative("plain text"), "plain text");
    }
}

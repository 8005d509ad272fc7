//! Meta description truncation.

/// Marker appended when a description is cut.
pub const ELLIPSIS: char = '…';

/// Truncate `s` to at most `cap` characters, cutting at the last whitespace
/// boundary and appending an ellipsis marker.
///
/// Counts characters, not bytes, so multi-byte labels never split. A string
/// of exactly `cap` characters is returned unchanged (modulo surrounding
/// whitespace, which is always trimmed).
pub fn truncate_description(s: &str, cap: usize) -> String {
    let trimmed = s.trim();
    if trimmed.chars().count() <= cap {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(cap.saturating_sub(1)).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) => cut[..idx].trim_end(),
        None => cut.as_str(),
    };
    format!("{cut}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const CAP: usize = 175;

    #[test]
    fn short_string_unchanged() {
        assert_eq!(truncate_description("A short definition.", CAP), "A short definition.");
    }

    #[test]
    fn exactly_cap_length_unchanged() {
        let s = "x".repeat(CAP);
        assert_eq!(truncate_description(&s, CAP), s);
    }

    #[test]
    fn long_string_cut_at_word_boundary() {
        let s = "word ".repeat(60);
        let out = truncate_description(&s, CAP);
        assert!(out.chars().count() <= CAP);
        assert!(out.ends_with(ELLIPSIS));
        // The character before the marker is the end of a whole word.
        let before: String = out.chars().take(out.chars().count() - 1).collect();
        assert!(before.ends_with("word"), "cut mid-word: {out:?}");
    }

    #[test]
    fn three_hundred_chars_fits_cap() {
        let s = "a".repeat(149) + " " + &"b".repeat(150);
        assert_eq!(s.chars().count(), 300);
        let out = truncate_description(&s, CAP);
        assert!(out.chars().count() <= CAP + 1);
        assert!(out.ends_with(ELLIPSIS));
        assert_eq!(out, "a".repeat(149) + "…");
    }

    #[test]
    fn no_space_falls_back_to_hard_cut() {
        let s = "x".repeat(300);
        let out = truncate_description(&s, CAP);
        assert_eq!(out.chars().count(), CAP);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[rstest]
    #[case("  padded  ", "padded")]
    #[case("", "")]
    fn whitespace_is_trimmed(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(truncate_description(input, CAP), expected);
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        let s = "é".repeat(300);
        let out = truncate_description(&s, CAP);
        assert_eq!(out.chars().count(), CAP);
    }
}

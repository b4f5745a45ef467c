//! Input sanitation
//!
//! User text is sanitized before anything downstream sees it: control
//! characters stripped, then hard-truncated to a fixed ceiling. Truncation is
//! not an error; it bounds downstream cost under adversarial input.

use tracing::warn;

/// Hard ceiling on user input length, in characters.
pub const MAX_INPUT_CHARS: usize = 500;

/// Strip control characters (anything below U+0020) and truncate to
/// [`MAX_INPUT_CHARS`].
pub fn sanitize_input(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| *c as u32 >= 0x20).collect();

    if cleaned.chars().count() > MAX_INPUT_CHARS {
        warn!(
            original_len = cleaned.len(),
            "input truncated to {MAX_INPUT_CHARS} characters"
        );
        cleaned.chars().take(MAX_INPUT_CHARS).collect()
    } else {
        cleaned
    }
}

/// Case-insensitive check whether any keyword occurs as a substring.
pub fn contains_any_keyword(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|k| lowered.contains(&k.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize_input("he\u{0007}llo\nworld\t!"), "helloworld!");
    }

    #[test]
    fn test_truncates_to_ceiling() {
        let long = "a".repeat(600);
        let out = sanitize_input(&long);
        assert_eq!(out.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_truncation_is_char_safe() {
        let long = "ñ".repeat(501);
        let out = sanitize_input(&long);
        assert_eq!(out.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_keyword_check_is_case_insensitive() {
        assert!(contains_any_keyword("Please BOOK a table", &["book"]));
        assert!(!contains_any_keyword("nothing here", &["book"]));
    }
}

//! Text normalization for conversational corpus lines.
//!
//! Corpus records carry metadata fields separated by `+++$+++`; the spoken
//! text sits in the fifth field. Cleaning lowercases the text and expands a
//! fixed table of English contractions, which is all the downstream
//! consumers of this corpus expect.

/// Contraction replacements, applied in order after lowercasing.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("i'm", "i am"),
    ("'s", " is"),
    ("'ll", " will"),
    ("'ve", " have"),
    ("'re", " are"),
    ("'d", " would"),
    ("n't", " not"),
    ("'bout", "about"),
    ("'til", "until"),
    ("'cause", "because"),
];

/// Field separator of a corpus record.
const FIELD_SEPARATOR: &str = "+++$+++";

/// Zero-based index of the spoken-text field in a corpus record.
const UTTERANCE_FIELD: usize = 4;

/// Lowercases a line and expands the contraction table.
pub fn normalize(line: &str) -> String {
    let mut text = line.to_lowercase();
    for (pattern, replacement) in CONTRACTIONS {
        if text.contains(pattern) {
            text = text.replace(pattern, replacement);
        }
    }
    text
}

/// Returns the trimmed spoken-text field of a corpus record, or `None` when
/// the record does not carry all five fields.
pub fn utterance(line: &str) -> Option<&str> {
    line.split(FIELD_SEPARATOR)
        .nth(UTTERANCE_FIELD)
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_expands_contractions() {
        assert_eq!(
            normalize("I'm sure you'll love it"),
            "i am sure you will love it"
        );
        assert_eq!(normalize("They don't care"), "they do not care");
        assert_eq!(normalize("It's fine"), "it is fine");
        assert_eq!(normalize("She'd know 'bout that"), "she would know about that");
    }

    #[test]
    fn normalize_matches_capitalized_contractions() {
        // Lowercasing happens before the table is applied.
        assert_eq!(normalize("I'M HERE"), "i am here");
    }

    #[test]
    fn normalize_leaves_plain_text_alone() {
        assert_eq!(normalize("they do not"), "they do not");
    }

    #[test]
    fn utterance_extracts_the_fifth_field() {
        let line = "L1045 +++$+++ u0 +++$+++ m0 +++$+++ BIANCA +++$+++ They do not!";
        assert_eq!(utterance(line), Some("They do not!"));
    }

    #[test]
    fn utterance_rejects_short_records() {
        assert_eq!(utterance("no separators here"), None);
        assert_eq!(utterance("a +++$+++ b +++$+++ c"), None);
    }

    #[test]
    fn utterance_trims_surrounding_whitespace() {
        let line = "L1 +++$+++ u2 +++$+++ m0 +++$+++ CAMERON +++$+++   hello.  ";
        assert_eq!(utterance(line), Some("hello."));
    }
}

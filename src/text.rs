//! Text normalization (C2).
//!
//! Pure, total, idempotent: Unicode NFKC, Arabic diacritic/tatweel
//! stripping, alif folding, run collapsing, character-class filtering,
//! whitespace collapsing.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static RUN_COLLAPSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)\1{2,}").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const ARABIC_DIACRITICS: [char; 13] = [
    '\u{0610}', '\u{0611}', '\u{0612}', '\u{0613}', '\u{0614}', '\u{0615}', '\u{0616}', '\u{0617}',
    '\u{0618}', '\u{0619}', '\u{061A}', '\u{064B}', '\u{0670}',
];
const ARABIC_TATWEEL: char = '\u{0640}';

/// Normalizes `text` per the pipeline's fixed rule order. Total over
/// arbitrary input; `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let nfkc: String = text.nfkc().collect();

    let stripped: String = nfkc
        .chars()
        .filter(|c| !ARABIC_DIACRITICS.contains(c) && *c != ARABIC_TATWEEL)
        .collect();

    let folded: String = stripped
        .chars()
        .map(|c| match c {
            'أ' | 'إ' | 'آ' => 'ا',
            other => other,
        })
        .collect();

    let collapsed = RUN_COLLAPSE.replace_all(&folded, "$1$1").to_string();

    let allowed: String = collapsed.chars().filter(|c| is_allowed_char(*c)).collect();

    WHITESPACE_RUN.replace_all(&allowed, " ").trim().to_string()
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || is_arabic(c)
        || is_emoji(c)
        || matches!(c, '.' | ',' | '!' | '?' | ':' | ';' | '-' | '\'' | '"' | '(' | ')' | '،' | '؟' | '؛')
}

fn is_arabic(c: char) -> bool {
    matches!(c as u32, 0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF)
}

fn is_emoji(c: char) -> bool {
    matches!(c as u32, 0x1F300..=0x1FAFF | 0x2600..=0x27BF)
}

/// Joins the three text fields in the fixed order required by the
/// processing document (`enjoy_most`, `improve_product`,
/// `additional_feedback`), normalizing each and dropping empties.
pub fn concatenate_fields(enjoy_most: &str, improve_product: &str, additional_feedback: &str) -> String {
    [enjoy_most, improve_product, additional_feedback]
        .into_iter()
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_arabic_diacritics() {
        assert_eq!(normalize("مُمتاز"), "ممتاز");
    }

    #[test]
    fn folds_alif_variants() {
        assert_eq!(normalize("أحمد إبراهيم آدم"), "احمد ابراهيم ادم");
    }

    #[test]
    fn collapses_long_runs_to_two() {
        assert_eq!(normalize("جميلllllll"), "جميلll");
    }

    #[test]
    fn drops_disallowed_characters() {
        assert_eq!(normalize("great!!! @@@ ###"), "great!!!");
    }

    #[test]
    fn is_idempotent() {
        let input = "مُمتاززززز!!! @@@ greaaaat";
        let once = normalize(input);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn concatenation_drops_empty_fields_and_preserves_order() {
        let joined = concatenate_fields("good food", "", "fast service");
        assert_eq!(joined, "good food fast service");
    }

    #[test]
    fn concatenation_of_all_empty_is_empty() {
        assert_eq!(concatenate_fields("", "", ""), "");
    }
}

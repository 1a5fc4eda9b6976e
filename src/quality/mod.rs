//! Pure quality scoring (C3) and the gate decision that consumes it.

pub mod types;

pub use types::{
    FLAG_RATING_ONLY, GateVerdict, QualityFlag, QualityResult, QualityThresholds, QualityWeights,
    ScoresBreakdown, ToxicityStatus,
};

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static EXCESSIVE_REPETITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)\1{4,}").expect("valid regex"));
static CHAR_REPETITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)\1{3}").expect("valid regex"));

/// Scores `text` against the weighted formula in the default scoring
/// design, given the star rating and the pre-computed toxicity status.
///
/// Pure function: same inputs always produce the same [`QualityResult`].
#[tracing::instrument(skip(text, weights))]
pub fn score(
    text: &str,
    rating: u8,
    toxicity_status: ToxicityStatus,
    weights: QualityWeights,
) -> QualityResult {
    let trimmed = text.trim();

    if trimmed.chars().count() < 3 {
        return empty_text_result(rating, toxicity_status);
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let mut flags = BTreeSet::new();

    let length = score_length(&words, &mut flags);
    let diversity = score_diversity(&words, &mut flags);
    let valid_chars = score_valid_chars(trimmed, &mut flags);
    let repetition = score_repetition(trimmed, &mut flags);
    let toxicity = score_toxicity(toxicity_status, &mut flags);

    let quality_score = weights.length * length
        + weights.diversity * diversity
        + weights.valid_chars * valid_chars
        + weights.repetition * repetition
        + weights.toxicity * toxicity;

    let is_suspicious = flags.contains(types::FLAG_SUSPICIOUS_CHARS)
        || flags.contains(types::FLAG_LOW_DIVERSITY)
        || flags.contains(types::FLAG_EXCESSIVE_CHAR_REPETITION);

    QualityResult {
        quality_score,
        scores_breakdown: ScoresBreakdown {
            length,
            diversity,
            valid_chars,
            repetition,
            toxicity,
        },
        flags,
        is_suspicious,
        toxicity_status,
    }
}

fn empty_text_result(rating: u8, toxicity_status: ToxicityStatus) -> QualityResult {
    let mut flags = BTreeSet::new();
    let (base_score, mut is_suspicious): (f64, bool) = if rating > 0 {
        flags.insert(types::FLAG_RATING_ONLY.to_string());
        (0.6, false)
    } else {
        flags.insert(types::FLAG_EMPTY_CONTENT.to_string());
        (0.0, true)
    };

    let toxicity = score_toxicity(toxicity_status, &mut flags);
    is_suspicious = is_suspicious || toxicity_status != ToxicityStatus::NonToxic;

    QualityResult {
        quality_score: base_score.min(toxicity),
        scores_breakdown: ScoresBreakdown {
            length: 0.0,
            diversity: 0.0,
            valid_chars: 0.0,
            repetition: 0.0,
            toxicity,
        },
        flags,
        is_suspicious,
        toxicity_status,
    }
}

fn score_length(words: &[&str], flags: &mut BTreeSet<String>) -> f64 {
    let w = words.len();
    if w < 2 {
        flags.insert(types::FLAG_TOO_SHORT.to_string());
        0.1
    } else if w < 5 {
        flags.insert(types::FLAG_SHORT_TEXT.to_string());
        0.4
    } else if w <= 150 {
        1.0
    } else if w <= 300 {
        flags.insert(types::FLAG_LONG_TEXT.to_string());
        0.7
    } else {
        flags.insert(types::FLAG_TOO_LONG.to_string());
        0.3
    }
}

fn score_diversity(words: &[&str], flags: &mut BTreeSet<String>) -> f64 {
    let w = words.len();
    if w < 5 {
        return 0.3;
    }

    let unique: std::collections::HashSet<&str> = words.iter().copied().collect();
    let ratio = unique.len() as f64 / w as f64;

    if ratio < 0.25 {
        flags.insert(types::FLAG_LOW_DIVERSITY.to_string());
        0.2
    } else if ratio < 0.4 {
        flags.insert(types::FLAG_REPETITIVE_TEXT.to_string());
        0.5
    } else if ratio < 0.6 {
        0.75
    } else {
        1.0
    }
}

fn score_valid_chars(text: &str, flags: &mut BTreeSet<String>) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }

    let valid = text
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || is_arabic_letter(*c) || is_emoji(*c)
        })
        .count();

    let ratio = valid as f64 / total as f64;

    if ratio < 0.30 {
        flags.insert(types::FLAG_SUSPICIOUS_CHARS.to_string());
        0.2
    } else if ratio < 0.60 {
        flags.insert(types::FLAG_MIXED_CHARS.to_string());
        0.5
    } else if ratio < 0.80 {
        0.75
    } else {
        1.0
    }
}

fn score_repetition(text: &str, flags: &mut BTreeSet<String>) -> f64 {
    if EXCESSIVE_REPETITION.is_match(text) {
        flags.insert(types::FLAG_EXCESSIVE_CHAR_REPETITION.to_string());
        0.3
    } else if CHAR_REPETITION.is_match(text) {
        flags.insert(types::FLAG_CHAR_REPETITION.to_string());
        0.7
    } else {
        1.0
    }
}

fn score_toxicity(status: ToxicityStatus, flags: &mut BTreeSet<String>) -> f64 {
    match status {
        ToxicityStatus::Toxic => {
            flags.insert(types::FLAG_HIGH_TOXICITY.to_string());
            0.0
        }
        ToxicityStatus::Uncertain => {
            flags.insert(types::FLAG_UNCERTAIN_TOXICITY.to_string());
            0.5
        }
        ToxicityStatus::NonToxic => 1.0,
    }
}

fn is_arabic_letter(c: char) -> bool {
    matches!(c as u32, 0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF)
}

fn is_emoji(c: char) -> bool {
    matches!(c as u32, 0x1F300..=0x1FAFF | 0x2600..=0x27BF)
}

/// Gate decision consulted by the orchestrator after scoring. Total and
/// side-effect-free, per the design note resolving the two competing
/// decision tables found upstream in favor of this stricter hybrid.
pub fn gate_decision(result: &QualityResult, thresholds: QualityThresholds) -> GateVerdict {
    if result.toxicity_status == ToxicityStatus::Toxic {
        return GateVerdict::Reject;
    }
    if result.quality_score < thresholds.hard_reject {
        return GateVerdict::Reject;
    }
    if result.toxicity_status == ToxicityStatus::Uncertain
        && result.quality_score < thresholds.uncertain_threshold
    {
        return GateVerdict::Reject;
    }
    if result.is_suspicious && result.quality_score < thresholds.base_threshold {
        return GateVerdict::Reject;
    }
    GateVerdict::Accept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_with_no_rating_is_suspicious_and_zero() {
        let r = score("", 0, ToxicityStatus::NonToxic, QualityWeights::default());
        assert_eq!(r.quality_score, 0.0);
        assert!(r.has_flag(types::FLAG_EMPTY_CONTENT));
        assert!(r.is_suspicious);
    }

    #[test]
    fn stars_only_review_scores_point_six() {
        let r = score(
            "   ",
            5,
            ToxicityStatus::NonToxic,
            QualityWeights::default(),
        );
        assert_eq!(r.quality_score, 0.6);
        assert!(r.has_flag(types::FLAG_RATING_ONLY));
        assert!(!r.is_suspicious);
    }

    #[test]
    fn weights_sum_to_one() {
        assert!((QualityWeights::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn toxic_text_is_rejected_regardless_of_score() {
        let words = "this is a perfectly long and diverse review with plenty of words in it"
            .to_string();
        let r = score(
            &words,
            5,
            ToxicityStatus::Toxic,
            QualityWeights::default(),
        );
        assert_eq!(gate_decision(&r, QualityThresholds::default()), GateVerdict::Reject);
    }

    #[test]
    fn uncertain_toxicity_needs_higher_score_than_base() {
        let thresholds = QualityThresholds::default();
        let mut flags = BTreeSet::new();
        flags.insert(types::FLAG_UNCERTAIN_TOXICITY.to_string());
        let borderline = QualityResult {
            quality_score: 0.60,
            scores_breakdown: ScoresBreakdown {
                length: 1.0,
                diversity: 1.0,
                valid_chars: 1.0,
                repetition: 1.0,
                toxicity: 0.5,
            },
            flags,
            is_suspicious: false,
            toxicity_status: ToxicityStatus::Uncertain,
        };
        assert_eq!(gate_decision(&borderline, thresholds), GateVerdict::Reject);
    }

    #[test]
    fn short_toxic_text_keeps_its_toxicity_status() {
        let r = score("no", 1, ToxicityStatus::Toxic, QualityWeights::default());
        assert_eq!(r.toxicity_status, ToxicityStatus::Toxic);
        assert_eq!(gate_decision(&r, QualityThresholds::default()), GateVerdict::Reject);
    }

    #[test]
    fn repetitive_spam_triggers_excessive_repetition_flag() {
        let r = score(
            "aaaaaaaaaa aaaaaaaaaa aaaaaaaaaa",
            0,
            ToxicityStatus::NonToxic,
            QualityWeights::default(),
        );
        assert!(r.has_flag(types::FLAG_EXCESSIVE_CHAR_REPETITION));
    }
}

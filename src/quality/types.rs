//! Value types produced and consumed by the quality gate.

use std::collections::BTreeSet;

/// The five weighted factors that compose a quality score.
///
/// Defaults match the weights in the default scoring formula; every field
/// is independently overridable via `QUALITY_WEIGHT_*` environment
/// variables and the five MUST sum to `1.0` within rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityWeights {
    pub length: f64,
    pub diversity: f64,
    pub valid_chars: f64,
    pub repetition: f64,
    pub toxicity: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            length: 0.30,
            diversity: 0.20,
            valid_chars: 0.25,
            repetition: 0.15,
            toxicity: 0.10,
        }
    }
}

impl QualityWeights {
    /// Sum of all five weights. Callers validate this is `1.0` within
    /// rounding before trusting a custom set of weights.
    pub fn sum(&self) -> f64 {
        self.length + self.diversity + self.valid_chars + self.repetition + self.toxicity
    }
}

/// Thresholds consulted by the gate decision in [`super::gate_decision`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Score below this is rejected outright, regardless of any other flag.
    pub hard_reject: f64,
    /// Score a "suspicious" review must clear to be accepted.
    pub base_threshold: f64,
    /// Score an "uncertain toxicity" review must clear to be accepted.
    pub uncertain_threshold: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            hard_reject: 0.45,
            base_threshold: 0.55,
            uncertain_threshold: 0.65,
        }
    }
}

/// A short machine-readable tag explaining a facet of the quality score.
pub type QualityFlag = &'static str;

pub const FLAG_TOO_SHORT: QualityFlag = "too_short";
pub const FLAG_SHORT_TEXT: QualityFlag = "short_text";
pub const FLAG_LONG_TEXT: QualityFlag = "long_text";
pub const FLAG_TOO_LONG: QualityFlag = "too_long";
pub const FLAG_LOW_DIVERSITY: QualityFlag = "low_diversity";
pub const FLAG_REPETITIVE_TEXT: QualityFlag = "repetitive_text";
pub const FLAG_SUSPICIOUS_CHARS: QualityFlag = "suspicious_chars";
pub const FLAG_MIXED_CHARS: QualityFlag = "mixed_chars";
pub const FLAG_CHAR_REPETITION: QualityFlag = "char_repetition";
pub const FLAG_EXCESSIVE_CHAR_REPETITION: QualityFlag = "excessive_char_repetition";
pub const FLAG_HIGH_TOXICITY: QualityFlag = "high_toxicity";
pub const FLAG_UNCERTAIN_TOXICITY: QualityFlag = "uncertain_toxicity";
pub const FLAG_RATING_ONLY: QualityFlag = "rating_only";
pub const FLAG_EMPTY_CONTENT: QualityFlag = "empty_content";

/// Three-valued outcome of the toxicity classifier (C4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToxicityStatus {
    Toxic,
    NonToxic,
    Uncertain,
}

impl std::fmt::Display for ToxicityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ToxicityStatus::Toxic => "toxic",
            ToxicityStatus::NonToxic => "non-toxic",
            ToxicityStatus::Uncertain => "uncertain",
        };
        f.write_str(s)
    }
}

/// Per-factor breakdown backing a [`QualityResult`]'s `quality_score`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoresBreakdown {
    pub length: f64,
    pub diversity: f64,
    pub valid_chars: f64,
    pub repetition: f64,
    pub toxicity: f64,
}

/// Output of the quality scorer (C3), embedded verbatim into
/// `analysis.quality` on every persisted document regardless of status.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualityResult {
    pub quality_score: f64,
    pub scores_breakdown: ScoresBreakdown,
    pub flags: BTreeSet<String>,
    pub is_suspicious: bool,
    pub toxicity_status: ToxicityStatus,
}

impl QualityResult {
    pub fn has_flag(&self, flag: QualityFlag) -> bool {
        self.flags.contains(flag)
    }
}

/// What the gate decided to do with a [`QualityResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    Accept,
    Reject,
}

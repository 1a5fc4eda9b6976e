//! The persisted review document.
//!
//! Modeled as a tagged enum with one variant per terminal status rather
//! than one maximal struct with optional fields, so invariants 1-4 (which
//! keys are present on which status) are enforced by the type system
//! instead of by convention.

use crate::quality::{QualityResult, ToxicityStatus};
use std::collections::BTreeMap;

/// `{ rating, fields }`, preserved verbatim from the webhook (invariant 5:
/// `rating ∈ {0..5}`, enforced by [`crate::extract::extract`]).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Source {
    pub rating: u8,
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// `{ concatenated_text, is_profane }`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Processing {
    pub concatenated_text: String,
    pub is_profane: bool,
}

/// Three-valued sentiment label (C5 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// `analysis.context`, present only on `rejected_irrelevant`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RelevancyContext {
    pub has_mismatch: bool,
    pub top_label: String,
    pub top_score: f64,
}

/// `generated_content`, present only on `processed`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneratedContent {
    pub summary: String,
    pub actionable_insights: Vec<String>,
    pub suggested_reply: String,
}

/// `analysis` for `rejected_low_quality`: just the quality breakdown that
/// triggered the gate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LowQualityAnalysis {
    pub quality: QualityResult,
}

/// `analysis` for `rejected_irrelevant`: the quality breakdown plus the
/// relevancy mismatch that triggered the gate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IrrelevantAnalysis {
    pub quality: QualityResult,
    pub context: RelevancyContext,
}

/// `analysis` for `processed`: every classifier output the enrichment
/// stage consumed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessedAnalysis {
    pub quality: QualityResult,
    pub sentiment: Sentiment,
    pub toxicity: ToxicityStatus,
    pub category: String,
    pub key_themes: Vec<String>,
}

/// The persisted review, one variant per terminal status. Each variant
/// nests its classifier output under `analysis` (spec §3) instead of
/// flattening it onto the document root.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewDocument {
    RejectedLowQuality {
        id: String,
        shop_id: String,
        respondent_email: Option<String>,
        source: Source,
        processing: Processing,
        analysis: LowQualityAnalysis,
        created_at: chrono::DateTime<chrono::Utc>,
    },
    RejectedIrrelevant {
        id: String,
        shop_id: String,
        respondent_email: Option<String>,
        source: Source,
        processing: Processing,
        analysis: IrrelevantAnalysis,
        created_at: chrono::DateTime<chrono::Utc>,
    },
    Processed {
        id: String,
        shop_id: String,
        respondent_email: Option<String>,
        source: Source,
        processing: Processing,
        analysis: ProcessedAnalysis,
        generated_content: GeneratedContent,
        created_at: chrono::DateTime<chrono::Utc>,
    },
}

impl ReviewDocument {
    pub fn id(&self) -> &str {
        match self {
            ReviewDocument::RejectedLowQuality { id, .. }
            | ReviewDocument::RejectedIrrelevant { id, .. }
            | ReviewDocument::Processed { id, .. } => id,
        }
    }

    pub fn shop_id(&self) -> &str {
        match self {
            ReviewDocument::RejectedLowQuality { shop_id, .. }
            | ReviewDocument::RejectedIrrelevant { shop_id, .. }
            | ReviewDocument::Processed { shop_id, .. } => shop_id,
        }
    }

    pub fn respondent_email(&self) -> Option<&str> {
        match self {
            ReviewDocument::RejectedLowQuality {
                respondent_email, ..
            }
            | ReviewDocument::RejectedIrrelevant {
                respondent_email, ..
            }
            | ReviewDocument::Processed {
                respondent_email, ..
            } => respondent_email.as_deref(),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ReviewDocument::RejectedLowQuality { .. } => "rejected_low_quality",
            ReviewDocument::RejectedIrrelevant { .. } => "rejected_irrelevant",
            ReviewDocument::Processed { .. } => "processed",
        }
    }

    /// Short machine-readable explanation for a rejected review; `None` for
    /// `processed`, since acceptance needs no justification.
    pub fn reason(&self) -> Option<String> {
        match self {
            ReviewDocument::RejectedLowQuality { analysis, .. } => {
                if analysis.quality.flags.is_empty() {
                    Some(format!(
                        "quality_score {:.2} below threshold",
                        analysis.quality.quality_score
                    ))
                } else {
                    Some(
                        analysis
                            .quality
                            .flags
                            .iter()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(","),
                    )
                }
            }
            ReviewDocument::RejectedIrrelevant { analysis, .. } => Some(format!(
                "context mismatch: top_label={}",
                analysis.context.top_label
            )),
            ReviewDocument::Processed { .. } => None,
        }
    }
}

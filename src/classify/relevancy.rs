//! Relevancy classifier (C6): wraps the zero-shot endpoint to decide
//! whether a review's text actually pertains to the shop's category.

use tracing::warn;

use crate::document::RelevancyContext;
use crate::model::ModelClient;
use crate::quality::FLAG_RATING_ONLY;
use crate::resources::{category_label, GENERIC_SERVICE_LABEL, UNRELATED_LABEL};

/// Reviews this short, or carrying only a star rating, aren't worth a
/// relevancy call: there isn't enough text for zero-shot to say anything
/// meaningful, so they pass through without a mismatch.
pub fn should_skip(text: &str, flags: &std::collections::BTreeSet<String>) -> bool {
    text.chars().count() < 10 || flags.contains(FLAG_RATING_ONLY)
}

/// Classifies whether `text` matches `shop_type`'s category. A model
/// failure fails open (no mismatch), per the orchestrator's rule that a
/// relevancy outage must never block an otherwise-good review.
#[tracing::instrument(skip(model, text, category_overrides))]
pub async fn classify(
    model: &dyn ModelClient,
    text: &str,
    shop_type: &str,
    category_overrides: Option<&[(String, String)]>,
) -> RelevancyContext {
    let category = category_label(shop_type, category_overrides);
    let labels = vec![
        category.clone(),
        GENERIC_SERVICE_LABEL.to_string(),
        UNRELATED_LABEL.to_string(),
    ];

    match model.zero_shot(text, &labels).await {
        Ok(result) => {
            let word_count = text.split_whitespace().count();
            let Some((top_label, top_score)) = result.top() else {
                return no_mismatch();
            };

            let has_mismatch = if word_count <= 5 {
                top_score >= 0.5 && top_label != category
            } else {
                let category_score = result.score_of(&category).unwrap_or(0.0);
                let generic_score = result.score_of(GENERIC_SERVICE_LABEL).unwrap_or(0.0);
                let combined = category_score + generic_score;
                top_score < 0.6 || (top_label != category && top_score >= 0.5 && combined < 0.5)
            };

            RelevancyContext {
                has_mismatch,
                top_label: top_label.to_string(),
                top_score,
            }
        }
        Err(err) => {
            warn!(error = %err, "relevancy model call failed, passing through with no mismatch");
            no_mismatch()
        }
    }
}

fn no_mismatch() -> RelevancyContext {
    RelevancyContext {
        has_mismatch: false,
        top_label: String::new(),
        top_score: 0.0,
    }
}

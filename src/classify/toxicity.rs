//! Toxicity classifier (C4): wraps the zero-shot endpoint.

use tracing::warn;

use crate::model::ModelClient;
use crate::quality::ToxicityStatus;
use crate::resources::{CIVIL_LABEL, TOXIC_LABEL};

/// Classifies `text`'s toxicity via the zero-shot endpoint's fixed
/// confidence bands. Empty/whitespace text short-circuits to `non-toxic`
/// without a model call. A model failure degrades to `uncertain` rather
/// than propagating, per the orchestrator's failure semantics (§4.10).
#[tracing::instrument(skip(model, text))]
pub async fn classify(model: &dyn ModelClient, text: &str) -> ToxicityStatus {
    if text.trim().is_empty() {
        return ToxicityStatus::NonToxic;
    }

    let labels = vec![TOXIC_LABEL.to_string(), CIVIL_LABEL.to_string()];
    match model.zero_shot(text, &labels).await {
        Ok(result) => decide(&result),
        Err(err) => {
            warn!(error = %err, "toxicity model call failed, treating as uncertain");
            ToxicityStatus::Uncertain
        }
    }
}

fn decide(result: &crate::model::ZeroShotResult) -> ToxicityStatus {
    let Some((top_label, top_score)) = result.top() else {
        return ToxicityStatus::Uncertain;
    };
    let toxic_score = result.score_of(TOXIC_LABEL).unwrap_or(0.0);

    if top_label == TOXIC_LABEL && top_score >= 0.60 {
        ToxicityStatus::Toxic
    } else if top_label == TOXIC_LABEL && (0.40..0.60).contains(&top_score) {
        ToxicityStatus::Uncertain
    } else if top_label == CIVIL_LABEL && top_score >= 0.60 {
        ToxicityStatus::NonToxic
    } else if toxic_score < 0.35 {
        ToxicityStatus::NonToxic
    } else {
        ToxicityStatus::Uncertain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MockModelClient, ZeroShotResult};

    #[tokio::test]
    async fn empty_text_short_circuits_without_a_model_call() {
        let mock = MockModelClient::new();
        let status = classify(&mock, "   ").await;
        assert_eq!(status, ToxicityStatus::NonToxic);
        assert_eq!(*mock.zero_shot_calls.lock().unwrap(), 0);
    }

    #[test]
    fn top_toxic_at_threshold_is_toxic() {
        let result = ZeroShotResult {
            labels: vec![TOXIC_LABEL.to_string(), CIVIL_LABEL.to_string()],
            scores: vec![0.60, 0.40],
        };
        assert_eq!(decide(&result), ToxicityStatus::Toxic);
    }

    #[test]
    fn top_toxic_just_below_threshold_is_uncertain() {
        let result = ZeroShotResult {
            labels: vec![TOXIC_LABEL.to_string(), CIVIL_LABEL.to_string()],
            scores: vec![0.59, 0.41],
        };
        assert_eq!(decide(&result), ToxicityStatus::Uncertain);
    }

    #[test]
    fn top_civil_high_confidence_is_non_toxic() {
        let result = ZeroShotResult {
            labels: vec![CIVIL_LABEL.to_string(), TOXIC_LABEL.to_string()],
            scores: vec![0.9, 0.1],
        };
        assert_eq!(decide(&result), ToxicityStatus::NonToxic);
    }

    #[test]
    fn low_toxic_score_is_non_toxic_even_if_top() {
        let result = ZeroShotResult {
            labels: vec![TOXIC_LABEL.to_string(), CIVIL_LABEL.to_string()],
            scores: vec![0.30, 0.20],
        };
        assert_eq!(decide(&result), ToxicityStatus::NonToxic);
    }

    #[tokio::test]
    async fn model_failure_degrades_to_uncertain() {
        let mock = MockModelClient::new();
        mock.push_zero_shot(Err(crate::model::ModelError::Unavailable {
            endpoint: "zero_shot".into(),
            message: "boom".into(),
        }));
        let status = classify(&mock, "some text").await;
        assert_eq!(status, ToxicityStatus::Uncertain);
    }
}

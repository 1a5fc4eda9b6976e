//! Sentiment classifier (C5): wraps the sentiment endpoint.

use tracing::warn;

use crate::document::Sentiment;
use crate::model::ModelClient;

/// Classifies `text`'s sentiment. Empty text and unrecoverable model
/// failures both degrade to `neutral` rather than propagating, per the
/// orchestrator's rule that no classifier call ever bubbles a model
/// outage out of the pipeline.
#[tracing::instrument(skip(model, text))]
pub async fn classify(model: &dyn ModelClient, text: &str) -> Sentiment {
    if text.trim().is_empty() {
        return Sentiment::Neutral;
    }

    match model.sentiment(text).await {
        Ok(prediction) => label_to_sentiment(&prediction.label),
        Err(err) => {
            warn!(error = %err, "sentiment model call failed, defaulting to neutral");
            Sentiment::Neutral
        }
    }
}

/// Prefers a textual label (`positive`/`neutral`/`negative`, any casing,
/// common abbreviations) and only falls back to the ordinal `LABEL_n`
/// convention when no textual label is present.
fn label_to_sentiment(label: &str) -> Sentiment {
    let lower = label.to_lowercase();
    match lower.as_str() {
        "positive" | "pos" => return Sentiment::Positive,
        "neutral" | "neu" => return Sentiment::Neutral,
        "negative" | "neg" => return Sentiment::Negative,
        _ => {}
    }

    match lower.as_str() {
        "label_0" => Sentiment::Negative,
        "label_1" => Sentiment::Neutral,
        "label_2" => Sentiment::Positive,
        _ => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MockModelClient, ModelError, SentimentPrediction};

    #[tokio::test]
    async fn empty_text_short_circuits_to_neutral() {
        let mock = MockModelClient::new();
        let sentiment = classify(&mock, "").await;
        assert_eq!(sentiment, Sentiment::Neutral);
        assert_eq!(*mock.sentiment_calls.lock().unwrap(), 0);
    }

    #[test]
    fn textual_labels_take_priority() {
        assert_eq!(label_to_sentiment("Positive"), Sentiment::Positive);
        assert_eq!(label_to_sentiment("NEG"), Sentiment::Negative);
        assert_eq!(label_to_sentiment("neu"), Sentiment::Neutral);
    }

    #[test]
    fn ordinal_labels_fall_back_when_no_textual_label() {
        assert_eq!(label_to_sentiment("LABEL_0"), Sentiment::Negative);
        assert_eq!(label_to_sentiment("label_1"), Sentiment::Neutral);
        assert_eq!(label_to_sentiment("LABEL_2"), Sentiment::Positive);
    }

    #[test]
    fn unrecognized_label_defaults_to_neutral() {
        assert_eq!(label_to_sentiment("whatever"), Sentiment::Neutral);
    }

    #[tokio::test]
    async fn model_failure_defaults_to_neutral() {
        let mock = MockModelClient::new();
        mock.push_sentiment(Err(ModelError::Unavailable {
            endpoint: "sentiment".into(),
            message: "boom".into(),
        }));
        let sentiment = classify(&mock, "great service").await;
        assert_eq!(sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn pushed_response_is_mapped() {
        let mock = MockModelClient::new();
        mock.push_sentiment(Ok(SentimentPrediction {
            label: "positive".into(),
            score: 0.95,
        }));
        let sentiment = classify(&mock, "great service").await;
        assert_eq!(sentiment, Sentiment::Positive);
    }
}

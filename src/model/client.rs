//! HTTP-backed implementation of the external model adapter (C1).

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::error::ModelError;
use super::types::{ChatCompletionRequest, SentimentPrediction, ZeroShotResult};
use crate::config::Config;

const MAX_ATTEMPTS: u32 = 3;
const SENTIMENT_ZEROSHOT_TIMEOUT: Duration = Duration::from_secs(10);
const CHAT_TIMEOUT: Duration = Duration::from_secs(70);
const MAX_RETRY_WAIT_SECS: f64 = 30.0;

/// Entry points C4/C5/C6/C7 call through; never the vendor payload shape.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn sentiment(&self, text: &str) -> Result<SentimentPrediction, ModelError>;
    async fn zero_shot(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotResult, ModelError>;
    async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<String, ModelError>;
}

/// Thin, retrying reqwest-backed client shared across the three endpoints.
pub struct HttpModelClient {
    http: reqwest::Client,
    sentiment_url: String,
    zeroshot_url: String,
    chat_url: String,
    api_token: String,
    semaphore: Arc<Semaphore>,
}

impl HttpModelClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            sentiment_url: config.model_sentiment_url.clone(),
            zeroshot_url: config.model_zeroshot_url.clone(),
            chat_url: config.model_chat_url.clone(),
            api_token: config.model_api_token.clone(),
            semaphore: Arc::new(Semaphore::new(config.model_max_concurrency)),
        }
    }

    async fn post_with_retry(
        &self,
        endpoint: &'static str,
        url: &str,
        body: serde_json::Value,
        timeout: Duration,
    ) -> Result<serde_json::Value, ModelError> {
        let _permit = self.semaphore.acquire().await.map_err(|e| {
            ModelError::Unavailable {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        })?;

        let mut last_error = String::from("no attempts made");

        for attempt in 1..=MAX_ATTEMPTS {
            let result = self
                .http
                .post(url)
                .bearer_auth(&self.api_token)
                .timeout(timeout)
                .json(&body)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.json::<serde_json::Value>().await.map_err(|e| {
                            ModelError::Unavailable {
                                endpoint: endpoint.to_string(),
                                message: format!("unparseable response body: {e}"),
                            }
                        });
                    }

                    if status.as_u16() == 503 {
                        let wait = response
                            .json::<serde_json::Value>()
                            .await
                            .ok()
                            .and_then(|v| v.get("estimated_time").and_then(|t| t.as_f64()))
                            .unwrap_or(1.0)
                            .min(MAX_RETRY_WAIT_SECS);

                        last_error = format!("503 with estimated_time={wait}");

                        if attempt < MAX_ATTEMPTS {
                            debug!(endpoint, attempt, wait, "model endpoint busy, retrying");
                            tokio::time::sleep(Duration::from_secs_f64(wait)).await;
                            continue;
                        }
                        break;
                    }

                    last_error = format!("http {status}");
                    warn!(endpoint, status = %status, "model endpoint returned an error, not retrying");
                    break;
                }
                Err(e) if e.is_timeout() => {
                    last_error = "transport timeout".to_string();
                    if attempt < MAX_ATTEMPTS {
                        debug!(endpoint, attempt, "model endpoint timed out, retrying");
                        continue;
                    }
                    break;
                }
                Err(e) => {
                    last_error = e.to_string();
                    break;
                }
            }
        }

        Err(ModelError::Unavailable {
            endpoint: endpoint.to_string(),
            message: last_error,
        })
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn sentiment(&self, text: &str) -> Result<SentimentPrediction, ModelError> {
        let body = serde_json::json!({ "inputs": text });
        let value = self
            .post_with_retry(
                "sentiment",
                &self.sentiment_url,
                body,
                SENTIMENT_ZEROSHOT_TIMEOUT,
            )
            .await?;
        parse_sentiment_response(&value).ok_or_else(|| ModelError::Unavailable {
            endpoint: "sentiment".to_string(),
            message: "response had no predictions".to_string(),
        })
    }

    async fn zero_shot(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotResult, ModelError> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": { "candidate_labels": candidate_labels, "multi_label": false },
        });
        let value = self
            .post_with_retry(
                "zero_shot",
                &self.zeroshot_url,
                body,
                SENTIMENT_ZEROSHOT_TIMEOUT,
            )
            .await?;
        parse_zero_shot_response(&value).ok_or_else(|| ModelError::Unavailable {
            endpoint: "zero_shot".to_string(),
            message: "response missing labels/scores".to_string(),
        })
    }

    async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<String, ModelError> {
        let body = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "response_format": { "type": "json_object" },
        });
        let value = self
            .post_with_retry("chat_completion", &self.chat_url, body, CHAT_TIMEOUT)
            .await?;
        value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| ModelError::Unavailable {
                endpoint: "chat_completion".to_string(),
                message: "response missing choices[0].message.content".to_string(),
            })
    }
}

/// Tolerates both `[{label,score}, ...]` and `[[{label,score}, ...]]`
/// shapes, picking the top-scoring entry.
fn parse_sentiment_response(value: &serde_json::Value) -> Option<SentimentPrediction> {
    let entries: Vec<&serde_json::Value> = match value {
        serde_json::Value::Array(outer) => match outer.first() {
            Some(serde_json::Value::Array(inner)) => inner.iter().collect(),
            _ => outer.iter().collect(),
        },
        other => vec![other],
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let label = entry.get("label")?.as_str()?.to_string();
            let score = entry.get("score")?.as_f64()?;
            Some(SentimentPrediction { label, score })
        })
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
}

fn parse_zero_shot_response(value: &serde_json::Value) -> Option<ZeroShotResult> {
    let labels: Vec<String> = value
        .get("labels")?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    let scores: Vec<f64> = value
        .get("scores")?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_f64())
        .collect();

    if labels.is_empty() || labels.len() != scores.len() {
        return None;
    }

    Some(ZeroShotResult { labels, scores })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_sentiment_list() {
        let value = serde_json::json!([
            { "label": "negative", "score": 0.2 },
            { "label": "positive", "score": 0.7 },
        ]);
        let prediction = parse_sentiment_response(&value).unwrap();
        assert_eq!(prediction.label, "positive");
    }

    #[test]
    fn parses_nested_sentiment_list() {
        let value = serde_json::json!([[
            { "label": "negative", "score": 0.1 },
            { "label": "neutral", "score": 0.8 },
        ]]);
        let prediction = parse_sentiment_response(&value).unwrap();
        assert_eq!(prediction.label, "neutral");
    }

    #[test]
    fn parses_single_prediction_object() {
        let value = serde_json::json!({ "label": "positive", "score": 0.95 });
        let prediction = parse_sentiment_response(&value).unwrap();
        assert_eq!(prediction.label, "positive");
    }

    #[test]
    fn parses_zero_shot_parallel_arrays() {
        let value = serde_json::json!({
            "labels": ["a", "b"],
            "scores": [0.9, 0.1],
        });
        let result = parse_zero_shot_response(&value).unwrap();
        assert_eq!(result.top(), Some(("a", 0.9)));
    }

    #[test]
    fn mismatched_array_lengths_fail_to_parse() {
        let value = serde_json::json!({ "labels": ["a"], "scores": [] });
        assert!(parse_zero_shot_response(&value).is_none());
    }
}

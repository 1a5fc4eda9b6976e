//! In-memory model adapter for tests and the integration harness.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::error::ModelError;
use super::types::{ChatCompletionRequest, SentimentPrediction, ZeroShotResult};
use super::ModelClient;

/// Canned responses consumed in FIFO order per endpoint; `None` (or an
/// exhausted queue) falls back to a sensible default response, never a
/// panic, so tests that only care about a subset of calls don't need to
/// stub every endpoint.
#[derive(Default)]
pub struct MockModelClient {
    sentiment_queue: Mutex<VecDeque<Result<SentimentPrediction, ModelError>>>,
    zero_shot_queue: Mutex<VecDeque<Result<ZeroShotResult, ModelError>>>,
    chat_queue: Mutex<VecDeque<Result<String, ModelError>>>,
    pub sentiment_calls: Mutex<u32>,
    pub zero_shot_calls: Mutex<u32>,
    pub chat_calls: Mutex<u32>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sentiment(&self, result: Result<SentimentPrediction, ModelError>) {
        self.sentiment_queue
            .lock()
            .expect("lock poisoned")
            .push_back(result);
    }

    pub fn push_zero_shot(&self, result: Result<ZeroShotResult, ModelError>) {
        self.zero_shot_queue
            .lock()
            .expect("lock poisoned")
            .push_back(result);
    }

    pub fn push_chat(&self, result: Result<String, ModelError>) {
        self.chat_queue
            .lock()
            .expect("lock poisoned")
            .push_back(result);
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn sentiment(&self, _text: &str) -> Result<SentimentPrediction, ModelError> {
        *self.sentiment_calls.lock().expect("lock poisoned") += 1;
        self.sentiment_queue
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Ok(SentimentPrediction {
                label: "neutral".to_string(),
                score: 1.0,
            }))
    }

    async fn zero_shot(
        &self,
        _text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotResult, ModelError> {
        *self.zero_shot_calls.lock().expect("lock poisoned") += 1;
        self.zero_shot_queue
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ZeroShotResult {
                    labels: candidate_labels.to_vec(),
                    scores: candidate_labels.iter().map(|_| 0.0).collect(),
                })
            })
    }

    async fn chat_completion(
        &self,
        _request: ChatCompletionRequest,
    ) -> Result<String, ModelError> {
        *self.chat_calls.lock().expect("lock poisoned") += 1;
        self.chat_queue
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Ok("{}".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_sentiment_is_neutral() {
        let mock = MockModelClient::new();
        let prediction = mock.sentiment("anything").await.unwrap();
        assert_eq!(prediction.label, "neutral");
        assert_eq!(*mock.sentiment_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn pushed_response_is_returned() {
        let mock = MockModelClient::new();
        mock.push_sentiment(Ok(SentimentPrediction {
            label: "positive".into(),
            score: 0.9,
        }));
        let prediction = mock.sentiment("great!").await.unwrap();
        assert_eq!(prediction.label, "positive");
    }
}

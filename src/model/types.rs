//! Internal result types the model adapter returns. Never the vendor's raw
//! payload shape — parsing happens once, at the adapter boundary.

/// Top-scoring sentiment prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentPrediction {
    pub label: String,
    pub score: f64,
}

/// Parallel labels/scores from a zero-shot call, sorted descending by
/// score (the vendor already sorts; the adapter doesn't re-sort).
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroShotResult {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotResult {
    pub fn top(&self) -> Option<(&str, f64)> {
        self.labels
            .first()
            .map(|l| l.as_str())
            .zip(self.scores.first().copied())
    }

    pub fn score_of(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|idx| self.scores[idx])
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_returns_the_first_pair() {
        let r = ZeroShotResult {
            labels: vec!["a".into(), "b".into()],
            scores: vec![0.9, 0.1],
        };
        assert_eq!(r.top(), Some(("a", 0.9)));
    }

    #[test]
    fn score_of_looks_up_by_label() {
        let r = ZeroShotResult {
            labels: vec!["a".into(), "b".into()],
            scores: vec![0.9, 0.1],
        };
        assert_eq!(r.score_of("b"), Some(0.1));
        assert_eq!(r.score_of("missing"), None);
    }
}

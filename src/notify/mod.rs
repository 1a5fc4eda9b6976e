//! Notification fan-out: best-effort push/chat delivery after persistence.

pub mod error;
pub mod http;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use async_trait::async_trait;
use tracing::warn;

pub use error::NotifyError;
pub use http::HttpNotifier;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockNotifier;

use crate::document::ReviewDocument;
use crate::store::Shop;

/// Chat messages are truncated to this many characters (plus an ellipsis)
/// before being sent; push payloads have no such limit.
const CHAT_MESSAGE_LIMIT: usize = 4096;

/// Collaborator the orchestrator holds as `Arc<dyn Notifier>`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_push(&self, token: &str, message: &str) -> Result<(), NotifyError>;
    async fn send_chat(&self, chat_id: &str, message: &str) -> Result<(), NotifyError>;
}

/// Picks a channel for `shop` and delivers a summary of `document`: push
/// takes priority over chat, and a shop with neither is silently skipped.
/// Delivery failures are logged, never propagated — a notification is a
/// courtesy, not a pipeline invariant.
pub async fn notify(notifier: &dyn Notifier, shop: &Shop, document: &ReviewDocument) {
    let message = message_for(document);

    if let Some(token) = shop.push_token.as_deref() {
        if let Err(err) = notifier.send_push(token, &message).await {
            warn!(shop_id = %shop.id, error = %err, "push notification failed");
        }
        return;
    }

    if let Some(chat_id) = shop.chat_id.as_deref() {
        let truncated = truncate_for_chat(&message);
        if let Err(err) = notifier.send_chat(chat_id, &truncated).await {
            warn!(shop_id = %shop.id, error = %err, "chat notification failed");
        }
        return;
    }

    warn!(shop_id = %shop.id, "shop has no notification channel configured, skipping");
}

fn message_for(document: &ReviewDocument) -> String {
    match document {
        ReviewDocument::Processed {
            analysis,
            generated_content,
            ..
        } => format!(
            "مراجعة جديدة ({}): {}\nالرد المقترح: {}",
            analysis.category, generated_content.summary, generated_content.suggested_reply
        ),
        ReviewDocument::RejectedLowQuality { .. } => {
            "تم رفض مراجعة واردة بسبب جودة منخفضة.".to_string()
        }
        ReviewDocument::RejectedIrrelevant { .. } => {
            "تم رفض مراجعة واردة لعدم ارتباطها بمجال المتجر.".to_string()
        }
    }
}

fn truncate_for_chat(message: &str) -> String {
    if message.chars().count() <= CHAT_MESSAGE_LIMIT {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(CHAT_MESSAGE_LIMIT).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::mock::MockNotifier;
    use crate::quality::{QualityResult, ScoresBreakdown, ToxicityStatus};
    use std::collections::BTreeSet;

    fn sample_shop(push_token: Option<&str>, chat_id: Option<&str>) -> Shop {
        Shop {
            id: "s1".to_string(),
            shop_type: "مطعم".to_string(),
            shop_name: None,
            push_token: push_token.map(str::to_string),
            chat_id: chat_id.map(str::to_string),
        }
    }

    fn sample_document() -> ReviewDocument {
        ReviewDocument::RejectedLowQuality {
            id: "r1".to_string(),
            shop_id: "s1".to_string(),
            respondent_email: None,
            source: crate::document::Source {
                rating: 0,
                fields: Default::default(),
            },
            processing: crate::document::Processing {
                concatenated_text: String::new(),
                is_profane: false,
            },
            analysis: crate::document::LowQualityAnalysis {
                quality: QualityResult {
                    quality_score: 0.1,
                    scores_breakdown: ScoresBreakdown {
                        length: 0.1,
                        diversity: 0.1,
                        valid_chars: 0.1,
                        repetition: 0.1,
                        toxicity: 0.1,
                    },
                    flags: BTreeSet::new(),
                    is_suspicious: true,
                    toxicity_status: ToxicityStatus::NonToxic,
                },
            },
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn push_is_preferred_over_chat() {
        let notifier = MockNotifier::new();
        let shop = sample_shop(Some("push-token"), Some("chat-id"));
        notify(&notifier, &shop, &sample_document()).await;
        assert_eq!(notifier.push_messages().len(), 1);
        assert_eq!(notifier.chat_messages().len(), 0);
    }

    #[tokio::test]
    async fn chat_is_used_when_no_push_token() {
        let notifier = MockNotifier::new();
        let shop = sample_shop(None, Some("chat-id"));
        notify(&notifier, &shop, &sample_document()).await;
        assert_eq!(notifier.chat_messages().len(), 1);
    }

    #[tokio::test]
    async fn no_channel_is_silently_skipped() {
        let notifier = MockNotifier::new();
        let shop = sample_shop(None, None);
        notify(&notifier, &shop, &sample_document()).await;
        assert_eq!(notifier.push_messages().len(), 0);
        assert_eq!(notifier.chat_messages().len(), 0);
    }

    #[test]
    fn long_messages_are_truncated_with_an_ellipsis() {
        let message = "a".repeat(5000);
        let truncated = truncate_for_chat(&message);
        assert_eq!(truncated.chars().count(), CHAT_MESSAGE_LIMIT + 3);
        assert!(truncated.ends_with("..."));
    }
}

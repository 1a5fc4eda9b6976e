//! In-memory review store for tests and the integration harness.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::error::StoreError;
use super::{ReviewStore, Shop};
use crate::document::ReviewDocument;

#[derive(Default)]
pub struct MockReviewStore {
    shops: RwLock<HashMap<String, Shop>>,
    reviews: RwLock<Vec<ReviewDocument>>,
}

impl MockReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_shop(&self, shop: Shop) {
        self.shops
            .write()
            .expect("lock poisoned")
            .insert(shop.id.clone(), shop);
    }

    pub fn review_count(&self) -> usize {
        self.reviews.read().expect("lock poisoned").len()
    }

    pub fn reviews(&self) -> Vec<ReviewDocument> {
        self.reviews.read().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl ReviewStore for MockReviewStore {
    async fn get_shop(&self, shop_id: &str) -> Result<Option<Shop>, StoreError> {
        Ok(self
            .shops
            .read()
            .expect("lock poisoned")
            .get(shop_id)
            .cloned())
    }

    async fn find_by_shop_and_email(
        &self,
        shop_id: &str,
        email: &str,
    ) -> Result<Option<ReviewDocument>, StoreError> {
        Ok(self
            .reviews
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|doc| doc.shop_id() == shop_id && doc.respondent_email() == Some(email))
            .cloned())
    }

    async fn insert_review(&self, document: ReviewDocument) -> Result<(), StoreError> {
        let mut reviews = self.reviews.write().expect("lock poisoned");
        if let Some(email) = document.respondent_email()
            && !email.is_empty()
            && reviews
                .iter()
                .any(|d| d.shop_id() == document.shop_id() && d.respondent_email() == Some(email))
        {
            return Err(StoreError::DuplicateReview {
                shop_id: document.shop_id().to_string(),
                email: email.to_string(),
            });
        }
        reviews.push(document);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{GeneratedContent, Processing, Sentiment, Source};
    use crate::quality::{QualityResult, ScoresBreakdown, ToxicityStatus};
    use std::collections::BTreeSet;

    fn sample_review(shop_id: &str, email: &str) -> ReviewDocument {
        ReviewDocument::Processed {
            id: uuid::Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            respondent_email: Some(email.to_string()),
            source: Source {
                rating: 5,
                fields: Default::default(),
            },
            processing: Processing {
                concatenated_text: "great".to_string(),
                is_profane: false,
            },
            analysis: crate::document::ProcessedAnalysis {
                quality: QualityResult {
                    quality_score: 1.0,
                    scores_breakdown: ScoresBreakdown {
                        length: 1.0,
                        diversity: 1.0,
                        valid_chars: 1.0,
                        repetition: 1.0,
                        toxicity: 1.0,
                    },
                    flags: BTreeSet::new(),
                    is_suspicious: false,
                    toxicity_status: ToxicityStatus::NonToxic,
                },
                sentiment: Sentiment::Positive,
                toxicity: ToxicityStatus::NonToxic,
                category: "praise".to_string(),
                key_themes: vec![],
            },
            generated_content: GeneratedContent {
                summary: "great".to_string(),
                actionable_insights: vec![],
                suggested_reply: "thanks".to_string(),
            },
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn get_shop_returns_none_when_unseeded() {
        let store = MockReviewStore::new();
        assert_eq!(store.get_shop("s1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_shop_and_email_is_rejected() {
        let store = MockReviewStore::new();
        store
            .insert_review(sample_review("s1", "a@b.com"))
            .await
            .unwrap();
        let result = store.insert_review(sample_review("s1", "a@b.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateReview { .. })));
    }

    #[tokio::test]
    async fn same_email_different_shop_is_allowed() {
        let store = MockReviewStore::new();
        store
            .insert_review(sample_review("s1", "a@b.com"))
            .await
            .unwrap();
        store
            .insert_review(sample_review("s2", "a@b.com"))
            .await
            .unwrap();
        assert_eq!(store.review_count(), 2);
    }
}

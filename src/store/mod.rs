//! Persistence (C10): the shop directory and review document store.

pub mod error;
pub mod mongo;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use async_trait::async_trait;

pub use error::StoreError;
pub use mongo::MongoReviewStore;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockReviewStore;

use crate::document::ReviewDocument;

/// The shop directory entry a webhook's `shop_id` is validated against,
/// and the notification channel a processed review is fanned out to.
#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    pub id: String,
    pub shop_type: String,
    pub shop_name: Option<String>,
    pub push_token: Option<String>,
    pub chat_id: Option<String>,
}

/// Collaborator the orchestrator (C9/C10) holds as `Arc<dyn ReviewStore>`.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn get_shop(&self, shop_id: &str) -> Result<Option<Shop>, StoreError>;

    async fn find_by_shop_and_email(
        &self,
        shop_id: &str,
        email: &str,
    ) -> Result<Option<ReviewDocument>, StoreError>;

    async fn insert_review(&self, document: ReviewDocument) -> Result<(), StoreError>;

    /// Cheap connectivity probe for the `/ready` endpoint; never touches
    /// review data.
    async fn ping(&self) -> Result<(), StoreError>;
}

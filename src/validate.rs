//! Shop and duplicate validation (C9).

use crate::store::{ReviewStore, Shop, StoreError};

/// Looks up `shop_id` in the shop directory, failing with
/// [`StoreError::ShopNotFound`] when it isn't registered.
#[tracing::instrument(skip(store))]
pub async fn validate_shop(store: &dyn ReviewStore, shop_id: &str) -> Result<Shop, StoreError> {
    store
        .get_shop(shop_id)
        .await?
        .ok_or_else(|| StoreError::ShopNotFound {
            shop_id: shop_id.to_string(),
        })
}

/// Invariant 4: at most one review per non-empty `(shop_id, respondent_email)`.
/// A missing or empty email opts out of deduplication entirely.
#[tracing::instrument(skip(store))]
pub async fn check_duplicate(
    store: &dyn ReviewStore,
    shop_id: &str,
    respondent_email: Option<&str>,
) -> Result<(), StoreError> {
    let Some(email) = respondent_email.filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    if store.find_by_shop_and_email(shop_id, email).await?.is_some() {
        return Err(StoreError::DuplicateReview {
            shop_id: shop_id.to_string(),
            email: email.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockReviewStore;

    #[tokio::test]
    async fn unknown_shop_is_rejected() {
        let store = MockReviewStore::new();
        let result = validate_shop(&store, "missing").await;
        assert!(matches!(result, Err(StoreError::ShopNotFound { .. })));
    }

    #[tokio::test]
    async fn known_shop_resolves() {
        let store = MockReviewStore::new();
        store.seed_shop(Shop {
            id: "s1".to_string(),
            shop_type: "مطعم".to_string(),
            shop_name: None,
            push_token: None,
            chat_id: None,
        });
        let shop = validate_shop(&store, "s1").await.unwrap();
        assert_eq!(shop.id, "s1");
    }

    #[tokio::test]
    async fn empty_email_never_counts_as_a_duplicate() {
        let store = MockReviewStore::new();
        assert!(check_duplicate(&store, "s1", Some("")).await.is_ok());
        assert!(check_duplicate(&store, "s1", None).await.is_ok());
    }
}

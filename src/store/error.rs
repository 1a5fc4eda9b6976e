use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("shop not found: {shop_id}")]
    ShopNotFound { shop_id: String },

    #[error("a review already exists for shop '{shop_id}' and respondent '{email}'")]
    DuplicateReview { shop_id: String, email: String },

    #[error("persistence operation '{operation}' failed: {message}")]
    PersistenceFailed { operation: String, message: String },
}

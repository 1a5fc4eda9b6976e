//! MongoDB-backed review store.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};

use super::error::StoreError;
use super::{ReviewStore, Shop};
use crate::document::ReviewDocument;

const SHOPS_COLLECTION: &str = "shops";
const REVIEWS_COLLECTION: &str = "reviews";

/// Mirrors [`Shop`] for (de)serialization; kept separate so the public
/// collaborator type never carries a `mongodb`/`bson` dependency into
/// callers that only need the trait.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ShopRecord {
    #[serde(rename = "_id")]
    id: String,
    shop_type: String,
    shop_name: Option<String>,
    push_token: Option<String>,
    chat_id: Option<String>,
}

impl From<ShopRecord> for Shop {
    fn from(record: ShopRecord) -> Self {
        Shop {
            id: record.id,
            shop_type: record.shop_type,
            shop_name: record.shop_name,
            push_token: record.push_token,
            chat_id: record.chat_id,
        }
    }
}

pub struct MongoReviewStore {
    database: mongodb::Database,
    shops: Collection<ShopRecord>,
    reviews: Collection<ReviewDocument>,
}

impl MongoReviewStore {
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::PersistenceFailed {
                operation: "connect".to_string(),
                message: e.to_string(),
            })?;
        let database = client.database(database_name);

        let store = Self {
            shops: database.collection(SHOPS_COLLECTION),
            reviews: database.collection(REVIEWS_COLLECTION),
            database,
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Unique on `(shop_id, respondent_email)` and a sort-friendly index on
    /// `(shop_id, status, created_at desc)` for the shop dashboard surface.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "shop_id": 1, "respondent_email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! {
                        "respondent_email": { "$exists": true, "$ne": null },
                    })
                    .build(),
            )
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "shop_id": 1, "status": 1, "created_at": -1 })
            .build();

        self.reviews
            .create_index(unique_email)
            .await
            .map_err(|e| StoreError::PersistenceFailed {
                operation: "create_index".to_string(),
                message: e.to_string(),
            })?;
        self.reviews
            .create_index(status_index)
            .await
            .map_err(|e| StoreError::PersistenceFailed {
                operation: "create_index".to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for MongoReviewStore {
    async fn get_shop(&self, shop_id: &str) -> Result<Option<Shop>, StoreError> {
        self.shops
            .find_one(doc! { "_id": shop_id })
            .await
            .map(|opt| opt.map(Shop::from))
            .map_err(|e| StoreError::PersistenceFailed {
                operation: "get_shop".to_string(),
                message: e.to_string(),
            })
    }

    async fn find_by_shop_and_email(
        &self,
        shop_id: &str,
        email: &str,
    ) -> Result<Option<ReviewDocument>, StoreError> {
        self.reviews
            .find_one(doc! { "shop_id": shop_id, "respondent_email": email })
            .await
            .map_err(|e| StoreError::PersistenceFailed {
                operation: "find_by_shop_and_email".to_string(),
                message: e.to_string(),
            })
    }

    async fn insert_review(&self, document: ReviewDocument) -> Result<(), StoreError> {
        let shop_id = document.shop_id().to_string();
        let email = document.respondent_email().unwrap_or_default().to_string();

        self.reviews
            .insert_one(document)
            .await
            .map_err(|e| match e.kind.as_ref() {
                mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we))
                    if we.code == 11000 =>
                {
                    StoreError::DuplicateReview { shop_id, email }
                }
                _ => StoreError::PersistenceFailed {
                    operation: "insert_review".to_string(),
                    message: e.to_string(),
                },
            })?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::PersistenceFailed {
                operation: "ping".to_string(),
                message: e.to_string(),
            })
    }
}

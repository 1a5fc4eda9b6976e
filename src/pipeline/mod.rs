//! The orchestrator (C9/C10): runs a webhook payload through every stage
//! in fixed order and persists exactly one terminal document.

pub mod error;

use std::sync::Arc;

use tracing::{info, instrument};

pub use error::PipelineError;

use crate::classify::{relevancy, sentiment, toxicity};
use crate::config::Config;
use crate::document::{
    GeneratedContent, IrrelevantAnalysis, LowQualityAnalysis, Processing, ProcessedAnalysis,
    RelevancyContext, ReviewDocument, Source,
};
use crate::enrich;
use crate::extract::{self, WebhookPayload};
use crate::model::ModelClient;
use crate::notify::{self, Notifier};
use crate::quality;
use crate::store::{ReviewStore, Shop};
use crate::text;
use crate::validate;

/// Category overrides loaded once at startup from `SHOP_CATEGORY_LABELS_FILE`.
pub type CategoryOverrides = Option<Vec<(String, String)>>;

#[derive(Clone)]
pub struct Pipeline {
    model: Arc<dyn ModelClient>,
    store: Arc<dyn ReviewStore>,
    notifier: Arc<dyn Notifier>,
    config: Config,
    category_overrides: Arc<CategoryOverrides>,
}

impl Pipeline {
    pub fn new(
        model: Arc<dyn ModelClient>,
        store: Arc<dyn ReviewStore>,
        notifier: Arc<dyn Notifier>,
        config: Config,
        category_overrides: CategoryOverrides,
    ) -> Self {
        Self {
            model,
            store,
            notifier,
            config,
            category_overrides: Arc::new(category_overrides),
        }
    }

    /// Runs C2 through C10 for a single webhook invocation and returns the
    /// document that was persisted. Notification fan-out is best-effort
    /// and happens in the background after persistence succeeds.
    #[instrument(skip(self, payload))]
    pub async fn process(&self, payload: &WebhookPayload) -> Result<ReviewDocument, PipelineError> {
        let extracted = extract::extract(payload)?;

        let shop = validate::validate_shop(self.store.as_ref(), &extracted.shop_id).await?;
        validate::check_duplicate(
            self.store.as_ref(),
            &extracted.shop_id,
            extracted.respondent_email.as_deref(),
        )
        .await?;

        let concatenated_text = text::concatenate_fields(
            &extracted.enjoy_most,
            &extracted.improve_product,
            &extracted.additional_feedback,
        );

        let toxicity_status = toxicity::classify(self.model.as_ref(), &concatenated_text).await;

        let quality_result = quality::score(
            &concatenated_text,
            extracted.rating,
            toxicity_status,
            self.config.quality_weights,
        );

        let source = Source {
            rating: extracted.rating,
            fields: extracted.source_fields.clone(),
        };
        let processing = Processing {
            concatenated_text: concatenated_text.clone(),
            is_profane: matches!(toxicity_status, quality::ToxicityStatus::Toxic),
        };

        if quality::gate_decision(&quality_result, self.config.quality_thresholds)
            == quality::GateVerdict::Reject
        {
            let document = ReviewDocument::RejectedLowQuality {
                id: new_id(),
                shop_id: extracted.shop_id.clone(),
                respondent_email: extracted.respondent_email.clone(),
                source,
                processing,
                analysis: LowQualityAnalysis {
                    quality: quality_result,
                },
                created_at: now(),
            };
            self.store.insert_review(document.clone()).await?;
            self.fan_out(shop, document.clone());
            info!(shop_id = %extracted.shop_id, status = document.status(), "review triaged");
            return Ok(document);
        }

        let relevancy_context = if relevancy::should_skip(&concatenated_text, &quality_result.flags)
        {
            RelevancyContext {
                has_mismatch: false,
                top_label: String::new(),
                top_score: 0.0,
            }
        } else {
            relevancy::classify(
                self.model.as_ref(),
                &concatenated_text,
                &extracted.shop_type,
                self.category_overrides.as_deref(),
            )
            .await
        };

        if relevancy_context.has_mismatch {
            let document = ReviewDocument::RejectedIrrelevant {
                id: new_id(),
                shop_id: extracted.shop_id.clone(),
                respondent_email: extracted.respondent_email.clone(),
                source,
                processing,
                analysis: IrrelevantAnalysis {
                    quality: quality_result,
                    context: relevancy_context,
                },
                created_at: now(),
            };
            self.store.insert_review(document.clone()).await?;
            self.fan_out(shop, document.clone());
            info!(shop_id = %extracted.shop_id, status = document.status(), "review triaged");
            return Ok(document);
        }

        let sentiment = sentiment::classify(self.model.as_ref(), &concatenated_text).await;
        let enrichment = enrich::enrich(
            self.model.as_ref(),
            &self.config,
            &concatenated_text,
            extracted.rating,
            sentiment,
        )
        .await;

        let document = ReviewDocument::Processed {
            id: new_id(),
            shop_id: extracted.shop_id.clone(),
            respondent_email: extracted.respondent_email.clone(),
            source,
            processing,
            analysis: ProcessedAnalysis {
                quality: quality_result,
                sentiment,
                toxicity: toxicity_status,
                category: enrichment.category,
                key_themes: enrichment.key_themes,
            },
            generated_content: GeneratedContent {
                summary: enrichment.generated_content.summary,
                actionable_insights: enrichment.generated_content.actionable_insights,
                suggested_reply: enrichment.generated_content.suggested_reply,
            },
            created_at: now(),
        };
        self.store.insert_review(document.clone()).await?;
        self.fan_out(shop, document.clone());
        info!(shop_id = %extracted.shop_id, status = document.status(), "review triaged");
        Ok(document)
    }

    /// Cheap store connectivity probe for the `/ready` endpoint.
    pub async fn store_is_ready(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    /// Delivers the shop's notification on a detached task so a slow or
    /// unreachable channel never holds up the webhook response.
    fn fan_out(&self, shop: Shop, document: ReviewDocument) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            notify::notify(notifier.as_ref(), &shop, &document).await;
        });
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

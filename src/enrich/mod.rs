//! AI enricher (C7): turns accepted review text into the category,
//! summary, themes, insights, and suggested reply stored on `processed`
//! documents.

use tracing::warn;

use crate::config::Config;
use crate::document::{GeneratedContent, Sentiment};
use crate::model::{ChatCompletionRequest, ChatMessage, ModelClient};
use crate::resources::{
    self, CANNED_FALLBACK_REPLY, CANNED_FALLBACK_SUMMARY, CANNED_THANK_YOU_REPLY,
    ENRICHMENT_CATEGORIES,
};

/// Review text shorter than this never reaches the model; there isn't
/// enough signal for a useful summary, and the canned, rating-driven
/// fallback is indistinguishable from what the model would produce anyway.
const SKIP_TEXT_LEN: usize = 15;

/// Hard cap on the text handed to the chat-completion endpoint.
const MAX_PROMPT_CHARS: usize = 4096;

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.3;

pub struct EnrichmentResult {
    pub category: String,
    pub key_themes: Vec<String>,
    pub generated_content: GeneratedContent,
}

#[tracing::instrument(skip(model, config, text))]
pub async fn enrich(
    model: &dyn ModelClient,
    config: &Config,
    text: &str,
    rating: u8,
    sentiment: Sentiment,
) -> EnrichmentResult {
    if text.trim().chars().count() < SKIP_TEXT_LEN {
        return rating_fallback(rating, sentiment);
    }

    let truncated: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    let request = ChatCompletionRequest {
        model: config.model_chat_model_id.clone(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_prompt(),
            },
            ChatMessage {
                role: "user",
                content: truncated,
            },
        ],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    match model.chat_completion(request).await {
        Ok(raw) => parse_enrichment(&raw).unwrap_or_else(|| {
            warn!("enrichment response was not valid JSON, using canned fallback");
            canned_fallback(rating, sentiment)
        }),
        Err(err) => {
            warn!(error = %err, "enrichment call failed, using canned fallback");
            canned_fallback(rating, sentiment)
        }
    }
}

fn system_prompt() -> String {
    format!(
        "صنّف تقييم العميل التالي إلى واحدة من هذه الفئات: {}. \
         أرجع JSON فقط بالحقول التالية: category, summary (بحد أقصى 15 كلمة), \
         key_themes (2-4 عناصر), actionable_insights (2-3 عناصر), suggested_reply.",
        ENRICHMENT_CATEGORIES.join(", ")
    )
}

fn parse_enrichment(raw: &str) -> Option<EnrichmentResult> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;

    let category = value.get("category")?.as_str()?.to_string();
    if !ENRICHMENT_CATEGORIES.contains(&category.as_str()) {
        return None;
    }

    let summary = value.get("summary")?.as_str()?.to_string();
    let key_themes = string_array(value.get("key_themes")?)?;
    let actionable_insights = string_array(value.get("actionable_insights")?)?;
    let suggested_reply = value.get("suggested_reply")?.as_str()?.to_string();

    Some(EnrichmentResult {
        category,
        key_themes,
        generated_content: GeneratedContent {
            summary,
            actionable_insights,
            suggested_reply,
        },
    })
}

fn string_array(value: &serde_json::Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Category mapping shared by both fallback paths: praise for positive (or
/// neutral-but-high-rated) reviews, complaint for negative (or
/// neutral-but-low-rated), suggestion otherwise.
fn category_for(rating: u8, sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "praise",
        Sentiment::Negative => "complaint",
        Sentiment::Neutral => {
            if rating >= 4 {
                "praise"
            } else if rating > 0 && rating <= 2 {
                "complaint"
            } else {
                "suggestion"
            }
        }
    }
}

/// Deterministic fallback for the short-text skip path: no model call was
/// ever made, so the category comes straight from the rating/sentiment.
fn rating_fallback(rating: u8, sentiment: Sentiment) -> EnrichmentResult {
    let category = category_for(rating, sentiment);
    let summary = match category {
        "praise" => resources::CANNED_PRAISE_SUMMARY,
        "complaint" => resources::CANNED_COMPLAINT_SUMMARY,
        _ => resources::CANNED_NEUTRAL_SUMMARY,
    };

    EnrichmentResult {
        category: category.to_string(),
        key_themes: Vec::new(),
        generated_content: GeneratedContent {
            summary: summary.to_string(),
            actionable_insights: Vec::new(),
            suggested_reply: CANNED_THANK_YOU_REPLY.to_string(),
        },
    }
}

/// Fallback for a failed or unparseable model call: the model never
/// answered, but the rating/sentiment still picks the same category the
/// short-text skip path would use; only the summary/reply text stays
/// generic since there's no review text to summarize.
fn canned_fallback(rating: u8, sentiment: Sentiment) -> EnrichmentResult {
    EnrichmentResult {
        category: category_for(rating, sentiment).to_string(),
        key_themes: Vec::new(),
        generated_content: GeneratedContent {
            summary: CANNED_FALLBACK_SUMMARY.to_string(),
            actionable_insights: Vec::new(),
            suggested_reply: CANNED_FALLBACK_REPLY.to_string(),
        },
    }
}

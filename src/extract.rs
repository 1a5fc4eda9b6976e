//! Webhook form-field extraction (C8).

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::resources::DEFAULT_SHOP_TYPE;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Raw shape of the inbound webhook body.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub fields: Vec<WebhookField>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookField {
    pub label: String,
    pub value: serde_json::Value,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
}

/// Everything the pipeline needs out of one webhook invocation, before
/// validation or normalization.
#[derive(Debug, Clone)]
pub struct ExtractedReview {
    pub rating: u8,
    pub source_fields: BTreeMap<String, serde_json::Value>,
    pub shop_id: String,
    pub respondent_email: Option<String>,
    pub respondent_phone: Option<String>,
    pub shop_type: String,
    pub shop_name: Option<String>,
    pub enjoy_most: String,
    pub improve_product: String,
    pub additional_feedback: String,
}

/// Pulls rating, text fields, shop identifier, respondent email, shop
/// category, and shop name out of the webhook's field array.
///
/// Fails with [`ExtractError::MalformedPayload`] when the fields array is
/// absent/empty or `shop_id` is missing; every other field degrades
/// gracefully.
#[tracing::instrument(skip(payload))]
pub fn extract(payload: &WebhookPayload) -> Result<ExtractedReview, ExtractError> {
    if payload.data.fields.is_empty() {
        return Err(ExtractError::MalformedPayload(
            "fields array is empty".to_string(),
        ));
    }

    let mut source_fields = BTreeMap::new();
    let mut rating: Option<u8> = None;
    let mut shop_id: Option<String> = None;
    let mut respondent_email: Option<String> = None;
    let mut respondent_phone: Option<String> = None;
    let mut shop_type: Option<String> = None;
    let mut shop_name: Option<String> = None;
    let mut enjoy_most = String::new();
    let mut improve_product = String::new();
    let mut additional_feedback = String::new();

    for field in &payload.data.fields {
        source_fields.insert(field.label.clone(), field.value.clone());

        let is_rating_field = field
            .field_type
            .as_deref()
            .map(|t| t.eq_ignore_ascii_case("RATING"))
            .unwrap_or(false)
            || field.label == "stars";

        if is_rating_field {
            rating = Some(parse_rating(&field.value));
            continue;
        }

        match field.label.as_str() {
            "shop_id" => shop_id = value_as_string(&field.value),
            "email" => respondent_email = value_as_string(&field.value),
            "phone" => respondent_phone = value_as_string(&field.value),
            "shop_type" => shop_type = value_as_string(&field.value),
            "shop_name" => shop_name = value_as_string(&field.value),
            "enjoy_most" => enjoy_most = value_as_string(&field.value).unwrap_or_default(),
            "improve_product" => {
                improve_product = value_as_string(&field.value).unwrap_or_default()
            }
            "additional_feedback" => {
                additional_feedback = value_as_string(&field.value).unwrap_or_default()
            }
            _ => {}
        }
    }

    let shop_id = shop_id.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
        ExtractError::MalformedPayload("shop_id is required".to_string())
    })?;

    Ok(ExtractedReview {
        rating: rating.unwrap_or(0),
        source_fields,
        shop_id,
        respondent_email: respondent_email.filter(|s| !s.trim().is_empty()),
        respondent_phone,
        shop_type: shop_type
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SHOP_TYPE.to_string()),
        shop_name,
        enjoy_most,
        improve_product,
        additional_feedback,
    })
}

fn value_as_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn parse_rating(value: &serde_json::Value) -> u8 {
    match value {
        serde_json::Value::Number(n) => n.as_u64().map(|v| v.min(5) as u8).unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u8>().unwrap_or(0).min(5),
        _ => 0,
    }
}

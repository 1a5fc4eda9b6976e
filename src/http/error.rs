use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::pipeline::PipelineError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook signature did not match")]
    SignatureMismatch,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
    code: u16,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::SignatureMismatch => StatusCode::FORBIDDEN,
            WebhookError::Pipeline(PipelineError::Extract(ExtractError::MalformedPayload(_))) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::Pipeline(PipelineError::Store(StoreError::ShopNotFound { .. }))
            | WebhookError::Pipeline(PipelineError::Store(StoreError::DuplicateReview {
                ..
            })) => StatusCode::BAD_REQUEST,
            WebhookError::Pipeline(PipelineError::Store(StoreError::PersistenceFailed {
                ..
            })) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorBody {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

//! External model adapter errors.

use thiserror::Error;

/// Errors returned by the external model adapter (C1).
///
/// Every failure mode the adapter can hit internally — transport timeout,
/// 503-with-wait-hint, non-2xx, unparseable body — collapses to this one
/// variant once the retry budget (§4.9) is exhausted. Callers never see the
/// vendor's shape.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model endpoint '{endpoint}' unavailable after retries: {message}")]
    Unavailable { endpoint: String, message: String },
}

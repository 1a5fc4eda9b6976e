//! External model adapter (C1): thin, retrying client for the sentiment,
//! zero-shot, and chat-completion endpoints.

pub mod client;
pub mod error;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{HttpModelClient, ModelClient};
pub use error::ModelError;
pub use types::{ChatCompletionRequest, ChatMessage, SentimentPrediction, ZeroShotResult};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockModelClient;

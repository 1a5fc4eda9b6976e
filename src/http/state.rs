use std::sync::Arc;

use crate::pipeline::Pipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub webhook_signing_secret: Option<String>,
}

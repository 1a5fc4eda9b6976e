use thiserror::Error;

use crate::extract::ExtractError;
use crate::store::StoreError;

/// Errors the orchestrator propagates out of the pipeline. Model-adapter
/// failures never appear here: each classifier/enricher stage absorbs its
/// own outage per §4.10, so only extraction and persistence failures can
/// end a run early.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

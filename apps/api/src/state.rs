use std::sync::Arc;

use sqlx::PgPool;

use crate::llm_client::LlmClient;
use crate::screening::evaluator::Evaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Pluggable evaluation backend. Default: LlmEvaluator; the
    /// deterministic fallback scorer answers when it fails.
    pub evaluator: Arc<dyn Evaluator>,
}

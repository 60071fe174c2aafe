use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::EvaluationParser;
use crate::llm_client::InterviewModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model provider. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn InterviewModel>,
    /// Evaluation parser compiled from the configured heading table.
    pub parser: Arc<EvaluationParser>,
    pub config: Config,
}

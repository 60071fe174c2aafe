//! Answer evaluation: asks the model for feedback and parses it.

use tracing::debug;

use crate::errors::AppError;
use crate::evaluation::{EvaluationParser, ParsedEvaluation};
use crate::interview::prompts::evaluation_system;
use crate::llm_client::{ChatMessage, ChatRole, InterviewModel};

/// Evaluates the conversation so far. The client's own system messages are
/// dropped; the evaluation system prompt fixes the output format the parser
/// expects.
///
/// Returns the raw evaluation text together with its parsed form.
pub async fn evaluate_answer(
    model: &dyn InterviewModel,
    parser: &EvaluationParser,
    category: &str,
    conversation: &[ChatMessage],
) -> Result<(String, ParsedEvaluation), AppError> {
    let has_answer = conversation
        .iter()
        .any(|m| m.role == ChatRole::User && !m.content.trim().is_empty());
    if !has_answer {
        return Err(AppError::Validation(
            "an answer is required: send a user message or audioData".to_string(),
        ));
    }

    let messages: Vec<ChatMessage> = std::iter::once(ChatMessage::system(evaluation_system(category)))
        .chain(
            conversation
                .iter()
                .filter(|m| m.role != ChatRole::System)
                .cloned(),
        )
        .collect();

    let raw = model.chat(&messages).await?;
    let parsed = parser.parse(&raw);
    debug!(
        score = parsed.score,
        strengths = parsed.strengths.len(),
        improvements = parsed.improvements.len(),
        missed_points = parsed.missed_points.len(),
        "evaluation parsed"
    );

    Ok((raw, parsed))
}

//! Question generation: asks the model for a question card in a category.

use tracing::debug;

use crate::errors::AppError;
use crate::interview::models::QuestionCard;
use crate::interview::prompts::{question_prompt, question_system};
use crate::llm_client::{strip_json_fences, ChatMessage, ChatRole, InterviewModel};

/// Generates a question for `category`. Previous assistant turns in `history`
/// are passed along so the model avoids repeating itself.
///
/// Returns the raw model text together with the decoded card.
pub async fn generate_question(
    model: &dyn InterviewModel,
    category: &str,
    history: &[ChatMessage],
) -> Result<(String, QuestionCard), AppError> {
    let previous: Vec<&str> = history
        .iter()
        .filter(|m| m.role == ChatRole::Assistant)
        .map(|m| m.content.as_str())
        .collect();

    let messages = [
        ChatMessage::system(question_system()),
        ChatMessage::user(question_prompt(category, &previous)),
    ];

    let raw = model.chat(&messages).await?;
    let card = parse_question_card(&raw)?;
    debug!(hints = card.hints.len(), "question generated");

    Ok((raw, card))
}

/// Decodes the model's JSON reply, tolerating code fences around it.
pub fn parse_question_card(raw: &str) -> Result<QuestionCard, AppError> {
    let mut card: QuestionCard = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| AppError::Llm(format!("Question response was not valid JSON: {e}")))?;

    card.question = card.question.trim().to_string();
    if card.question.is_empty() {
        return Err(AppError::Llm("Question response had an empty question".to_string()));
    }
    card.hints = card
        .hints
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let card = parse_question_card(
            r#"{"question": "Explain the event loop.", "hints": ["microtasks", "call stack"]}"#,
        )
        .unwrap();
        assert_eq!(card.question, "Explain the event loop.");
        assert_eq!(card.hints, vec!["microtasks", "call stack"]);
    }

    #[test]
    fn test_parse_fenced_json_and_trims() {
        let card = parse_question_card(
            "```json\n{\"question\": \"  What is a B-tree? \", \"hints\": [\" pages \", \"\"]}\n```",
        )
        .unwrap();
        assert_eq!(card.question, "What is a B-tree?");
        assert_eq!(card.hints, vec!["pages"]);
    }

    #[test]
    fn test_prose_reply_is_llm_error() {
        let err = parse_question_card("Sure! Here's a question: what is React?").unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[test]
    fn test_empty_question_is_llm_error() {
        let err = parse_question_card(r#"{"question": "   ", "hints": []}"#).unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}

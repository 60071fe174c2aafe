use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::evaluation::ParsedEvaluation;
use crate::llm_client::{AudioClip, ChatMessage};

/// What the client is asking for in a `POST /api/interview` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// A new question with hints for the category.
    Question,
    /// Feedback on the candidate's answer to the last question.
    Evaluation,
}

impl FromStr for RequestType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" => Ok(RequestType::Question),
            "evaluation" | "evaluate" => Ok(RequestType::Evaluation),
            other => Err(AppError::Validation(format!(
                "requestType must be 'question' or 'evaluation', got '{other}'"
            ))),
        }
    }
}

/// The decoded multipart form.
#[derive(Debug, Clone)]
pub struct InterviewForm {
    pub category: String,
    pub request_type: RequestType,
    pub messages: Vec<ChatMessage>,
    pub audio: Option<AudioClip>,
}

/// Question generated for a category. The model is asked to reply with
/// exactly this JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionCard {
    pub question: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredContent {
    Question(QuestionCard),
    Evaluation(ParsedEvaluation),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    /// Raw model text, kept by the client as the conversation history.
    pub response: String,
    pub structured_content: StructuredContent,
    /// Base64-encoded speech for the question, when synthesis is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_type_parses_case_insensitively() {
        assert_eq!("Question".parse::<RequestType>().unwrap(), RequestType::Question);
        assert_eq!(" evaluation ".parse::<RequestType>().unwrap(), RequestType::Evaluation);
        assert_eq!("evaluate".parse::<RequestType>().unwrap(), RequestType::Evaluation);
    }

    #[test]
    fn test_unknown_request_type_is_validation_error() {
        let err = "summary".parse::<RequestType>().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("summary")));
    }

    #[test]
    fn test_question_card_hints_default_empty() {
        let card: QuestionCard = serde_json::from_str(r#"{"question": "What is a mutex?"}"#).unwrap();
        assert!(card.hints.is_empty());
    }

    #[test]
    fn test_response_omits_missing_audio() {
        let response = InterviewResponse {
            response: "Score: 3/5".to_string(),
            structured_content: StructuredContent::Evaluation(ParsedEvaluation::default()),
            audio_data: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("audioData").is_none());
        assert_eq!(json["structuredContent"]["score"], 0.0);
    }
}

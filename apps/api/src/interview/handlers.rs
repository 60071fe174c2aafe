//! Axum route handlers for the Interview API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::interview::categories::{display_name, Category, CATEGORIES};
use crate::interview::evaluate::evaluate_answer;
use crate::interview::models::{
    InterviewForm, InterviewResponse, RequestType, StructuredContent,
};
use crate::interview::question::generate_question;
use crate::llm_client::{AudioClip, ChatMessage};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: &'static [Category],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/categories
pub async fn handle_list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: CATEGORIES,
    })
}

/// POST /api/interview
///
/// Multipart form: `category`, `requestType`, `messages` (JSON array of
/// `{role, content}`), optional `audioData` (recorded answer).
///
/// `question` → a question card, plus base64 speech when TTS is enabled.
/// `evaluation` → the raw evaluation and its parsed form.
pub async fn handle_interview(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<InterviewResponse>, AppError> {
    let form = read_form(multipart).await?;
    let category = display_name(&form.category).to_string();
    info!(
        category = %category,
        request_type = ?form.request_type,
        messages = form.messages.len(),
        has_audio = form.audio.is_some(),
        "interview request"
    );

    match form.request_type {
        RequestType::Question => {
            if form.audio.is_some() {
                debug!("ignoring audioData on a question request");
            }
            let (raw, card) = generate_question(state.llm.as_ref(), &category, &form.messages).await?;

            let audio_data = if state.config.enable_tts {
                match state.llm.speak(&card.question).await {
                    Ok(audio) => Some(STANDARD.encode(&audio)),
                    Err(e) => {
                        warn!("Speech synthesis failed, returning text only: {e}");
                        None
                    }
                }
            } else {
                None
            };

            Ok(Json(InterviewResponse {
                response: raw,
                structured_content: StructuredContent::Question(card),
                audio_data,
            }))
        }
        RequestType::Evaluation => {
            let mut conversation = form.messages;
            if let Some(clip) = form.audio {
                let transcript = state
                    .llm
                    .transcribe(clip)
                    .await
                    .map_err(|e| AppError::Speech(e.to_string()))?;
                debug!(chars = transcript.len(), "answer transcribed");
                conversation.push(ChatMessage::user(transcript));
            }

            let (raw, parsed) =
                evaluate_answer(state.llm.as_ref(), &state.parser, &category, &conversation)
                    .await?;

            Ok(Json(InterviewResponse {
                response: raw,
                structured_content: StructuredContent::Evaluation(parsed),
                audio_data: None,
            }))
        }
    }
}

/// Reads and validates the multipart form.
async fn read_form(mut multipart: Multipart) -> Result<InterviewForm, AppError> {
    let mut category: Option<String> = None;
    let mut request_type: Option<RequestType> = None;
    let mut messages: Vec<ChatMessage> = Vec::new();
    let mut audio: Option<AudioClip> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "category" => category = Some(field.text().await?),
            "requestType" => request_type = Some(field.text().await?.parse()?),
            "messages" => {
                let raw = field.text().await?;
                if !raw.trim().is_empty() {
                    messages = serde_json::from_str(&raw).map_err(|e| {
                        AppError::Validation(format!("messages must be a JSON array of {{role, content}}: {e}"))
                    })?;
                }
            }
            "audioData" => {
                let file_name = field.file_name().unwrap_or("answer.webm").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    audio = Some(AudioClip {
                        bytes,
                        file_name,
                        content_type,
                    });
                }
            }
            other => debug!("ignoring unknown form field '{other}'"),
        }
    }

    let category = category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("category is required".to_string()))?;
    let request_type =
        request_type.ok_or_else(|| AppError::Validation("requestType is required".to_string()))?;

    Ok(InterviewForm {
        category,
        request_type,
        messages,
        audio,
    })
}

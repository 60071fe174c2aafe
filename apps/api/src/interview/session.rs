#![allow(dead_code)]

//! Interview session state machine.
//!
//! The API itself is stateless; clients drive a session through these states
//! and call the API on the transitions marked with a request type.
//!
//! ```text
//! Idle ──AskQuestion──▶ Question            (requestType=question)
//! Question ──BeginAnswer──▶ Answering
//! Question ──AskQuestion──▶ Question         (skip)
//! Answering ──StartRecording──▶ Recording
//! Answering ──StartTyping──▶ Input
//! Recording ──StopRecording──▶ Answering
//! Input ──StartRecording──▶ Recording
//! Answering | Recording | Input ──Submit──▶ Evaluating   (requestType=evaluation)
//! Evaluating ──EvaluationReady──▶ Idle
//! Evaluating ──Failed──▶ Answering           (answer kept, retry allowed)
//! Question ──Failed──▶ Idle
//! any ──Reset──▶ Idle
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No question on screen.
    #[default]
    Idle,
    /// A question is being fetched or shown.
    Question,
    /// The candidate is about to answer and has not picked a mode yet.
    Answering,
    /// Microphone capture is running.
    Recording,
    /// The candidate is typing an answer.
    Input,
    /// The answer was submitted; waiting for feedback.
    Evaluating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    AskQuestion,
    BeginAnswer,
    StartRecording,
    StopRecording,
    StartTyping,
    Submit,
    EvaluationReady,
    Failed,
    Reset,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("event {event:?} is not allowed in state {state:?}")]
    IllegalTransition {
        state: SessionState,
        event: SessionEvent,
    },
}

impl SessionState {
    pub fn apply(self, event: SessionEvent) -> Result<SessionState, SessionError> {
        use SessionEvent as E;
        use SessionState as S;

        let next = match (self, event) {
            (_, E::Reset) => S::Idle,
            (S::Idle | S::Question, E::AskQuestion) => S::Question,
            (S::Question, E::BeginAnswer) => S::Answering,
            (S::Answering | S::Input, E::StartRecording) => S::Recording,
            (S::Recording, E::StopRecording) => S::Answering,
            (S::Answering, E::StartTyping) => S::Input,
            (S::Answering | S::Recording | S::Input, E::Submit) => S::Evaluating,
            (S::Evaluating, E::EvaluationReady) => S::Idle,
            (S::Evaluating, E::Failed) => S::Answering,
            (S::Question, E::Failed) => S::Idle,
            (state, event) => return Err(SessionError::IllegalTransition { state, event }),
        };
        Ok(next)
    }

    /// True while a model call is outstanding for this session.
    pub fn awaiting_model(self) -> bool {
        matches!(self, SessionState::Question | SessionState::Evaluating)
    }

    /// True while the candidate can still change their answer.
    pub fn accepts_answer(self) -> bool {
        matches!(
            self,
            SessionState::Answering | SessionState::Recording | SessionState::Input
        )
    }
}

// All LLM prompt constants for the interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{INTERVIEWER_PERSONA, JSON_ONLY_INSTRUCTION};

/// Question generation prompt template.
/// Replace: {category}, {previous_questions}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Ask the candidate ONE interview question for the category: {category}.

Return a JSON object with this EXACT schema (no extra fields):
{
  "question": "The question, phrased as you would ask it out loud",
  "hints": ["Short hint pointing at a key concept", "Another hint"]
}

Rules:
- The question must be answerable verbally in two to four minutes.
- Give 2 to 4 hints. Hints nudge toward concepts; they never give the answer away.
- Do NOT repeat or closely paraphrase any previously asked question.

PREVIOUSLY ASKED QUESTIONS:
{previous_questions}"#;

/// Evaluation system prompt template. Replace: {category}
///
/// The section headings here are the ones the evaluation parser's default
/// heading table recognizes; keep them in sync.
pub const EVALUATION_SYSTEM_TEMPLATE: &str = r#"You are evaluating a candidate's answer in a {category} practice interview.

Respond in exactly this format, using these headings:

Score: N/5

Strengths:
- point

Areas for Improvement:
- point

Missed Points:
- point

Follow-up Question: one probing question that builds on the answer

Ideal Response:
A concise model answer in markdown. Tag every code block with its language.

Be specific to what the candidate actually said. Scores are whole or half numbers from 0 to 5."#;

pub fn question_system() -> String {
    format!("{INTERVIEWER_PERSONA} {JSON_ONLY_INSTRUCTION}")
}

pub fn question_prompt(category: &str, previous_questions: &[&str]) -> String {
    let previous = if previous_questions.is_empty() {
        "(none)".to_string()
    } else {
        previous_questions
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    QUESTION_PROMPT_TEMPLATE
        .replace("{category}", category)
        .replace("{previous_questions}", &previous)
}

pub fn evaluation_system(category: &str) -> String {
    format!(
        "{INTERVIEWER_PERSONA}\n\n{}",
        EVALUATION_SYSTEM_TEMPLATE.replace("{category}", category)
    )
}

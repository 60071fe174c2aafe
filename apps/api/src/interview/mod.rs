// Interview flow: question generation, answer evaluation and the HTTP
// surface around them. All model calls go through llm_client.

pub mod categories;
pub mod evaluate;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod question;
pub mod session;

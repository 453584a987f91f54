// Interview preparation: CV + job description → questions, STAR answers, tips.
// All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;

//! Interview preparation: builds the prompt and runs it on the resolved backend.

use tracing::info;

use crate::errors::AppError;
use crate::interview::prompts::{
    DEMO_INTERVIEW_RESPONSE, INTERVIEW_PROMPT_TEMPLATE, INTERVIEW_SYSTEM,
};
use crate::llm_client::prompts::{fill_template, VOICE_INSTRUCTION};
use crate::llm_client::Backend;

pub fn build_interview_prompt(cv_text: &str, job_description: &str) -> String {
    fill_template(
        INTERVIEW_PROMPT_TEMPLATE,
        &[
            ("voice_instruction", VOICE_INSTRUCTION),
            ("cv_text", cv_text.trim()),
            ("job_description", job_description.trim()),
        ],
    )
}

/// Returns the preparation text: live LLM output or the canned demo.
pub async fn prepare_interview(
    backend: &Backend,
    cv_text: &str,
    job_description: &str,
) -> Result<String, AppError> {
    match backend {
        Backend::Live(llm) => {
            let prompt = build_interview_prompt(cv_text, job_description);
            let text = llm
                .call(&prompt, INTERVIEW_SYSTEM)
                .await
                .map_err(|e| AppError::Llm(format!("Interview preparation failed: {e}")))?;
            info!("Interview preparation generated ({} chars)", text.len());
            Ok(text)
        }
        Backend::Demo => Ok(DEMO_INTERVIEW_RESPONSE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_fills_all_placeholders() {
        let prompt = build_interview_prompt("  MEd, 3 years teaching  ", "Learning designer");
        assert!(prompt.contains("CV:\nMEd, 3 years teaching\n"));
        assert!(prompt.ends_with("JOB DESCRIPTION:\nLearning designer"));
        assert!(!prompt.contains("{voice_instruction}"));
        assert!(!prompt.contains("{cv_text}"));
    }

    #[test]
    fn test_cv_mentioning_placeholder_is_not_expanded() {
        let prompt = build_interview_prompt("Wrote a {job_description} parser", "Data analyst");
        assert!(prompt.contains("CV:\nWrote a {job_description} parser\n"));
        assert_eq!(prompt.matches("Data analyst").count(), 1);
    }

    #[tokio::test]
    async fn test_demo_backend_returns_canned_preparation() {
        let text = prepare_interview(&Backend::Demo, "cv", "jd").await.unwrap();
        assert!(text.starts_with("# Interview Preparation"));
        assert!(text.contains("STAR"));
    }
}

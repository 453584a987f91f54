// Prompt constants for reading summaries.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{fill_template, FENCED_JSON_INSTRUCTION, VOICE_INSTRUCTION};
use crate::profile::InterestProfile;

/// Characters of PDF text embedded in the prompt.
const MAX_PROMPT_CHARS: usize = 5000;

pub const SUMMARY_SYSTEM: &str = "You help a graduate student in education summarize \
    course readings (articles and book chapters). You extract the real title, the key \
    concepts with short definitions, and what the student would find relevant given \
    their interests. Write in a natural, informal voice.";

/// Replace: {voice_instruction}, {interests}, {format_instruction}, {pdf_text}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze the following text from a PDF article or book chapter about a subject within education.

{voice_instruction}

The reader is interested in: {interests}. Use this to decide what they would find relevant.

{format_instruction}

```json
{
    "article_title": "The actual article/chapter title found in the text (NOT the filename)",
    "key_concepts": "ONLY bullet points with key concepts and definitions - no introductory text",
    "relevance": "ONLY bullet points explaining relevance to the reader's interests - no introductory text"
}
```

RULES:
1. Look for the title inside the content, e.g. "Chapter 1: Introduction" or "The Future of AI in Education"
2. key_concepts and relevance start directly with bullet points (• or *), no lead-in phrases
3. Each bullet point is a complete, standalone statement
4. key_concepts and relevance are STRINGS, not arrays

PDF CONTENT:
{pdf_text}"#;

/// Canned response used in demo mode. Same fenced format the live model is asked for.
pub const DEMO_SUMMARY_RESPONSE: &str = r#"```json
{
    "article_title": "The Future of AI in Education",
    "key_concepts": "• Artificial Intelligence in Education (AIEd) - The use of AI technologies to enhance learning experiences\n• Personalized Learning - Tailoring educational content to individual student needs\n• Learning Analytics - The measurement and analysis of learning data to improve outcomes",
    "relevance": "• Directly relevant to leveraging AI for educational equity\n• Connects to work with marginalized communities and learning design\n• Provides insights into career readiness and K-12 education applications"
}
```"#;

pub fn build_summary_prompt(pdf_text: &str, interests: &InterestProfile) -> String {
    let excerpt = match pdf_text.char_indices().nth(MAX_PROMPT_CHARS) {
        Some((cut, _)) => format!("{}...", &pdf_text[..cut]),
        None => pdf_text.to_string(),
    };

    let interests = interests.to_string();

    fill_template(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            ("voice_instruction", VOICE_INSTRUCTION),
            ("interests", interests.as_str()),
            ("format_instruction", FENCED_JSON_INSTRUCTION),
            ("pdf_text", excerpt.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::extract::extract;

    #[test]
    fn test_prompt_embeds_interests_and_text() {
        let prompt = build_summary_prompt("Paulo Freire argues...", &InterestProfile::default());
        assert!(prompt.contains("marginalized communities"));
        assert!(prompt.contains("Paulo Freire argues..."));
        assert!(!prompt.contains("{pdf_text}"));
        assert!(!prompt.contains("{interests}"));
    }

    #[test]
    fn test_placeholder_text_inside_pdf_is_kept_literally() {
        let prompt = build_summary_prompt(
            "Template syntax such as {interests} appears in chapter 2.",
            &InterestProfile::default(),
        );
        assert!(prompt.contains("Template syntax such as {interests} appears in chapter 2."));
    }

    #[test]
    fn test_long_text_is_cut_for_prompt() {
        let text = "a".repeat(MAX_PROMPT_CHARS + 100);
        let prompt = build_summary_prompt(&text, &InterestProfile::default());
        assert!(prompt.ends_with(&format!("{}...", "a".repeat(MAX_PROMPT_CHARS))));
        assert!(!prompt.contains(&"a".repeat(MAX_PROMPT_CHARS + 1)));
    }

    #[test]
    fn test_demo_response_extracts_cleanly() {
        let summary = extract(DEMO_SUMMARY_RESPONSE, "demo");
        assert_eq!(summary.title, "The Future of AI in Education");
        assert!(summary.key_concepts.starts_with("• Artificial Intelligence in Education"));
        assert_eq!(summary.key_concepts.lines().count(), 3);
        assert!(summary.relevance.contains("K-12"));
    }
}

// All LLM prompt constants for interview preparation.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const INTERVIEW_SYSTEM: &str = "You are an interview coach helping a candidate \
    prepare for a job interview. You have their CV and the job description. \
    Generate relevant questions and answers the candidate can practise, \
    written in the candidate's own voice.";

/// Replace: {voice_instruction}, {cv_text}, {job_description}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Help the candidate prepare for a job interview based on their CV and the job description.

Focus on the skills and experiences from the CV that best match the job description.
Keep answers concise and easy to remember. {voice_instruction}

Produce a full preparation with:
1) A list of potential interview questions
2) Answers in the candidate's voice following the STAR method (Situation, Task, Action, Result)
3) Tips to feel confident, prepared and calm on the day

Format it as a structured, easy-to-scan markdown document with a heading per question.

CV:
{cv_text}

JOB DESCRIPTION:
{job_description}"#;

/// Canned preparation served in demo mode.
pub const DEMO_INTERVIEW_RESPONSE: &str = r#"# Interview Preparation

## Potential Questions:
1. Tell me about yourself and your experience with AI in education.
2. How would you approach designing learning experiences for marginalized communities?
3. Describe a time when you had to adapt your teaching methods for different learning styles.

## Answers (STAR Method):
1. **Situation**: In my previous role, I worked on developing AI-powered educational tools.
**Task**: I needed to create accessible learning platforms for underserved communities.
**Action**: I collaborated with community leaders and educators to understand their specific needs.
**Result**: Successfully launched a program that increased engagement by 40%.

## Tips for Confidence:
- Practice your answers out loud
- Prepare specific examples from your experience
- Research the company's mission and values
- Prepare thoughtful questions to ask them"#;

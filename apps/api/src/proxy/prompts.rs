// All LLM prompt templates for the proxy routes.
// Placeholders in `{braces}` are substituted with `str::replace` before sending.

pub const QUESTIONS_MAX_TOKENS: u32 = 500;
pub const FEEDBACK_MAX_TOKENS: u32 = 150;

/// Feedback replies are cut down to this many sentences regardless of what the model returns.
pub const FEEDBACK_SENTENCES: usize = 2;

pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const DEFAULT_JOB_ROLE: &str = "technical";
pub const DEFAULT_COMPANY: &str = "a company";

/// Question generation prompt. Replace `{amount}`, `{category}`, `{difficulty}`,
/// `{job_role}` and `{company}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"You are an expert interview coach.
Generate {amount} interview questions in the category "{category}" at "{difficulty}" difficulty.
The questions should suit a {job_role} role at {company}.

Return a JSON array of objects, each with the fields: id, text, category, difficulty.
Example:
[
  { "id": 1, "text": "Question text here", "category": "{category}", "difficulty": "{difficulty}" }
]

Output ONLY the JSON array. No markdown code fences, no explanations."#;

/// Answer feedback prompt. Replace `{question}` and `{answer}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an expert interview coach. Given an interview question and the candidate's answer, give clear, concise feedback.

Use exactly 2 short sentences: one thing the candidate did well and one thing they can improve.
Do not use markdown, formatting, or lists.

Question: {question}
Answer: {answer}

Feedback:"#;

pub fn build_questions_prompt(
    amount: u32,
    category: &str,
    difficulty: &str,
    job_role: &str,
    company: &str,
) -> String {
    QUESTIONS_PROMPT_TEMPLATE
        .replace("{amount}", &amount.to_string())
        .replace("{category}", category)
        .replace("{difficulty}", difficulty)
        .replace("{job_role}", job_role)
        .replace("{company}", company)
}

pub fn build_feedback_prompt(question: &str, answer: &str) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

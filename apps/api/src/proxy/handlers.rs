//! Axum route handlers for the proxy API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::api::{
    ChatRequest, ChatResponse, FeedbackRequest, FeedbackResponse, QuestionsRequest,
    QuestionsResponse,
};
use crate::models::interview::{Difficulty, QuestionCategory};
use crate::proxy::normalize::{parse_questions, truncate_sentences};
use crate::proxy::prompts::{
    build_feedback_prompt, build_questions_prompt, DEFAULT_COMPANY, DEFAULT_JOB_ROLE,
    DEFAULT_QUESTION_COUNT, FEEDBACK_MAX_TOKENS, FEEDBACK_SENTENCES, QUESTIONS_MAX_TOKENS,
};
use crate::state::AppState;

/// Returns the trimmed value if present and non-blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/questions
///
/// Generates interview questions. Replies that are not valid JSON are
/// recovered line by line instead of failing the request.
pub async fn handle_questions(
    State(state): State<AppState>,
    payload: Result<Json<QuestionsRequest>, JsonRejection>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let Json(request) = payload?;
    let (Some(category), Some(difficulty)) = (
        non_blank(request.category.as_deref()),
        non_blank(request.difficulty.as_deref()),
    ) else {
        return Err(AppError::Validation(
            "category and difficulty are required".to_string(),
        ));
    };

    let difficulty: Difficulty = difficulty.parse().map_err(|_| {
        AppError::Validation("difficulty must be one of easy, medium, hard".to_string())
    })?;
    // "mixed" and anything unrecognized have no per-question counterpart.
    let fallback_category: QuestionCategory =
        category.parse().unwrap_or(QuestionCategory::General);

    let amount = request.amount().unwrap_or(DEFAULT_QUESTION_COUNT);
    let prompt = build_questions_prompt(
        amount,
        category,
        difficulty.as_str(),
        non_blank(request.job_role.as_deref()).unwrap_or(DEFAULT_JOB_ROLE),
        non_blank(request.company.as_deref()).unwrap_or(DEFAULT_COMPANY),
    );

    let raw = state
        .llm
        .prompt(&prompt, QUESTIONS_MAX_TOKENS)
        .await
        .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

    let questions = parse_questions(&raw, fallback_category, difficulty);
    info!(
        requested = amount,
        returned = questions.len(),
        "Generated interview questions"
    );

    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/feedback
///
/// Returns at most two sentences of feedback on a single answer.
pub async fn handle_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let Json(request) = payload?;
    let (Some(question), Some(answer)) = (
        non_blank(request.question.as_deref()),
        non_blank(request.answer.as_deref()),
    ) else {
        return Err(AppError::Validation(
            "question and answer are required".to_string(),
        ));
    };

    let raw = state
        .llm
        .prompt(&build_feedback_prompt(question, answer), FEEDBACK_MAX_TOKENS)
        .await
        .map_err(|e| AppError::Llm(format!("Feedback generation failed: {e}")))?;

    let feedback = truncate_sentences(&raw, FEEDBACK_SENTENCES);
    debug!(chars = feedback.len(), "Generated answer feedback");

    Ok(Json(FeedbackResponse { feedback }))
}

/// POST /api/chat
///
/// Forwards the message list untouched and returns the first choice verbatim.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    let Some(Value::Array(messages)) = request.messages else {
        return Err(AppError::Validation(
            "Messages array is required".to_string(),
        ));
    };

    let result = state
        .llm
        .complete(&messages, None)
        .await
        .and_then(|completion| completion.into_first_message())
        .map_err(|e| AppError::Llm(format!("Chat completion failed: {e}")))?;

    Ok(Json(ChatResponse { result }))
}

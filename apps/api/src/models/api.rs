//! Request and response bodies shared by the proxy handlers and the
//! practice client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::interview::Question;

/// POST /api/questions body. Every field is optional on the wire so that
/// missing values surface as validation errors rather than extractor rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<u32>,
    /// Older clients send the count under this name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_amount: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl QuestionsRequest {
    /// Requested question count, preferring `numQuestions` when both are sent.
    pub fn amount(&self) -> Option<u32> {
        self.num_questions.or(self.questions_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

/// Chat messages are forwarded untouched, so they stay as raw JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    pub messages: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub result: Value,
}

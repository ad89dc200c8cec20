//! Network client the session controller uses to reach the proxy backend.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::models::api::{FeedbackRequest, FeedbackResponse, QuestionsResponse};
use crate::models::interview::Question;
use crate::session::setup::InterviewConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {0}")]
    Status(u16),
}

/// The two backend operations a session needs. Implement this to run the
/// controller against something other than the HTTP backend.
#[async_trait]
pub trait InterviewApi: Send + Sync {
    async fn fetch_questions(&self, config: &InterviewConfig) -> Result<Vec<Question>, ApiError>;

    async fn fetch_feedback(&self, question: &Question, answer: &str) -> Result<String, ApiError>;
}

/// `InterviewApi` over the proxy's HTTP routes.
#[derive(Clone)]
pub struct HttpInterviewApi {
    client: Client,
    base_url: String,
}

impl HttpInterviewApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, T>(&self, route: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{route}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn fetch_questions(&self, config: &InterviewConfig) -> Result<Vec<Question>, ApiError> {
        let response: QuestionsResponse = self
            .post("/api/questions", &config.to_questions_request())
            .await?;
        Ok(response.questions)
    }

    async fn fetch_feedback(&self, question: &Question, answer: &str) -> Result<String, ApiError> {
        let request = FeedbackRequest {
            question: Some(question.text.clone()),
            answer: Some(answer.to_string()),
        };
        let response: FeedbackResponse = self.post("/api/feedback", &request).await?;
        Ok(response.feedback)
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::models::interview::{Difficulty, QuestionCategory, QuestionId};

    pub fn questions(n: u64) -> Vec<Question> {
        (1..=n)
            .map(|id| Question {
                id: QuestionId::Number(id),
                text: format!("Question {id}?"),
                category: QuestionCategory::Technical,
                difficulty: Difficulty::Easy,
                follow_ups: None,
            })
            .collect()
    }

    /// Scripted backend. Feedback replies are consumed in order; once the
    /// script runs out every answer gets "Good answer.".
    #[derive(Default)]
    pub struct ScriptedApi {
        pub questions: Mutex<VecDeque<Result<Vec<Question>, u16>>>,
        pub feedback: Mutex<VecDeque<Result<String, u16>>>,
        pub feedback_delay: Option<Duration>,
        pub feedback_calls: Mutex<Vec<String>>,
    }

    impl ScriptedApi {
        pub fn with_questions(n: u64) -> Self {
            Self {
                questions: Mutex::new(VecDeque::from([Ok(questions(n))])),
                ..Default::default()
            }
        }

        pub fn push_question_reply(&self, reply: Result<Vec<Question>, u16>) {
            self.questions.lock().unwrap().push_back(reply);
        }

        pub fn push_feedback(&self, reply: Result<&str, u16>) {
            self.feedback
                .lock()
                .unwrap()
                .push_back(reply.map(str::to_string));
        }
    }

    #[async_trait]
    impl InterviewApi for ScriptedApi {
        async fn fetch_questions(&self, _config: &InterviewConfig) -> Result<Vec<Question>, ApiError> {
            self.questions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(503))
                .map_err(ApiError::Status)
        }

        async fn fetch_feedback(&self, _question: &Question, answer: &str) -> Result<String, ApiError> {
            self.feedback_calls.lock().unwrap().push(answer.to_string());
            if let Some(delay) = self.feedback_delay {
                tokio::time::sleep(delay).await;
            }
            self.feedback
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("Good answer.".to_string()))
                .map_err(ApiError::Status)
        }
    }
}

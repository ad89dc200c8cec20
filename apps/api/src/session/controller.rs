//! Interview Session Controller.
//!
//! Owns one session's state: the loaded questions, the current question,
//! the countdown, and the responses recorded so far. Feedback requests are
//! split into `begin_answer` / `finish_answer` so a caller can release the
//! controller while the request is in flight; `finish_answer` drops results
//! that arrive after the session has completed.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::interview::{InterviewSession, Question, Response};
use crate::session::client::{ApiError, InterviewApi};
use crate::session::setup::InterviewConfig;

pub const LOAD_ERROR_MESSAGE: &str = "Could not load questions. Please try again later.";
pub const FEEDBACK_ERROR_MESSAGE: &str = "Failed to generate feedback. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, questions not requested yet.
    Idle,
    Loading,
    /// Question request failed; `start` may be called again.
    LoadFailed,
    Answering,
    AwaitingFeedback,
    Completed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not load questions. Please try again later.")]
    QuestionsUnavailable(#[source] ApiError),

    #[error("No questions available. Try again later.")]
    NoQuestions,

    #[error("session already started")]
    AlreadyStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptyAnswer,
    FeedbackInFlight,
    /// Questions not loaded yet, or the session already completed.
    NotAnswering,
}

/// An answer whose feedback request is in flight.
#[derive(Debug, Clone)]
pub struct PendingAnswer {
    session_id: Uuid,
    index: usize,
    pub question: Question,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(SubmitRejection),
    /// Response recorded; the session moved on to question `next_index`.
    Advanced { next_index: usize },
    /// Response recorded and it was the last question.
    Completed,
    /// Feedback request failed. Nothing was recorded and the answer can be resubmitted.
    Failed,
    /// Feedback arrived after the session had already completed.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is not running: questions not loaded or session already over.
    Inactive,
    Running { seconds_left: u32 },
    /// This tick reached zero and completed the session.
    Expired,
}

pub struct SessionController {
    config: InterviewConfig,
    session: InterviewSession,
    phase: SessionPhase,
    current_index: usize,
    seconds_left: u32,
    last_error: Option<&'static str>,
}

impl SessionController {
    pub fn new(config: InterviewConfig, now: DateTime<Utc>) -> Self {
        let seconds_left = config.countdown_seconds();
        Self {
            config,
            session: InterviewSession::new(now),
            phase: SessionPhase::Idle,
            current_index: 0,
            seconds_left,
            last_error: None,
        }
    }

    /// Requests the questions and moves to the first one. Retryable after a failure.
    pub async fn start(&mut self, api: &dyn InterviewApi) -> Result<usize, SessionError> {
        if !matches!(self.phase, SessionPhase::Idle | SessionPhase::LoadFailed) {
            return Err(SessionError::AlreadyStarted);
        }
        self.phase = SessionPhase::Loading;
        self.last_error = None;

        let result = api.fetch_questions(&self.config).await;
        self.apply_questions(result)
    }

    fn apply_questions(
        &mut self,
        result: Result<Vec<Question>, ApiError>,
    ) -> Result<usize, SessionError> {
        let mut questions = match result {
            Ok(questions) => questions,
            Err(e) => {
                warn!("Question request failed: {e}");
                self.phase = SessionPhase::LoadFailed;
                self.last_error = Some(LOAD_ERROR_MESSAGE);
                return Err(SessionError::QuestionsUnavailable(e));
            }
        };

        if questions.is_empty() {
            self.phase = SessionPhase::LoadFailed;
            self.last_error = Some(LOAD_ERROR_MESSAGE);
            return Err(SessionError::NoQuestions);
        }

        let limit = self.config.num_questions as usize;
        if questions.len() > limit {
            debug!(
                "Backend returned {} questions, keeping {limit}",
                questions.len()
            );
            questions.truncate(limit);
        }

        info!(session_id = %self.session.id, count = questions.len(), "Interview started");
        self.session.questions = questions;
        self.current_index = 0;
        self.seconds_left = self.config.countdown_seconds();
        self.phase = SessionPhase::Answering;
        Ok(self.session.questions.len())
    }

    /// Validates an answer and marks feedback as in flight.
    pub fn begin_answer(&mut self, text: &str) -> Result<PendingAnswer, SubmitRejection> {
        match self.phase {
            SessionPhase::Answering => {}
            SessionPhase::AwaitingFeedback => return Err(SubmitRejection::FeedbackInFlight),
            _ => return Err(SubmitRejection::NotAnswering),
        }

        let answer = text.trim();
        if answer.is_empty() {
            return Err(SubmitRejection::EmptyAnswer);
        }

        let question = self
            .session
            .questions
            .get(self.current_index)
            .cloned()
            .ok_or(SubmitRejection::NotAnswering)?;

        self.phase = SessionPhase::AwaitingFeedback;
        self.last_error = None;
        Ok(PendingAnswer {
            session_id: self.session.id,
            index: self.current_index,
            question,
            answer: answer.to_string(),
        })
    }

    /// Applies the feedback result for `pending`, unless the session has moved on.
    pub fn finish_answer(
        &mut self,
        pending: PendingAnswer,
        result: Result<String, ApiError>,
        now: DateTime<Utc>,
    ) -> SubmitOutcome {
        let still_active = pending.session_id == self.session.id
            && pending.index == self.current_index
            && self.phase == SessionPhase::AwaitingFeedback;
        if !still_active {
            debug!(session_id = %pending.session_id, "Discarding late feedback");
            return SubmitOutcome::Discarded;
        }

        let feedback = match result {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!("Feedback request failed: {e}");
                self.phase = SessionPhase::Answering;
                self.last_error = Some(FEEDBACK_ERROR_MESSAGE);
                return SubmitOutcome::Failed;
            }
        };

        self.session.responses.push(Response {
            question_id: pending.question.id,
            answer: pending.answer,
            feedback: Some(feedback),
            score: None,
        });

        let next_index = self.current_index + 1;
        if next_index < self.session.questions.len() {
            self.current_index = next_index;
            self.phase = SessionPhase::Answering;
            SubmitOutcome::Advanced { next_index }
        } else {
            self.complete(now);
            SubmitOutcome::Completed
        }
    }

    /// Submits an answer and waits for its feedback while holding the controller.
    /// `SessionRunner` splits this in two so the countdown keeps running.
    #[cfg(test)]
    pub async fn submit_answer(
        &mut self,
        api: &dyn InterviewApi,
        text: &str,
        now: impl FnOnce() -> DateTime<Utc>,
    ) -> SubmitOutcome {
        let pending = match self.begin_answer(text) {
            Ok(pending) => pending,
            Err(rejection) => return SubmitOutcome::Rejected(rejection),
        };
        let result = api.fetch_feedback(&pending.question, &pending.answer).await;
        self.finish_answer(pending, result, now())
    }

    /// One second of countdown. Reaching zero completes the session even if
    /// feedback is still in flight.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.timer_running() {
            return TickOutcome::Inactive;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            info!(session_id = %self.session.id, "Time is up");
            self.complete(now);
            return TickOutcome::Expired;
        }
        TickOutcome::Running {
            seconds_left: self.seconds_left,
        }
    }

    /// Ends the session. Only the first call has any effect; returns whether it was this one.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase == SessionPhase::Completed {
            return false;
        }
        self.phase = SessionPhase::Completed;
        self.session.end_time = Some(now.max(self.session.start_time));
        info!(
            session_id = %self.session.id,
            answered = self.session.responses.len(),
            "Interview completed"
        );
        true
    }

    pub fn timer_running(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Answering | SessionPhase::AwaitingFeedback
        )
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_completed() {
            return None;
        }
        self.session.questions.get(self.current_index)
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// Inline error for the step that last failed, cleared on the next attempt.
    pub fn last_error(&self) -> Option<&'static str> {
        self.last_error
    }

    pub fn last_feedback(&self) -> Option<&str> {
        self.session
            .responses
            .last()
            .and_then(|r| r.feedback.as_deref())
    }
}

/// `MM:SS` countdown display.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

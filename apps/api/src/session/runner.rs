//! Async driver for a `SessionController`: runs the one-second countdown in
//! the background and keeps feedback requests from holding the controller.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::interview::InterviewSession;
use crate::session::client::InterviewApi;
use crate::session::controller::{
    SessionController, SessionError, SubmitOutcome, TickOutcome,
};
use crate::session::setup::InterviewConfig;

const TICK: Duration = Duration::from_secs(1);

pub struct SessionRunner {
    controller: Arc<Mutex<SessionController>>,
    api: Arc<dyn InterviewApi>,
    completed: Arc<watch::Sender<bool>>,
    timer: Option<JoinHandle<()>>,
}

impl SessionRunner {
    pub fn new(config: InterviewConfig, api: Arc<dyn InterviewApi>) -> Self {
        let (completed, _) = watch::channel(false);
        Self {
            controller: Arc::new(Mutex::new(SessionController::new(config, Utc::now()))),
            api,
            completed: Arc::new(completed),
            timer: None,
        }
    }

    /// Loads the questions and starts the countdown. Safe to call again after a failure.
    pub async fn start(&mut self) -> Result<usize, SessionError> {
        let count = self.controller.lock().await.start(self.api.as_ref()).await?;
        self.spawn_timer();
        Ok(count)
    }

    fn spawn_timer(&mut self) {
        let controller = Arc::clone(&self.controller);
        let completed = Arc::clone(&self.completed);

        self.timer = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            interval.tick().await; // first tick completes immediately

            loop {
                interval.tick().await;
                match controller.lock().await.tick(Utc::now()) {
                    TickOutcome::Running { .. } => {}
                    TickOutcome::Expired => {
                        completed.send_replace(true);
                        break;
                    }
                    TickOutcome::Inactive => break,
                }
            }
            debug!("Countdown stopped");
        }));
    }

    /// Submits an answer. The controller is unlocked while feedback is fetched,
    /// so the countdown keeps running and may complete the session meanwhile.
    pub async fn submit_answer(&self, text: &str) -> SubmitOutcome {
        let pending = match self.controller.lock().await.begin_answer(text) {
            Ok(pending) => pending,
            Err(rejection) => return SubmitOutcome::Rejected(rejection),
        };

        let result = self
            .api
            .fetch_feedback(&pending.question, &pending.answer)
            .await;

        let outcome = self
            .controller
            .lock()
            .await
            .finish_answer(pending, result, Utc::now());
        if outcome == SubmitOutcome::Completed {
            self.completed.send_replace(true);
        }
        outcome
    }

    /// Like `submit_answer`, but gives up as soon as the session completes
    /// without this answer, e.g. when the countdown runs out mid-request.
    pub async fn submit_until_finished(&self, text: &str) -> Option<SubmitOutcome> {
        tokio::select! {
            outcome = self.submit_answer(text) => Some(outcome),
            _ = self.finished() => None,
        }
    }

    /// Completes the session immediately, e.g. when the user stops early.
    pub async fn end_now(&self) {
        if self.controller.lock().await.complete(Utc::now()) {
            self.completed.send_replace(true);
        }
    }

    /// Shared handle for reading display state (question, countdown, errors).
    pub fn controller(&self) -> &Arc<Mutex<SessionController>> {
        &self.controller
    }

    pub fn is_completed(&self) -> bool {
        *self.completed.borrow()
    }

    /// Resolves once the session completes, by timer or by the last answer.
    pub async fn finished(&self) -> InterviewSession {
        let mut rx = self.completed.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|done| *done).await;
        self.controller.lock().await.session().clone()
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::{Difficulty, InterviewCategory};
    use crate::session::client::fakes::ScriptedApi;
    use crate::session::controller::{SessionPhase, SubmitRejection};

    fn config(num_questions: u32) -> InterviewConfig {
        InterviewConfig {
            duration: 1,
            category: InterviewCategory::Technical,
            difficulty: Difficulty::Easy,
            num_questions,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expires_session() {
        let api = Arc::new(ScriptedApi::with_questions(3));
        let mut runner = SessionRunner::new(config(3), api);
        runner.start().await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!runner.is_completed());
        let left = runner.controller().lock().await.seconds_left();
        assert!((29..=31).contains(&left), "seconds left was {left}");

        let session = runner.finished().await;
        assert!(session.end_time.is_some());
        assert!(session.responses.is_empty());
        assert!(runner.is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_during_feedback_discards_late_result() {
        let api = Arc::new(ScriptedApi {
            feedback_delay: Some(Duration::from_secs(120)),
            ..ScriptedApi::with_questions(2)
        });
        let mut runner = SessionRunner::new(config(2), api.clone());
        runner.start().await.unwrap();

        let outcome = runner.submit_answer("a slow answer").await;

        assert_eq!(outcome, SubmitOutcome::Discarded);
        assert!(runner.is_completed());
        let session = runner.finished().await;
        assert!(session.responses.is_empty());
        assert_eq!(api.feedback_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_until_finished_returns_at_expiry() {
        let api = Arc::new(ScriptedApi {
            feedback_delay: Some(Duration::from_secs(300)),
            ..ScriptedApi::with_questions(2)
        });
        let mut runner = SessionRunner::new(config(2), api);
        runner.start().await.unwrap();

        let began = tokio::time::Instant::now();
        assert_eq!(runner.submit_until_finished("slow").await, None);
        assert!(began.elapsed() < Duration::from_secs(90));
        assert!(runner.is_completed());
        assert!(runner.finished().await.responses.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_until_finished_reports_outcome() {
        let api = Arc::new(ScriptedApi::with_questions(1));
        let mut runner = SessionRunner::new(config(1), api);
        runner.start().await.unwrap();

        assert_eq!(
            runner.submit_until_finished("done").await,
            Some(SubmitOutcome::Completed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_rejected_while_feedback_pending() {
        let api = Arc::new(ScriptedApi {
            feedback_delay: Some(Duration::from_secs(5)),
            ..ScriptedApi::with_questions(2)
        });
        let mut runner = SessionRunner::new(config(2), api);
        runner.start().await.unwrap();

        let (first, second) = tokio::join!(runner.submit_answer("first"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            runner.submit_answer("second").await
        });

        assert_eq!(first, SubmitOutcome::Advanced { next_index: 1 });
        assert_eq!(
            second,
            SubmitOutcome::Rejected(SubmitRejection::FeedbackInFlight)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_answering_all_questions_stops_countdown() {
        let api = Arc::new(ScriptedApi::with_questions(1));
        let mut runner = SessionRunner::new(config(1), api);
        runner.start().await.unwrap();

        assert_eq!(runner.submit_answer("done").await, SubmitOutcome::Completed);
        let session = runner.finished().await;
        assert_eq!(session.responses.len(), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        let controller = runner.controller().lock().await;
        assert_eq!(controller.phase(), SessionPhase::Completed);
        assert_eq!(controller.session().end_time, session.end_time);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_now_completes_once() {
        let api = Arc::new(ScriptedApi::with_questions(3));
        let mut runner = SessionRunner::new(config(3), api);
        runner.start().await.unwrap();
        runner.submit_answer("first").await;

        runner.end_now().await;
        let session = runner.finished().await;
        assert_eq!(session.responses.len(), 1);

        runner.end_now().await;
        assert_eq!(runner.finished().await.end_time, session.end_time);
    }

    #[tokio::test]
    async fn test_failed_load_does_not_start_countdown() {
        let api = Arc::new(ScriptedApi::default());
        let mut runner = SessionRunner::new(config(1), api);
        assert!(runner.start().await.is_err());
        assert!(runner.timer.is_none());
        assert!(!runner.is_completed());
    }
}

use serde::Serialize;

use crate::models::interview::{
    Difficulty, InterviewSession, QuestionCategory, QuestionId, Response,
};
use crate::results::scoring::{average_score, score_feedback, ScoreBand};

/// One answered question as shown in the results breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    /// 1-based position in answer order.
    pub number: usize,
    pub question_id: QuestionId,
    /// `None` when the response references a question the session does not hold.
    pub question_text: Option<String>,
    pub category: Option<QuestionCategory>,
    pub difficulty: Option<Difficulty>,
    pub answer: String,
    pub feedback: Option<String>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub overall_score: u32,
    pub band: ScoreBand,
    pub overall_assessment: String,
    pub questions_count: usize,
    pub answered_count: usize,
    pub duration_minutes: i64,
    pub reviews: Vec<QuestionReview>,
}

/// Builds the results view for a completed session.
///
/// Precomputed `overall_score` and `feedback` on the session take priority
/// over the heuristic score and templated assessment.
pub fn summarize(session: &InterviewSession) -> ResultsSummary {
    let overall_score = session
        .overall_score
        .unwrap_or_else(|| overall_score(&session.responses));
    let duration_minutes = session.elapsed_minutes();

    let overall_assessment = session
        .feedback
        .clone()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| assessment(overall_score, session.responses.len(), duration_minutes));

    ResultsSummary {
        overall_score,
        band: ScoreBand::for_score(overall_score),
        overall_assessment,
        questions_count: session.questions.len(),
        answered_count: session.responses.len(),
        duration_minutes,
        reviews: reviews(session),
    }
}

/// Rounded average of per-response heuristic scores; 0 with no responses.
pub fn overall_score(responses: &[Response]) -> u32 {
    let scores: Vec<u32> = responses
        .iter()
        .map(|r| score_feedback(r.feedback.as_deref()))
        .collect();
    average_score(&scores)
}

fn assessment(score: u32, answered: usize, minutes: i64) -> String {
    match ScoreBand::for_score(score) {
        ScoreBand::Excellent => format!(
            "Excellent work! You answered {answered} questions confidently in {minutes} minutes. \
             Your knowledge and communication skills really stood out."
        ),
        ScoreBand::Good => format!(
            "Good job! You answered {answered} questions in {minutes} minutes and showed solid \
             understanding and communication. With a bit more practice you can reach excellent."
        ),
        ScoreBand::NeedsWork => format!(
            "You answered {answered} questions in {minutes} minutes. There is room to improve \
             your answers and confidence. Review the core concepts and practice common interview \
             questions to raise your score next time."
        ),
    }
}

fn reviews(session: &InterviewSession) -> Vec<QuestionReview> {
    session
        .responses
        .iter()
        .enumerate()
        .map(|(idx, response)| {
            let question = session.question(&response.question_id);
            QuestionReview {
                number: idx + 1,
                question_id: response.question_id.clone(),
                question_text: question.map(|q| q.text.clone()),
                category: question.map(|q| q.category),
                difficulty: question.map(|q| q.difficulty),
                answer: response.answer.clone(),
                feedback: response.feedback.clone(),
                score: score_feedback(response.feedback.as_deref()),
            }
        })
        .collect()
}

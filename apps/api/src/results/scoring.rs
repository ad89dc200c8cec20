use serde::Serialize;

/// Score given to a response that came back without feedback.
pub const NO_FEEDBACK_SCORE: u32 = 50;
/// Score for feedback that matches none of the keyword tiers.
pub const UNMATCHED_SCORE: u32 = 60;

/// Keyword tiers checked in order; the first tier with any substring match wins.
const FEEDBACK_TIERS: &[(&[&str], u32)] = &[
    (&["excellent", "great", "outstanding"], 90),
    (&["good", "solid", "well done"], 75),
    (&["improve", "needs", "weak"], 50),
];

/// Infers a 0–100 score from free-text feedback.
///
/// Matching is a case-insensitive substring test, so "goodbye" counts as "good".
/// Blank feedback counts as no feedback.
pub fn score_feedback(feedback: Option<&str>) -> u32 {
    let Some(feedback) = feedback.filter(|f| !f.trim().is_empty()) else {
        return NO_FEEDBACK_SCORE;
    };
    let lower = feedback.to_lowercase();

    FEEDBACK_TIERS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|&(_, score)| score)
        .unwrap_or(UNMATCHED_SCORE)
}

/// Rounded mean of the given scores. Empty input scores 0.
pub fn average_score(scores: &[u32]) -> u32 {
    if scores.is_empty() {
        return 0;
    }
    let total: u32 = scores.iter().sum();
    (f64::from(total) / scores.len() as f64).round() as u32
}

/// Score band used to pick the assessment wording and result styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent, // >= 85
    Good,      // >= 70
    NeedsWork,
}

impl ScoreBand {
    pub fn for_score(score: u32) -> Self {
        if score >= 85 {
            ScoreBand::Excellent
        } else if score >= 70 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsWork
        }
    }
}

//! Best-effort cleanup of model replies before they are returned to callers.

use serde::Deserialize;
use tracing::warn;

use crate::models::interview::{Difficulty, Question, QuestionCategory, QuestionId};

/// A question as the model actually returns it. Only `text` is mandatory;
/// everything else is filled from the request when absent or unrecognized.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    id: Option<QuestionId>,
    text: String,
    category: Option<String>,
    difficulty: Option<String>,
    #[serde(default, alias = "follow_ups")]
    follow_ups: Option<Vec<String>>,
}

impl RawQuestion {
    fn into_question(
        self,
        index: usize,
        category: QuestionCategory,
        difficulty: Difficulty,
    ) -> Question {
        Question {
            id: self.id.unwrap_or(QuestionId::Number(index as u64 + 1)),
            text: self.text,
            category: self
                .category
                .and_then(|c| c.parse().ok())
                .unwrap_or(category),
            difficulty: self
                .difficulty
                .and_then(|d| d.parse().ok())
                .unwrap_or(difficulty),
            follow_ups: self.follow_ups,
        }
    }
}

/// Turns the model's question reply into questions.
///
/// Strict JSON is preferred. When the reply does not parse as an array of
/// questions, every non-empty line becomes its own question with a sequential
/// id and the requested category and difficulty.
pub fn parse_questions(
    raw: &str,
    category: QuestionCategory,
    difficulty: Difficulty,
) -> Vec<Question> {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<Vec<RawQuestion>>(cleaned) {
        Ok(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| item.into_question(idx, category, difficulty))
            .collect(),
        Err(e) => {
            warn!("Question JSON parse failed, falling back to line parsing: {e}");
            questions_from_lines(cleaned, category, difficulty)
        }
    }
}

fn questions_from_lines(
    text: &str,
    category: QuestionCategory,
    difficulty: Difficulty,
) -> Vec<Question> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(idx, line)| Question {
            id: QuestionId::Number(idx as u64 + 1),
            text: line.to_string(),
            category,
            difficulty,
            follow_ups: None,
        })
        .collect()
}

/// Keeps the first `max` sentences of `text`.
///
/// A sentence ends at `.`, `!` or `?` when followed by whitespace. Kept
/// sentences are re-joined with a single space.
pub fn truncate_sentences(text: &str, max: usize) -> String {
    let text = text.trim();
    let mut segments: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        match chars.peek() {
            Some(&(_, next)) if next.is_whitespace() => {}
            _ => continue,
        }

        segments.push(&text[start..i + c.len_utf8()]);
        if segments.len() >= max {
            break;
        }

        while let Some(&(_, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            chars.next();
        }
        start = chars.peek().map(|&(j, _)| j).unwrap_or(text.len());
    }

    if segments.len() < max && start < text.len() {
        segments.push(&text[start..]);
    }
    segments.truncate(max);
    segments.join(" ")
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n[{\"text\": \"q\"}]\n```";
        assert_eq!(strip_code_fences(input), "[{\"text\": \"q\"}]");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n[]\n```";
        assert_eq!(strip_code_fences(input), "[]");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        assert_eq!(strip_code_fences("  []  "), "[]");
    }

    #[test]
    fn test_parse_questions_strict_json() {
        let raw = r#"```json
[
  {"id": 1, "text": "What is a closure?", "category": "technical", "difficulty": "easy"},
  {"id": "b", "text": "Describe a conflict.", "category": "Behavioral", "difficulty": "HARD"}
]
```"#;
        let questions = parse_questions(raw, QuestionCategory::Technical, Difficulty::Easy);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, QuestionId::Number(1));
        assert_eq!(questions[1].id, QuestionId::Text("b".to_string()));
        assert_eq!(questions[1].category, QuestionCategory::Behavioral);
        assert_eq!(questions[1].difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_parse_questions_fills_missing_fields_from_request() {
        let raw = r#"[{"text": "First?"}, {"text": "Second?", "category": "mixed"}]"#;
        let questions = parse_questions(raw, QuestionCategory::General, Difficulty::Medium);
        assert_eq!(questions[0].id, QuestionId::Number(1));
        assert_eq!(questions[1].id, QuestionId::Number(2));
        assert_eq!(questions[1].category, QuestionCategory::General);
        assert_eq!(questions[1].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_malformed_payload_falls_back_to_lines() {
        let raw = "1. Tell me about yourself.\n\n2. Why this company?\n3. Where do you see yourself in five years?\n";
        let questions = parse_questions(raw, QuestionCategory::Technical, Difficulty::Easy);

        assert_eq!(questions.len(), 3);
        for (idx, q) in questions.iter().enumerate() {
            assert_eq!(q.id, QuestionId::Number(idx as u64 + 1));
            assert_eq!(q.category, QuestionCategory::Technical);
            assert_eq!(q.difficulty, Difficulty::Easy);
        }
        assert_eq!(questions[1].text, "2. Why this company?");
    }

    #[test]
    fn test_json_object_instead_of_array_falls_back() {
        let raw = r#"{"questions": []}"#;
        let questions = parse_questions(raw, QuestionCategory::Situational, Difficulty::Hard);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, raw);
    }

    #[test]
    fn test_truncate_keeps_first_two_sentences() {
        let text = "Great structure. You could add metrics! Also mention testing? Done.";
        assert_eq!(
            truncate_sentences(text, 2),
            "Great structure. You could add metrics!"
        );
    }

    #[test]
    fn test_truncate_collapses_whitespace_between_sentences() {
        let text = "  Clear answer.\n\n  Add an example.  ";
        assert_eq!(truncate_sentences(text, 2), "Clear answer. Add an example.");
    }

    #[test]
    fn test_truncate_ignores_punctuation_without_following_space() {
        let text = "Mentioned v1.2 and node.js well. Expand on trade-offs. Nice.";
        assert_eq!(
            truncate_sentences(text, 2),
            "Mentioned v1.2 and node.js well. Expand on trade-offs."
        );
    }

    #[test]
    fn test_truncate_short_reply_unchanged() {
        assert_eq!(truncate_sentences("Solid answer", 2), "Solid answer");
        assert_eq!(truncate_sentences("One. Two.", 2), "One. Two.");
        assert_eq!(truncate_sentences("", 2), "");
    }
}

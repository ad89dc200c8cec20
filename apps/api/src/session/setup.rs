//! Interview setup: configuration defaults, offered options, and the job-role
//! categorizer that narrows which interview categories make sense.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::api::QuestionsRequest;
use crate::models::interview::{Difficulty, InterviewCategory};

pub const DURATION_OPTIONS: [u32; 4] = [15, 30, 45, 60];
pub const QUESTION_COUNT_OPTIONS: [u32; 4] = [3, 5, 7, 10];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("duration must be at least one minute")]
    ZeroDuration,

    #[error("at least one question is required")]
    NoQuestions,
}

/// User-chosen session settings. Immutable once the interview starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewConfig {
    /// Minutes.
    pub duration: u32,
    pub category: InterviewCategory,
    pub difficulty: Difficulty,
    pub job_role: Option<String>,
    pub company: Option<String>,
    pub num_questions: u32,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            duration: 30,
            category: InterviewCategory::Mixed,
            difficulty: Difficulty::Medium,
            job_role: None,
            company: None,
            num_questions: 5,
        }
    }
}

impl InterviewConfig {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.duration == 0 {
            return Err(SetupError::ZeroDuration);
        }
        if self.num_questions == 0 {
            return Err(SetupError::NoQuestions);
        }
        Ok(())
    }

    pub fn countdown_seconds(&self) -> u32 {
        self.duration.saturating_mul(60)
    }

    /// Categories worth offering for the configured job role.
    pub fn allowed_categories(&self) -> &'static [InterviewCategory] {
        match self.job_role.as_deref().map(str::trim) {
            None | Some("") => ALL_CATEGORIES,
            Some(role) => RoleCategory::from_job_role(role).allowed_categories(),
        }
    }

    /// Snaps `category` to the first allowed option when the job role rules it out.
    /// Returns true if the category changed.
    pub fn reconcile_category(&mut self) -> bool {
        let allowed = self.allowed_categories();
        if allowed.contains(&self.category) {
            return false;
        }
        self.category = allowed[0];
        true
    }

    pub fn to_questions_request(&self) -> QuestionsRequest {
        QuestionsRequest {
            num_questions: Some(self.num_questions),
            questions_amount: None,
            category: Some(self.category.as_str().to_string()),
            difficulty: Some(self.difficulty.as_str().to_string()),
            job_role: non_blank(self.job_role.as_deref()),
            company: non_blank(self.company.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

const ALL_CATEGORIES: &[InterviewCategory] = &[
    InterviewCategory::Technical,
    InterviewCategory::Behavioral,
    InterviewCategory::Mixed,
];
const TECHNICAL_CATEGORIES: &[InterviewCategory] =
    &[InterviewCategory::Technical, InterviewCategory::Mixed];
const BEHAVIORAL_CATEGORIES: &[InterviewCategory] =
    &[InterviewCategory::Behavioral, InterviewCategory::Mixed];

const TECH_KEYWORDS: &[&str] = &[
    "software",
    "developer",
    "engineer",
    "programmer",
    "data",
    "backend",
    "frontend",
    "fullstack",
    "devops",
    "qa",
    "tester",
    "architect",
    "sysadmin",
    "it",
    "technology",
    "cloud",
    "machine learning",
    "ai",
];

const MARKETING_KEYWORDS: &[&str] = &[
    "marketing",
    "seo",
    "content",
    "brand",
    "advertising",
    "digital marketing",
    "social media",
    "growth",
    "product marketing",
];

const SALES_KEYWORDS: &[&str] = &[
    "sales",
    "account",
    "business development",
    "bdm",
    "client",
    "customer success",
    "crm",
];

const CUSTOMER_FACING_KEYWORDS: &[&str] = &[
    "store",
    "retail",
    "cashier",
    "sales associate",
    "mcdonalds",
    "restaurant",
    "waiter",
    "waitress",
    "server",
    "barista",
    "food service",
    "fast food",
    "grocery",
    "stock clerk",
    "warehouse",
];

/// Coarse bucket for a free-text job role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCategory {
    Technical,
    Marketing,
    Sales,
    CustomerFacing,
    Other,
}

impl RoleCategory {
    /// Case-insensitive substring match against keyword lists, checked in
    /// the order technical, marketing, sales, customer-facing.
    ///
    /// Short keywords such as "it" and "ai" match inside unrelated words.
    pub fn from_job_role(role: &str) -> Self {
        let lower = role.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|kw| lower.contains(kw));

        if matches(TECH_KEYWORDS) {
            RoleCategory::Technical
        } else if matches(MARKETING_KEYWORDS) {
            RoleCategory::Marketing
        } else if matches(SALES_KEYWORDS) {
            RoleCategory::Sales
        } else if matches(CUSTOMER_FACING_KEYWORDS) {
            RoleCategory::CustomerFacing
        } else {
            RoleCategory::Other
        }
    }

    pub fn allowed_categories(&self) -> &'static [InterviewCategory] {
        match self {
            RoleCategory::Technical => TECHNICAL_CATEGORIES,
            RoleCategory::Marketing | RoleCategory::Sales | RoleCategory::CustomerFacing => {
                BEHAVIORAL_CATEGORIES
            }
            RoleCategory::Other => ALL_CATEGORIES,
        }
    }
}

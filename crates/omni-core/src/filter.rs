use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::question::{QuestionDetail, QuestionTag};

/// Selection offered by the "Question Responses" filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    #[default]
    All,
    Social,
    Future,
    Coping,
    Discrepant,
}

/// Menu order of the filter options.
pub const FILTER_OPTIONS: [FilterType; 5] = [
    FilterType::All,
    FilterType::Social,
    FilterType::Future,
    FilterType::Coping,
    FilterType::Discrepant,
];

impl FilterType {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::All => "All",
            FilterType::Social => "Social",
            FilterType::Future => "Future",
            FilterType::Coping => "Coping",
            FilterType::Discrepant => "Discrepant",
        }
    }

    pub fn matches(self, question: &QuestionDetail) -> bool {
        match self {
            FilterType::All => true,
            FilterType::Discrepant => question.is_discrepant,
            FilterType::Social => question.tag == QuestionTag::Social,
            FilterType::Future => question.tag == QuestionTag::Future,
            FilterType::Coping => question.tag == QuestionTag::Coping,
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FILTER_OPTIONS
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownFilter(s.to_string()))
    }
}

/// Questions shown under `filter`, in their original order.
pub fn filter_questions(questions: &[QuestionDetail], filter: FilterType) -> Vec<&QuestionDetail> {
    questions.iter().filter(|q| filter.matches(q)).collect()
}

pub fn find_question(questions: &[QuestionDetail], id: u32) -> Option<&QuestionDetail> {
    questions.iter().find(|q| q.id == id)
}

/// Parse the leading decimal digits of a question id string.
///
/// `"13"` and `"13b"` both give 13; a string without leading digits gives
/// `None`.
pub fn parse_question_id(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().ok()
}

/// Resolve a discrepant-item id to its question.
pub fn resolve_question<'a>(
    questions: &'a [QuestionDetail],
    raw_id: &str,
) -> Result<&'a QuestionDetail, CoreError> {
    parse_question_id(raw_id)
        .and_then(|id| find_question(questions, id))
        .ok_or_else(|| CoreError::UnknownQuestion(raw_id.to_string()))
}

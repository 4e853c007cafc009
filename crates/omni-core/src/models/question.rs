use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of steps on the answer scale the popup marker is placed on.
const MARKER_STEPS: f64 = 4.0;

/// Grouping a question is filed under in the response list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionTag {
    Social,
    Future,
    Coping,
    Discrepant,
}

impl QuestionTag {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionTag::Social => "Social",
            QuestionTag::Future => "Future",
            QuestionTag::Coping => "Coping",
            QuestionTag::Discrepant => "Discrepant",
        }
    }
}

impl fmt::Display for QuestionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single survey question with the child's and the parent's answers.
///
/// Both respondents answer on the same option scale; the indices point into
/// `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    pub id: u32,
    pub category: String,

    pub child_text: String,
    pub child_answer: String,
    pub child_answer_index: usize,

    pub parent_text: String,
    pub parent_answer: String,
    pub parent_answer_index: usize,

    pub options: Vec<String>,

    pub tag: QuestionTag,
    pub is_discrepant: bool,
}

/// How the child's answer reads at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerTone {
    Favourable,
    Concerning,
    Neutral,
}

const FAVOURABLE_MARKERS: &[&str] = &["easy", "not bother", "never", "excellent", "very well"];
const CONCERNING_MARKERS: &[&str] = &["hard", "often", "terrible"];

impl QuestionDetail {
    pub fn answer_tone(&self) -> AnswerTone {
        let answer = self.child_answer.to_lowercase();
        if FAVOURABLE_MARKERS.iter().any(|m| answer.contains(m)) {
            AnswerTone::Favourable
        } else if CONCERNING_MARKERS.iter().any(|m| answer.contains(m)) {
            AnswerTone::Concerning
        } else {
            AnswerTone::Neutral
        }
    }

    fn scale_percent(&self, index: usize) -> f64 {
        if self.options.is_empty() {
            return 0.0;
        }
        (index + 1) as f64 / self.options.len() as f64 * 100.0
    }

    /// Fill of the child's comparison bar.
    pub fn child_percent(&self) -> f64 {
        self.scale_percent(self.child_answer_index)
    }

    /// Fill of the parent's comparison bar.
    pub fn parent_percent(&self) -> f64 {
        self.scale_percent(self.parent_answer_index)
    }

    /// Horizontal position of the child marker on the five-point popup scale.
    pub fn child_marker(&self) -> f64 {
        self.child_answer_index as f64 / MARKER_STEPS * 100.0
    }

    pub fn parent_marker(&self) -> f64 {
        self.parent_answer_index as f64 / MARKER_STEPS * 100.0
    }

    /// Distance between the two answers on the option scale.
    pub fn answer_gap(&self) -> usize {
        self.child_answer_index.abs_diff(self.parent_answer_index)
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(child_answer: &str, child_index: usize, parent_index: usize) -> QuestionDetail {
        QuestionDetail {
            id: 1,
            category: "Coping Adjustments".to_string(),
            child_text: "How easy is it to talk about your feelings?".to_string(),
            child_answer: child_answer.to_string(),
            child_answer_index: child_index,
            parent_text: "Does your child find it easy to talk about their feelings?".to_string(),
            parent_answer: "Quite hard".to_string(),
            parent_answer_index: parent_index,
            options: ["Very easy", "Quite easy", "Not easy but not hard", "Quite hard", "Very hard"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tag: QuestionTag::Coping,
            is_discrepant: false,
        }
    }

    #[test]
    fn favourable_markers_win_over_concerning() {
        // "Not easy but not hard" contains both "easy" and "hard".
        assert_eq!(question("Not easy but not hard", 2, 2).answer_tone(), AnswerTone::Favourable);
        assert_eq!(question("Very often", 4, 4).answer_tone(), AnswerTone::Concerning);
        assert_eq!(question("Sometimes", 2, 2).answer_tone(), AnswerTone::Neutral);
        assert_eq!(question("It does not bother me at all", 0, 0).answer_tone(), AnswerTone::Favourable);
    }

    #[test]
    fn bar_fill_counts_the_selected_option() {
        let q = question("Quite easy", 1, 3);
        assert_eq!(q.child_percent(), 40.0);
        assert_eq!(q.parent_percent(), 80.0);
    }

    #[test]
    fn markers_span_the_scale() {
        let q = question("Very easy", 0, 4);
        assert_eq!(q.child_marker(), 0.0);
        assert_eq!(q.parent_marker(), 100.0);
        assert_eq!(q.answer_gap(), 4);
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(question("Quite easy", 1, 2)).unwrap();
        assert_eq!(json["childAnswerIndex"], 1);
        assert_eq!(json["isDiscrepant"], false);
        assert_eq!(json["tag"], "Coping");
    }
}

//! Interaction state of the dashboard views.
//!
//! Each struct mirrors one interactive surface: the page itself (filter
//! menu, discrepancy popup, chat panel), a question card and a score card.
//! None of it is persisted.

use std::fmt;
use std::str::FromStr;

use omni_core::error::CoreError;
use omni_core::filter::{FilterType, filter_questions, find_question, parse_question_id};
use omni_core::models::question::QuestionDetail;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    active_filter: FilterType,
    filter_open: bool,
    selected_discrepancy: Option<u32>,
    chat_open: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_filter(&self) -> FilterType {
        self.active_filter
    }

    pub fn is_filter_open(&self) -> bool {
        self.filter_open
    }

    pub fn toggle_filter_menu(&mut self) {
        self.filter_open = !self.filter_open;
    }

    /// Apply `filter` and close the menu.
    pub fn select_filter(&mut self, filter: FilterType) {
        self.active_filter = filter;
        self.filter_open = false;
    }

    pub fn visible_questions<'a>(&self, questions: &'a [QuestionDetail]) -> Vec<&'a QuestionDetail> {
        filter_questions(questions, self.active_filter)
    }

    /// Open the comparison popup for a discrepant-response pill. Ids that
    /// do not resolve to a question leave the selection unchanged.
    pub fn click_discrepancy(&mut self, questions: &[QuestionDetail], id: &str) -> bool {
        match parse_question_id(id).filter(|id| find_question(questions, *id).is_some()) {
            Some(id) => {
                self.selected_discrepancy = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn selected_question<'a>(&self, questions: &'a [QuestionDetail]) -> Option<&'a QuestionDetail> {
        self.selected_discrepancy
            .and_then(|id| find_question(questions, id))
    }

    pub fn close_popup(&mut self) {
        self.selected_discrepancy = None;
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn open_chat(&mut self) {
        self.chat_open = true;
    }

    pub fn close_chat(&mut self) {
        self.chat_open = false;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionCardState {
    expanded: bool,
    show_parent: bool,
}

impl QuestionCardState {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// The peek toggle only exists on a collapsed card.
    pub fn toggle_parent_peek(&mut self) -> bool {
        if self.expanded {
            return false;
        }
        self.show_parent = !self.show_parent;
        true
    }

    pub fn parent_peek_visible(&self) -> bool {
        !self.expanded && self.show_parent
    }
}

/// Which comparison bars a score card shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetricFilter {
    #[default]
    All,
    Child,
    Parent,
    Diff,
}

impl MetricFilter {
    pub const ALL: [MetricFilter; 4] = [
        MetricFilter::All,
        MetricFilter::Child,
        MetricFilter::Parent,
        MetricFilter::Diff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricFilter::All => "all",
            MetricFilter::Child => "child",
            MetricFilter::Parent => "parent",
            MetricFilter::Diff => "diff",
        }
    }
}

impl fmt::Display for MetricFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownFilter(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreCardState {
    pub expanded: bool,
    pub show_explanation: bool,
    pub metric_filter: MetricFilter,
}

impl ScoreCardState {
    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn toggle_explanation(&mut self) {
        self.show_explanation = !self.show_explanation;
    }

    pub fn set_filter(&mut self, filter: MetricFilter) {
        self.metric_filter = filter;
    }

    pub fn shows_child_bar(&self) -> bool {
        matches!(self.metric_filter, MetricFilter::All | MetricFilter::Child)
    }

    pub fn shows_parent_bar(&self) -> bool {
        matches!(self.metric_filter, MetricFilter::All | MetricFilter::Parent)
    }

    pub fn shows_diff_bar(&self) -> bool {
        self.metric_filter == MetricFilter::Diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use omni_core::dataset::Dataset;

    #[test]
    fn selecting_a_filter_closes_the_menu() {
        let mut page = DashboardState::new();
        page.toggle_filter_menu();
        assert!(page.is_filter_open());

        page.select_filter(FilterType::Coping);
        assert!(!page.is_filter_open());
        let ids: Vec<u32> = page
            .visible_questions(&Dataset::fixture().questions)
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, [1, 24]);
    }

    #[test]
    fn unknown_discrepancy_keeps_selection() {
        let questions = &Dataset::fixture().questions;
        let mut page = DashboardState::new();

        assert!(page.click_discrepancy(questions, "13"));
        assert!(!page.click_discrepancy(questions, "99"));
        assert!(!page.click_discrepancy(questions, "Q8"));
        assert_eq!(page.selected_question(questions).map(|q| q.id), Some(13));

        page.close_popup();
        assert!(page.selected_question(questions).is_none());
    }

    #[test]
    fn chat_panel_toggles() {
        let mut page = DashboardState::new();
        page.open_chat();
        assert!(page.is_chat_open());
        page.close_chat();
        assert!(!page.is_chat_open());
    }

    #[test]
    fn peek_only_while_collapsed() {
        let mut card = QuestionCardState::default();
        assert!(card.toggle_parent_peek());
        assert!(card.parent_peek_visible());

        card.toggle_expanded();
        assert!(!card.parent_peek_visible());
        assert!(!card.toggle_parent_peek());

        card.toggle_expanded();
        assert!(card.parent_peek_visible());
    }

    #[test]
    fn metric_filter_controls_bars() {
        let mut card = ScoreCardState::default();
        assert!(card.shows_child_bar() && card.shows_parent_bar() && !card.shows_diff_bar());

        card.set_filter(MetricFilter::Parent);
        assert!(!card.shows_child_bar() && card.shows_parent_bar());

        card.set_filter(MetricFilter::Diff);
        assert!(!card.shows_child_bar() && !card.shows_parent_bar() && card.shows_diff_bar());
    }

    #[test]
    fn metric_filter_parses() {
        assert_eq!("DIFF".parse::<MetricFilter>().unwrap(), MetricFilter::Diff);
        assert!("both".parse::<MetricFilter>().is_err());
    }
}

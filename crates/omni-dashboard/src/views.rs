//! Text rendering of the dashboard and the chat panel.
//!
//! Every view is a Tera template fed a small serializable view model. The
//! view models do the arithmetic (bar fills, number formatting, marker
//! positions) so the templates only lay text out.

use serde::Serialize;
use tera::{Context, Tera};

use omni_core::dataset::Dataset;
use omni_core::filter::FILTER_OPTIONS;
use omni_core::models::discrepancy::DiscrepantItem;
use omni_core::models::profile::Profile;
use omni_core::models::question::{AnswerTone, QuestionDetail};
use omni_core::models::score::{CategoryScore, diff_bar, format_signed};
use omni_core::models::transcript::{Feedback, MessageRole, Sentiment, TranscriptMessage};
use omni_directives::{Block, RenderedMessage, VizKind, VizPoint, render_message};

use crate::error::DashboardError;
use crate::state::{DashboardState, MetricFilter, QuestionCardState, ScoreCardState};

const TEMPLATES: [(&str, &str); 8] = [
    ("profile.txt", include_str!("../templates/profile.txt")),
    ("score_card.txt", include_str!("../templates/score_card.txt")),
    ("discrepant.txt", include_str!("../templates/discrepant.txt")),
    ("question_list.txt", include_str!("../templates/question_list.txt")),
    ("question_card.txt", include_str!("../templates/question_card.txt")),
    ("popup.txt", include_str!("../templates/popup.txt")),
    ("chat_message.txt", include_str!("../templates/chat_message.txt")),
    ("blocks.txt", include_str!("../templates/blocks.txt")),
];

const BAR_WIDTH: usize = 20;
const DIFF_TRACK_WIDTH: usize = 40;
const SPECTRUM_WIDTH: usize = 40;

/// Horizontal bar filled to `percent` of [`BAR_WIDTH`].
pub fn bar(percent: f64) -> String {
    let filled = (percent.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// The centred -100..+100 difference track.
pub fn diff_track(diff: f64) -> String {
    let geometry = diff_bar(diff);
    let cols = DIFF_TRACK_WIDTH as f64;
    let start = (geometry.margin_left.clamp(0.0, 100.0) / 100.0 * cols).round() as usize;
    let mut len = (geometry.width.min(100.0) / 100.0 * cols).round() as usize;
    if diff != 0.0 {
        len = len.max(1);
    }
    let end = (start + len).min(DIFF_TRACK_WIDTH);

    (0..=DIFF_TRACK_WIDTH)
        .map(|i| {
            if i >= start && i < end {
                '█'
            } else if i == DIFF_TRACK_WIDTH / 2 {
                '│'
            } else {
                '─'
            }
        })
        .collect()
}

/// The five-point answer scale with child (`C`) and parent (`P`) markers;
/// `*` where both chose the same option.
pub fn spectrum(question: &QuestionDetail) -> String {
    let position = |marker: f64| (marker / 100.0 * SPECTRUM_WIDTH as f64).round() as usize;
    let child = position(question.child_marker());
    let parent = position(question.parent_marker());

    (0..=SPECTRUM_WIDTH)
        .map(|i| match (i == child, i == parent) {
            (true, true) => '*',
            (true, false) => 'C',
            (false, true) => 'P',
            _ if i % (SPECTRUM_WIDTH / 4) == 0 => '┼',
            _ => '─',
        })
        .collect()
}

fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Positive Tone",
        Sentiment::Neutral => "Neutral Tone",
        Sentiment::Negative => "Concern Detected",
    }
}

fn tone_label(tone: AnswerTone) -> &'static str {
    match tone {
        AnswerTone::Favourable => "favourable",
        AnswerTone::Concerning => "concerning",
        AnswerTone::Neutral => "neutral",
    }
}

#[derive(Serialize)]
struct ProfileView<'a> {
    name: &'a str,
    role: &'a str,
    relationship: &'a str,
    submission_date: &'a str,
}

#[derive(Serialize)]
struct MetricView<'a> {
    label: &'a str,
    value: String,
    tooltip: String,
}

#[derive(Serialize)]
struct OptionView {
    name: String,
    active: bool,
}

#[derive(Serialize)]
struct ScoreCardView<'a> {
    title: &'a str,
    metrics: Vec<MetricView<'a>>,
    show_explanation: bool,
    child: String,
    parent: String,
    diff: String,
    interpretation: &'static str,
    expanded: bool,
    filters: Vec<OptionView>,
    show_child: bool,
    show_parent: bool,
    show_diff: bool,
    child_bar: String,
    parent_bar: String,
    diff_track: String,
}

#[derive(Serialize)]
struct QuestionCardView<'a> {
    id: u32,
    discrepant: bool,
    tag: &'static str,
    child_text: &'a str,
    child_answer: &'a str,
    tone: &'static str,
    parent_peek: bool,
    parent_answer: &'a str,
    expanded: bool,
    child_bar: String,
    parent_bar: String,
    child_option: usize,
    parent_option: usize,
    first_option: &'a str,
    last_option: &'a str,
    parent_text: &'a str,
}

#[derive(Serialize)]
struct QuestionListView {
    filter: &'static str,
    filter_open: bool,
    options: Vec<OptionView>,
    cards: Vec<String>,
}

#[derive(Serialize)]
struct PopupView<'a> {
    id: u32,
    child_text: &'a str,
    child_answer: &'a str,
    parent_text: &'a str,
    parent_answer: &'a str,
    spectrum: String,
    first_option: &'a str,
    last_option: &'a str,
    gap_note: String,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum BlockView<'a> {
    Spacer,
    Header {
        text: &'a str,
    },
    Bullet {
        text: &'a str,
    },
    Paragraph {
        text: &'a str,
    },
    Score {
        label: &'a str,
        badge: String,
        child: String,
        parent: String,
        child_bar: String,
        parent_bar: String,
        context: String,
    },
    Viz {
        title: &'a str,
        caption: &'static str,
        points: Vec<String>,
    },
    Insight {
        text: &'a str,
    },
    Pending {
        directive: &'static str,
    },
}

impl<'a> BlockView<'a> {
    fn from_block(block: &'a Block, subject: &str) -> Self {
        match block {
            Block::Spacer => BlockView::Spacer,
            Block::Header { text } => BlockView::Header { text },
            Block::Bullet { text } => BlockView::Bullet { text },
            Block::Paragraph { text } => BlockView::Paragraph { text },
            Block::Score(chart) => BlockView::Score {
                label: &chart.label,
                badge: chart.badge(),
                child: chart.child.to_string(),
                parent: chart.parent.to_string(),
                child_bar: bar(chart.child_width()),
                parent_bar: bar(chart.parent_width()),
                context: chart.clinical_context(subject),
            },
            Block::Viz(spec) => BlockView::Viz {
                title: &spec.title,
                caption: match spec.kind {
                    VizKind::Line => "Trend Tracking",
                    VizKind::Bar => "Snapshot",
                },
                points: spec.data.iter().map(viz_point_line).collect(),
            },
            Block::Insight { text } => BlockView::Insight { text },
            Block::Pending { directive } => BlockView::Pending {
                directive: directive.as_str(),
            },
        }
    }
}

fn viz_point_line(point: &VizPoint) -> String {
    match point {
        VizPoint::Series {
            label,
            child,
            parent,
        } => format!("{label:<10} Child Score {child:<6} Parent Score {parent}"),
        VizPoint::Single { label, value } => format!("{label:<10} {} {value}", bar(*value)),
    }
}

#[derive(Serialize)]
struct ChatMessageView<'a> {
    speaker: &'static str,
    sentiment: Option<&'static str>,
    feedback: Option<&'static str>,
    disclaimer: Option<&'a str>,
    body: String,
}

/// Collapse runs of blank lines left by consecutive spacers.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, DashboardError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .map_err(|e| DashboardError::TemplateParse(e.to_string()))?;
        Ok(Self { tera })
    }

    fn render(&self, template: &str, view: &impl Serialize) -> Result<String, DashboardError> {
        let value = serde_json::to_value(view)?;
        let context = Context::from_value(value)
            .map_err(|e| DashboardError::TemplateRender(e.to_string()))?;
        Ok(self.tera.render(template, &context)?)
    }

    pub fn profile_header(&self, profile: &Profile) -> Result<String, DashboardError> {
        self.render(
            "profile.txt",
            &ProfileView {
                name: &profile.name,
                role: &profile.role,
                relationship: &profile.relationship,
                submission_date: &profile.submission_date,
            },
        )
    }

    pub fn score_card(
        &self,
        category: &CategoryScore,
        state: &ScoreCardState,
    ) -> Result<String, DashboardError> {
        let (child, parent, diff) = (category.child(), category.parent(), category.diff());
        let view = ScoreCardView {
            title: &category.title,
            metrics: category
                .metrics
                .iter()
                .map(|m| MetricView {
                    label: &m.label,
                    value: m.value.to_string(),
                    tooltip: m.tooltip(),
                })
                .collect(),
            show_explanation: state.show_explanation,
            child: child.to_string(),
            parent: parent.to_string(),
            diff: format_signed(diff),
            interpretation: category.interpretation().text(),
            expanded: state.expanded,
            filters: MetricFilter::ALL
                .into_iter()
                .map(|f| OptionView {
                    name: f.as_str().to_uppercase(),
                    active: f == state.metric_filter,
                })
                .collect(),
            show_child: state.shows_child_bar(),
            show_parent: state.shows_parent_bar(),
            show_diff: state.shows_diff_bar(),
            child_bar: bar(category.bar_percent(child)),
            parent_bar: bar(category.bar_percent(parent)),
            diff_track: diff_track(diff),
        };
        self.render("score_card.txt", &view)
    }

    pub fn discrepant_responses(&self, items: &[DiscrepantItem]) -> Result<String, DashboardError> {
        let mut context = Context::new();
        context.insert("items", items);
        Ok(self.tera.render("discrepant.txt", &context)?)
    }

    pub fn question_card(
        &self,
        question: &QuestionDetail,
        state: &QuestionCardState,
    ) -> Result<String, DashboardError> {
        let view = QuestionCardView {
            id: question.id,
            discrepant: question.is_discrepant,
            tag: question.tag.as_str(),
            child_text: &question.child_text,
            child_answer: &question.child_answer,
            tone: tone_label(question.answer_tone()),
            parent_peek: state.parent_peek_visible(),
            parent_answer: &question.parent_answer,
            expanded: state.is_expanded(),
            child_bar: bar(question.child_percent()),
            parent_bar: bar(question.parent_percent()),
            child_option: question.child_answer_index + 1,
            parent_option: question.parent_answer_index + 1,
            first_option: question.option(0).unwrap_or_default(),
            last_option: question.options.last().map(String::as_str).unwrap_or_default(),
            parent_text: &question.parent_text,
        };
        self.render("question_card.txt", &view)
    }

    /// The filter bar and the cards for every question the filter lets
    /// through, all collapsed.
    pub fn question_list(
        &self,
        questions: &[QuestionDetail],
        state: &DashboardState,
    ) -> Result<String, DashboardError> {
        let cards = state
            .visible_questions(questions)
            .into_iter()
            .map(|q| self.question_card(q, &QuestionCardState::default()))
            .collect::<Result<Vec<_>, _>>()?;

        let view = QuestionListView {
            filter: state.active_filter().as_str(),
            filter_open: state.is_filter_open(),
            options: FILTER_OPTIONS
                .into_iter()
                .map(|f| OptionView {
                    name: f.as_str().to_string(),
                    active: f == state.active_filter(),
                })
                .collect(),
            cards,
        };
        self.render("question_list.txt", &view)
    }

    pub fn discrepancy_popup(&self, question: &QuestionDetail) -> Result<String, DashboardError> {
        let gap = question.answer_gap();
        let gap_note = match gap {
            0 => "Both chose the same option.".to_string(),
            1 => "Answers are 1 option apart.".to_string(),
            n => format!("Answers are {n} options apart."),
        };
        let view = PopupView {
            id: question.id,
            child_text: &question.child_text,
            child_answer: &question.child_answer,
            parent_text: &question.parent_text,
            parent_answer: &question.parent_answer,
            spectrum: spectrum(question),
            first_option: question.option(0).unwrap_or_default(),
            last_option: question.option(4).unwrap_or_default(),
            gap_note,
        };
        self.render("popup.txt", &view)
    }

    /// The whole page: header, score cards, discrepant pills, the question
    /// list and, when one is selected, the discrepancy popup.
    pub fn dashboard(
        &self,
        dataset: &Dataset,
        state: &DashboardState,
        score_state: &ScoreCardState,
    ) -> Result<String, DashboardError> {
        let mut sections = vec![self.profile_header(&dataset.profile)?];
        for category in dataset.categories() {
            sections.push(self.score_card(category, score_state)?);
        }
        sections.push(self.discrepant_responses(&dataset.discrepant_items)?);
        sections.push(self.question_list(&dataset.questions, state)?);
        if let Some(question) = state.selected_question(&dataset.questions) {
            sections.push(self.discrepancy_popup(question)?);
        }
        Ok(sections.join("\n"))
    }

    /// Body blocks of an assistant message. `subject` is the child named in
    /// score chart notes.
    pub fn chat_blocks(&self, blocks: &[Block], subject: &str) -> Result<String, DashboardError> {
        let views: Vec<BlockView<'_>> = blocks
            .iter()
            .map(|b| BlockView::from_block(b, subject))
            .collect();
        let mut context = Context::new();
        context.insert("blocks", &views);
        let text = self.tera.render("blocks.txt", &context)?;
        Ok(collapse_blank_lines(&text))
    }

    pub fn chat_rendered(
        &self,
        message: &TranscriptMessage,
        rendered: &RenderedMessage,
        subject: &str,
    ) -> Result<String, DashboardError> {
        let view = ChatMessageView {
            speaker: match message.role {
                MessageRole::User => "You",
                MessageRole::Model => "Omni",
            },
            sentiment: message.sentiment.map(sentiment_label),
            feedback: message.feedback.map(|f| match f {
                Feedback::Up => "helpful",
                Feedback::Down => "not helpful",
            }),
            disclaimer: rendered.disclaimer.as_deref(),
            body: self.chat_blocks(&rendered.blocks, subject)?,
        };
        self.render("chat_message.txt", &view)
    }

    pub fn chat_message(
        &self,
        message: &TranscriptMessage,
        subject: &str,
    ) -> Result<String, DashboardError> {
        let rendered = render_message(&message.text, message.role);
        self.chat_rendered(message, &rendered, subject)
    }
}

//! The assessment on display.
//!
//! The dashboard presents a single, fixed submission: one child's answers to
//! the well-being questionnaire alongside the parent's proxy answers, the
//! category scores derived from them, and the score history used by the
//! assistant's trend charts.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::models::discrepancy::{DiscrepantItem, PillColor};
use crate::models::profile::Profile;
use crate::models::question::{QuestionDetail, QuestionTag};
use crate::models::score::CategoryScore;
use crate::models::trend::{HistoricalTrends, TrendPoint};

/// Everything the dashboard and the assistant know about one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub profile: Profile,
    pub health: CategoryScore,
    pub coping: CategoryScore,
    pub social: CategoryScore,
    pub discrepant_items: Vec<DiscrepantItem>,
    pub questions: Vec<QuestionDetail>,
    pub trends: HistoricalTrends,
}

impl Dataset {
    /// The built-in submission.
    pub fn fixture() -> &'static Dataset {
        &FIXTURE
    }

    /// Category scores in display order.
    pub fn categories(&self) -> [&CategoryScore; 3] {
        [&self.health, &self.coping, &self.social]
    }
}

const FREQUENCY: [&str; 5] = ["Never", "Rarely", "Sometimes", "Often", "Very often"];
const DIFFICULTY: [&str; 5] = [
    "Very easy",
    "Quite easy",
    "Not easy but not hard",
    "Quite hard",
    "Very hard",
];
const BOTHER: [&str; 5] = [
    "It does not bother me at all",
    "It rarely bothers me",
    "It sometimes bothers me",
    "It often bothers me",
    "It very often bothers me",
];

struct Row {
    id: u32,
    category: &'static str,
    tag: QuestionTag,
    child_text: &'static str,
    parent_text: &'static str,
    options: [&'static str; 5],
    child: (&'static str, usize),
    parent: (&'static str, usize),
    discrepant: bool,
}

impl From<Row> for QuestionDetail {
    fn from(row: Row) -> Self {
        QuestionDetail {
            id: row.id,
            category: row.category.to_string(),
            child_text: row.child_text.to_string(),
            child_answer: row.child.0.to_string(),
            child_answer_index: row.child.1,
            parent_text: row.parent_text.to_string(),
            parent_answer: row.parent.0.to_string(),
            parent_answer_index: row.parent.1,
            options: row.options.iter().map(|o| o.to_string()).collect(),
            tag: row.tag,
            is_discrepant: row.discrepant,
        }
    }
}

fn trend(points: [(&str, f64, f64); 5]) -> Vec<TrendPoint> {
    points
        .iter()
        .map(|(label, child, parent)| TrendPoint {
            label: label.to_string(),
            child: *child,
            parent: *parent,
        })
        .collect()
}

fn pill(id: &str, color: PillColor) -> DiscrepantItem {
    DiscrepantItem {
        id: id.to_string(),
        label: format!("Q{id}"),
        color,
    }
}

static FIXTURE: LazyLock<Dataset> = LazyLock::new(|| {
    let rows = vec![
        Row {
            id: 1,
            category: "Coping Adjustments",
            tag: QuestionTag::Coping,
            child_text: "How easy is it to talk about your feelings?",
            parent_text: "Does your child find it easy to talk about their feelings?",
            options: DIFFICULTY,
            child: ("Quite easy", 1),
            parent: ("Not easy but not hard", 2),
            discrepant: false,
        },
        Row {
            id: 2,
            category: "Social Emotional",
            tag: QuestionTag::Social,
            child_text: "How easy is it for you to concentrate?",
            parent_text: "How easy is it for your child to concentrate?",
            options: DIFFICULTY,
            child: ("Quite easy", 1),
            parent: ("Quite easy", 1),
            discrepant: false,
        },
        Row {
            id: 3,
            category: "Coping Adjustments",
            tag: QuestionTag::Discrepant,
            child_text: "How do you feel about taking medicine everyday?",
            parent_text: "How does your child feel about taking medicine everyday?",
            options: BOTHER,
            child: ("It rarely bothers me", 1),
            parent: ("It often bothers my child", 3),
            discrepant: true,
        },
        Row {
            id: 5,
            category: "Future Health",
            tag: QuestionTag::Future,
            child_text: "How do you feel about changing to a health care team that takes care of adults when you get older?",
            parent_text: "How does your child feel about changing to a health care team that takes care of adults when they get older?",
            options: BOTHER,
            child: ("It rarely bothers me", 1),
            parent: ("It sometimes bothers my child", 2),
            discrepant: false,
        },
        Row {
            id: 8,
            category: "Future Health",
            tag: QuestionTag::Discrepant,
            child_text: "Do you worry if you miss taking your medicine?",
            parent_text: "Does your child worry if they miss taking their medicine?",
            options: FREQUENCY,
            child: ("Never", 0),
            parent: ("Often", 3),
            discrepant: true,
        },
        Row {
            id: 13,
            category: "Future Health",
            tag: QuestionTag::Discrepant,
            child_text: "Do you worry about infections you may get?",
            parent_text: "Does your child worry about getting infections?",
            options: FREQUENCY,
            child: ("Rarely", 1),
            parent: ("Very often", 4),
            discrepant: true,
        },
        Row {
            id: 14,
            category: "Future Health",
            tag: QuestionTag::Discrepant,
            child_text: "Do you think about needing another liver transplant in the future?",
            parent_text: "Does your child think about needing another liver transplant in the future?",
            options: FREQUENCY,
            child: ("Never", 0),
            parent: ("Sometimes", 2),
            discrepant: true,
        },
        Row {
            id: 16,
            category: "Social Emotional",
            tag: QuestionTag::Discrepant,
            child_text: "Do you feel that you have to stay away from people to make sure you do not get sick?",
            parent_text: "Does your child feel that they have to stay away from people to make sure they do not get sick?",
            options: FREQUENCY,
            child: ("Sometimes", 2),
            parent: ("Never", 0),
            discrepant: true,
        },
        Row {
            id: 24,
            category: "Coping Adjustments",
            tag: QuestionTag::Coping,
            child_text: "How do you feel about how your scar looks?",
            parent_text: "How does your child feel about how their scar looks?",
            options: [
                "I love how my scar looks",
                "I like how my scar looks",
                "I do not like or dislike",
                "I dislike",
                "I really dislike",
            ],
            child: ("I like how my scar looks", 1),
            parent: ("My child likes how their scar looks", 1),
            discrepant: false,
        },
        Row {
            id: 26,
            category: "Social Emotional",
            tag: QuestionTag::Social,
            child_text: "In the past two weeks, how have you been feeling?",
            parent_text: "In the past two weeks, how has your child been feeling?",
            options: ["Excellent", "Very well", "Well", "Not very well", "Terrible"],
            child: ("Very well", 1),
            parent: ("Well", 2),
            discrepant: false,
        },
    ];

    Dataset {
        profile: Profile {
            name: "Jane Doe".to_string(),
            role: "Child".to_string(),
            relationship: "Dad (John Doe)".to_string(),
            submission_date: "12-13-2021".to_string(),
            avatar_url: "https://images.unsplash.com/photo-1544005313-94ddf0286df2?ixlib=rb-4.0.3&auto=format&fit=crop&w=200&h=200&q=80".to_string(),
        },
        health: CategoryScore::new("Future Health", 55.6, 61.1, -5.5),
        coping: CategoryScore::new("Coping & Adjustment", 68.8, 71.9, -3.1),
        social: CategoryScore::new("Social - Emotional", 50.0, 50.0, 0.0),
        discrepant_items: vec![
            pill("3", PillColor::Blue),
            pill("8", PillColor::Green),
            pill("13", PillColor::Orange),
            pill("14", PillColor::Blue),
            pill("16", PillColor::Green),
        ],
        questions: rows.into_iter().map(QuestionDetail::from).collect(),
        trends: HistoricalTrends {
            health: trend([
                ("Jan", 45.0, 50.0),
                ("Mar", 48.0, 54.0),
                ("Jun", 52.0, 58.0),
                ("Sep", 54.0, 60.0),
                ("Dec", 55.6, 61.1),
            ]),
            coping: trend([
                ("Jan", 55.0, 60.0),
                ("Mar", 58.0, 64.0),
                ("Jun", 62.0, 68.0),
                ("Sep", 65.0, 70.0),
                ("Dec", 68.8, 71.9),
            ]),
            social: trend([
                ("Jan", 40.0, 40.0),
                ("Mar", 45.0, 45.0),
                ("Jun", 48.0, 48.0),
                ("Sep", 50.0, 50.0),
                ("Dec", 50.0, 50.0),
            ]),
        },
    }
});

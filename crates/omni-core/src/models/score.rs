use serde::{Deserialize, Serialize};

/// Difference (in points) at which child and parent perceptions are treated
/// as diverging.
pub const DIVERGENCE_THRESHOLD: f64 = 5.0;

/// Which respondent a metric summarises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Score computed from the child's answers.
    Score,
    /// Score computed from the parent's answers.
    Parent,
    /// Child score minus parent score.
    Diff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMetric {
    pub label: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: MetricKind,
}

/// An aggregate per well-being domain, with child, parent and difference
/// components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub title: String,
    pub metrics: Vec<ScoreMetric>,
}

impl CategoryScore {
    /// Build a category from its three components, labelled the way the
    /// score cards show them.
    pub fn new(title: impl Into<String>, child: f64, parent: f64, diff: f64) -> Self {
        Self {
            title: title.into(),
            metrics: vec![
                ScoreMetric {
                    label: "Score".to_string(),
                    value: child,
                    kind: MetricKind::Score,
                },
                ScoreMetric {
                    label: "Parent".to_string(),
                    value: parent,
                    kind: MetricKind::Parent,
                },
                ScoreMetric {
                    label: "Diff".to_string(),
                    value: diff,
                    kind: MetricKind::Diff,
                },
            ],
        }
    }

    fn metric_value(&self, kind: MetricKind) -> f64 {
        self.metrics
            .iter()
            .find(|m| m.kind == kind)
            .map(|m| m.value)
            .unwrap_or(0.0)
    }

    pub fn child(&self) -> f64 {
        self.metric_value(MetricKind::Score)
    }

    pub fn parent(&self) -> f64 {
        self.metric_value(MetricKind::Parent)
    }

    pub fn diff(&self) -> f64 {
        self.metric_value(MetricKind::Diff)
    }

    /// Full-width value for the comparison bars. Never below 100.
    pub fn bar_scale(&self) -> f64 {
        self.child().max(self.parent()).max(100.0)
    }

    /// Width of a comparison bar for `value`, as a percentage of the scale.
    pub fn bar_percent(&self, value: f64) -> f64 {
        value / self.bar_scale() * 100.0
    }

    pub fn interpretation(&self) -> Interpretation {
        interpret_diff(self.diff())
    }
}

/// How a category's child/parent difference reads clinically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    ChildReportsLower,
    ChildReportsHigher,
    Aligned,
}

impl Interpretation {
    pub fn text(self) -> &'static str {
        match self {
            Interpretation::ChildReportsLower => {
                "The child reports a lower quality of life than the parent perceives. \
                 This may suggest internal distress not visible to the caregiver."
            }
            Interpretation::ChildReportsHigher => {
                "The child reports a higher quality of life than the parent perceives. \
                 The caregiver may be more concerned about this area than the child is."
            }
            Interpretation::Aligned => {
                "The child and parent perceptions are well-aligned, suggesting a shared \
                 understanding of this aspect of well-being."
            }
        }
    }
}

pub fn interpret_diff(diff: f64) -> Interpretation {
    if diff <= -DIVERGENCE_THRESHOLD {
        Interpretation::ChildReportsLower
    } else if diff >= DIVERGENCE_THRESHOLD {
        Interpretation::ChildReportsHigher
    } else {
        Interpretation::Aligned
    }
}

/// Colour family a metric box is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricTone {
    Child,
    Parent,
    ChildLower,
    ChildHigher,
    Same,
}

impl ScoreMetric {
    pub fn tone(&self) -> MetricTone {
        match self.kind {
            MetricKind::Score => MetricTone::Child,
            MetricKind::Parent => MetricTone::Parent,
            MetricKind::Diff if self.value < 0.0 => MetricTone::ChildLower,
            MetricKind::Diff if self.value > 0.0 => MetricTone::ChildHigher,
            MetricKind::Diff => MetricTone::Same,
        }
    }

    /// Hover text explaining where the number comes from.
    pub fn tooltip(&self) -> String {
        const DIFF: &str =
            "This shows the difference between the child's score and the parent's score.";
        match self.tone() {
            MetricTone::Child => "This score is based on the answers given by the child.".to_string(),
            MetricTone::Parent => {
                "This score is based on the answers given by the parent.".to_string()
            }
            MetricTone::ChildLower => format!("{DIFF} The child's score is lower."),
            MetricTone::ChildHigher => format!("{DIFF} The child's score is higher."),
            MetricTone::Same => format!("{DIFF} The scores are the same."),
        }
    }
}

/// Geometry of the centred difference bar spanning -100..+100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffBar {
    /// Width in percent of the track.
    pub width: f64,
    /// Left offset in percent of the track.
    pub margin_left: f64,
}

pub fn diff_bar(diff: f64) -> DiffBar {
    let width = diff.abs();
    let margin_left = if diff < 0.0 { 50.0 - width } else { 50.0 };
    DiffBar { width, margin_left }
}

/// Signed display form: positive differences carry an explicit `+`.
pub fn format_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value}")
    } else {
        format!("{value}")
    }
}

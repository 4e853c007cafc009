use serde::{Deserialize, Serialize};

/// Gap (in points) below which a child/parent comparison counts as aligned.
pub const ALIGNED_GAP: f64 = 5.0;

/// Bars never shrink below this width so small scores stay visible.
const MIN_BAR_WIDTH: f64 = 5.0;
const MAX_BAR_WIDTH: f64 = 100.0;

/// The three directive families the assistant may embed in its replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    Score,
    Viz,
    Insight,
}

impl DirectiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveKind::Score => "score",
            DirectiveKind::Viz => "viz",
            DirectiveKind::Insight => "insight",
        }
    }
}

/// One renderable unit of an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Vertical gap produced by a line break.
    Spacer,
    Header { text: String },
    Bullet { text: String },
    Paragraph { text: String },
    /// `{score: Label, child, parent}`
    Score(ScoreChart),
    /// `{viz: {...}}`
    Viz(VizSpec),
    /// `{insight: text}`
    Insight { text: String },
    /// A directive whose closing brace has not streamed in yet.
    Pending { directive: DirectiveKind },
}

/// Child-versus-parent comparison for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreChart {
    pub label: String,
    pub child: f64,
    pub parent: f64,
}

impl ScoreChart {
    /// Absolute difference, rounded to one decimal.
    pub fn gap(&self) -> f64 {
        ((self.child - self.parent).abs() * 10.0).round() / 10.0
    }

    pub fn is_aligned(&self) -> bool {
        self.gap() < ALIGNED_GAP
    }

    pub fn child_width(&self) -> f64 {
        self.child.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
    }

    pub fn parent_width(&self) -> f64 {
        self.parent.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
    }

    /// Status badge: `ALIGNED`, or the gap in points.
    pub fn badge(&self) -> String {
        if self.is_aligned() {
            "ALIGNED".to_string()
        } else {
            format!("{:.1} PT GAP", self.gap())
        }
    }

    /// Explanatory note shown under the chart.
    pub fn clinical_context(&self, name: &str) -> String {
        if self.is_aligned() {
            "Observations are perfectly synchronized, indicating a high level of empathy and \
             daily awareness between parent and child."
                .to_string()
        } else {
            format!(
                "The discrepancy of {:.1} points indicates that {name} may be experiencing \
                 internal emotional nuances that aren't yet visible through surface-level \
                 observations.",
                self.gap()
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizKind {
    /// Trend over time with child and parent series.
    Line,
    /// Single-point snapshot, one bar per label.
    Bar,
}

/// A data point of a `{viz:...}` chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VizPoint {
    Series { label: String, child: f64, parent: f64 },
    Single { label: String, value: f64 },
}

impl VizPoint {
    pub fn label(&self) -> &str {
        match self {
            VizPoint::Series { label, .. } | VizPoint::Single { label, .. } => label,
        }
    }
}

/// Chart specification carried by a `{viz:...}` directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizSpec {
    #[serde(rename = "type")]
    pub kind: VizKind,
    #[serde(default)]
    pub title: String,
    pub data: Vec<VizPoint>,
}

/// A message split into its safety notice and its body blocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderedMessage {
    pub disclaimer: Option<String>,
    pub blocks: Vec<Block>,
}

impl RenderedMessage {
    /// Number of chart or insight widgets in the body.
    pub fn widget_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Score(_) | Block::Viz(_) | Block::Insight { .. }))
            .count()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.blocks.last(), Some(Block::Pending { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(child: f64, parent: f64) -> ScoreChart {
        ScoreChart {
            label: "Future Health".to_string(),
            child,
            parent,
        }
    }

    #[test]
    fn gap_rounds_to_one_decimal() {
        assert_eq!(chart(55.6, 61.1).gap(), 5.5);
        assert_eq!(chart(68.8, 71.9).gap(), 3.1);
    }

    #[test]
    fn badge_reports_alignment() {
        assert_eq!(chart(50.0, 50.0).badge(), "ALIGNED");
        assert_eq!(chart(55.6, 61.1).badge(), "5.5 PT GAP");
        assert!(chart(68.8, 71.9).is_aligned());
    }

    #[test]
    fn widths_are_clamped() {
        let c = chart(2.0, 140.0);
        assert_eq!(c.child_width(), 5.0);
        assert_eq!(c.parent_width(), 100.0);
    }

    #[test]
    fn clinical_context_names_the_child() {
        let text = chart(40.0, 60.0).clinical_context("Jane Doe");
        assert!(text.contains("20.0 points"));
        assert!(text.contains("Jane Doe"));
    }

    #[test]
    fn viz_points_deserialize_either_shape() {
        let spec: VizSpec = serde_json::from_str(
            r#"{"type":"bar","title":"Snapshot","data":[{"label":"Coping","value":68.8},{"label":"Dec","child":1,"parent":2}]}"#,
        )
        .unwrap();
        assert_eq!(spec.kind, VizKind::Bar);
        assert!(matches!(spec.data[0], VizPoint::Single { value, .. } if value == 68.8));
        assert!(matches!(spec.data[1], VizPoint::Series { .. }));
    }
}

use serde::{Deserialize, Serialize};

/// Pill colour used for a discrepant-response shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillColor {
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
}

/// A shortcut to a question whose child and parent answers diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepantItem {
    /// Question id as text, e.g. `"13"`.
    pub id: String,
    /// Short label, e.g. `"Q13"`.
    pub label: String,
    #[serde(default)]
    pub color: PillColor,
}

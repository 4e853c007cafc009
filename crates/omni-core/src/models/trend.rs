use serde::{Deserialize, Serialize};

/// One sample of a category score over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub child: f64,
    pub parent: f64,
}

/// Score history per category, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTrends {
    pub health: Vec<TrendPoint>,
    pub coping: Vec<TrendPoint>,
    pub social: Vec<TrendPoint>,
}

impl HistoricalTrends {
    /// The most recent sample of every series.
    pub fn latest(&self) -> [Option<&TrendPoint>; 3] {
        [self.health.last(), self.coping.last(), self.social.last()]
    }
}

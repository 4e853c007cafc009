use serde::{Deserialize, Serialize};

/// The respondent whose assessment is on display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub relationship: String,
    /// Submission date as entered on the survey (`MM-DD-YYYY`).
    pub submission_date: String,
    pub avatar_url: String,
}

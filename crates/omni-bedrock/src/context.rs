//! Assessment context and prompt assembly for the assistant.
//!
//! The model sees the whole submission (profile, category scores, every
//! question with both answers, and the score history) as a JSON block in
//! the system prompt, together with the rules for the inline chart
//! directives it may emit.

use serde::Serialize;
use serde_json::json;

use omni_core::dataset::Dataset;
use omni_core::models::profile::Profile;
use omni_core::models::transcript::{MessageRole, Sentiment, TranscriptMessage, WELCOME_ID};

use crate::error::BedrockError;

/// Canned prompts offered above the input box.
pub const SUGGESTIONS: [&str; 5] = [
    "Show Future Health trend",
    "Show Coping & Adjustment trend",
    "Show Social-Emotional trend",
    "Analyze Jane's score gaps",
    "How to improve Jane's scores?",
];

/// Shown in place of a reply when the model call fails.
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable.";

const VISUALIZATION_RULES: &str = r#"VISUALIZATION RULES:
1. COMPARISON (Current Snapshot): {score: Category Name, Child Score, Parent Score}.
2. TRENDS (Historical Data Analysis): WHENEVER the user asks for trends, progress, or "over time" analysis for ANY category (Future Health, Coping, or Social), YOU MUST use:
   {viz: {"type": "line", "title": "Historical Progress: Category Name", "data": [{"label": "Date", "child": X, "parent": Y}]}}.
   Use the historical_trends context provided to populate this.
3. SNAPSHOT BARS: For single point multi-category comparison, use: {viz: {"type": "bar", "title": "...", "data": [{"label": "Category", "value": X}]}}.
4. HIGHLIGHTS: Use {insight: text} for critical findings."#;

#[derive(Serialize)]
struct ContextBlock<'a> {
    profile: &'a Profile,
    scores: serde_json::Value,
    questions: &'a [omni_core::models::question::QuestionDetail],
    historical_trends: &'a omni_core::models::trend::HistoricalTrends,
}

/// Serialize the submission into the JSON context handed to the model.
pub fn build_context_block(dataset: &Dataset) -> Result<String, BedrockError> {
    let block = ContextBlock {
        profile: &dataset.profile,
        scores: json!({
            "health": dataset.health,
            "coping": dataset.coping,
            "social": dataset.social,
        }),
        questions: &dataset.questions,
        historical_trends: &dataset.trends,
    };
    Ok(serde_json::to_string(&block)?)
}

/// Full system prompt: persona, directive rules, output format and context.
pub fn build_system_prompt(dataset: &Dataset) -> Result<String, BedrockError> {
    let context = build_context_block(dataset)?;
    Ok(format!(
        "ACT AS: Omni, a Supportive Pediatric Intelligence Assistant.\n\
         STYLE: Sleek, smart, empathetic.\n\
         \n\
         {VISUALIZATION_RULES}\n\
         \n\
         FORMAT: Start EVERY response with medical disclaimer then \"---\".\n\
         CONTEXT: {context}\n\
         HISTORY: Use the previous conversation history if relevant to provide continuity."
    ))
}

/// Greeting that seeds an empty transcript.
pub fn welcome_message(profile: &Profile) -> TranscriptMessage {
    TranscriptMessage {
        id: WELCOME_ID.to_string(),
        role: MessageRole::Model,
        text: format!(
            "Safety Notice: This information is for informational purposes only and is not a \
             substitute for professional medical advice, diagnosis, or treatment. --- Hello! \
             I'm **Omni**. I've reviewed {}'s assessment history. \n\n\
             I can visualize score trends for **Future Health**, **Coping & Adjustment**, and \
             **Social-Emotional** well-being. How can I assist you today?",
            profile.name
        ),
        sentiment: Some(Sentiment::Positive),
        feedback: None,
        created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_block_has_expected_sections() {
        let block = build_context_block(Dataset::fixture()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&block).unwrap();
        assert_eq!(value["profile"]["name"], "Jane Doe");
        assert_eq!(value["scores"]["health"]["title"], "Future Health");
        assert_eq!(value["questions"].as_array().map(Vec::len), Some(10));
        assert_eq!(value["historical_trends"]["coping"][4]["child"], 68.8);
    }
}

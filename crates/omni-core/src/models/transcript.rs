use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of the greeting that seeds an empty transcript.
pub const WELCOME_ID: &str = "welcome";

/// Prefix of ids given to failure notices appended by the chat session.
pub const ERROR_ID_PREFIX: &str = "err-";

/// Who wrote a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Model,
}

/// Tone of a message, as estimated by the keyword heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Thumbs up/down left on an assistant reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Up,
    Down,
}

/// A message in the persisted chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub id: String,
    pub role: MessageRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<jiff::Timestamp>,
}

impl TranscriptMessage {
    fn with_prefix(prefix: &str, role: MessageRole, text: String, sentiment: Sentiment) -> Self {
        Self {
            id: format!("{prefix}{}", Uuid::new_v4().simple()),
            role,
            text,
            sentiment: Some(sentiment),
            feedback: None,
            created_at: Some(jiff::Timestamp::now()),
        }
    }

    pub fn user(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self::with_prefix("user-", MessageRole::User, text.into(), sentiment)
    }

    /// An empty assistant reply, filled in as the stream arrives.
    pub fn model_placeholder() -> Self {
        Self::with_prefix("model-", MessageRole::Model, String::new(), Sentiment::Neutral)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_prefix(ERROR_ID_PREFIX, MessageRole::Model, text.into(), Sentiment::Negative)
    }

    pub fn is_welcome(&self) -> bool {
        self.id == WELCOME_ID
    }

    pub fn is_error(&self) -> bool {
        self.id.starts_with(ERROR_ID_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_role_prefix() {
        assert!(TranscriptMessage::user("hi", Sentiment::Neutral).id.starts_with("user-"));
        assert!(TranscriptMessage::model_placeholder().id.starts_with("model-"));
        assert!(TranscriptMessage::error("down").is_error());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let json = r#"{"id":"welcome","role":"model","text":"Hello"}"#;
        let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
        assert!(msg.is_welcome());
        assert_eq!(msg.role, MessageRole::Model);
        assert_eq!(msg.sentiment, None);
        assert_eq!(msg.feedback, None);
    }

    #[test]
    fn sentiment_round_trips_lowercase() {
        let msg = TranscriptMessage::user("hello", Sentiment::Positive);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(json["role"], "user");
        assert!(json.get("feedback").is_none());
    }
}

//! Streaming conversation with a hosted model.
//!
//! The session talks to the model through [`ChatTransport`], which takes the
//! system prompt and the alternating user/assistant history and reports the
//! reply as a sequence of text deltas. [`BedrockTransport`] implements it on
//! top of the Bedrock `ConverseStream` API; tests substitute a scripted
//! transport.
//!
//! ## Required IAM permissions
//!
//! ```text
//! bedrock:InvokeModelWithResponseStream
//! ```

use std::future::Future;

use aws_sdk_bedrockruntime::types::{
    ContentBlock, ContentBlockDelta, ConversationRole, ConverseStreamOutput as StreamEvent,
    InferenceConfiguration, Message, SystemContentBlock,
};
use aws_smithy_types::error::display::DisplayErrorContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::BedrockError;

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.65;

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Something that can stream a model reply for a conversation.
pub trait ChatTransport {
    /// Send `history` (ending with the newest user turn) and call
    /// `on_delta` with each fragment of the reply as it arrives.
    fn stream_reply(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> impl Future<Output = Result<(), BedrockError>> + Send;
}

/// Load AWS configuration for `region` from the default provider chain.
pub async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

/// [`ChatTransport`] backed by the Bedrock Converse streaming API.
#[derive(Debug, Clone)]
pub struct BedrockTransport {
    client: aws_sdk_bedrockruntime::Client,
    model_id: String,
    temperature: f32,
}

impl BedrockTransport {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_bedrockruntime::Client::new(config),
            model_id: model_id.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn to_converse_messages(history: &[ChatMessage]) -> Result<Vec<Message>, BedrockError> {
    history
        .iter()
        .map(|msg| {
            let role = match msg.role {
                ChatRole::User => ConversationRole::User,
                ChatRole::Assistant => ConversationRole::Assistant,
            };
            Message::builder()
                .role(role)
                .content(ContentBlock::Text(msg.content.clone()))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))
        })
        .collect()
}

impl ChatTransport for BedrockTransport {
    async fn stream_reply(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> Result<(), BedrockError> {
        let messages = to_converse_messages(history)?;

        info!(model_id = %self.model_id, turns = messages.len(), "starting chat stream");

        let mut output = self
            .client
            .converse_stream()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .set_messages(Some(messages))
            .inference_config(
                InferenceConfiguration::builder()
                    .temperature(self.temperature)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let mut received = 0usize;
        loop {
            let event = output
                .stream
                .recv()
                .await
                .map_err(|e| BedrockError::Stream(DisplayErrorContext(&e).to_string()))?;

            match event {
                Some(StreamEvent::ContentBlockDelta(delta)) => {
                    if let Some(ContentBlockDelta::Text(text)) = delta.delta()
                        && !text.is_empty()
                    {
                        received += text.len();
                        on_delta(text.as_str());
                    }
                }
                Some(StreamEvent::MessageStop(stop)) => {
                    debug!(stop_reason = ?stop.stop_reason(), "chat stream stopped");
                }
                Some(StreamEvent::Metadata(meta)) => {
                    if let Some(usage) = meta.usage() {
                        info!(
                            input_tokens = usage.input_tokens(),
                            output_tokens = usage.output_tokens(),
                            "chat stream usage"
                        );
                    }
                }
                Some(_) => {}
                None => break,
            }
        }

        info!(model_id = %self.model_id, bytes = received, "chat stream complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_maps_roles() {
        let messages = to_converse_messages(&[
            ChatMessage::user("How is Jane doing?"),
            ChatMessage::assistant("Well overall."),
        ])
        .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(*messages[0].role(), ConversationRole::User);
        assert_eq!(*messages[1].role(), ConversationRole::Assistant);
    }

    #[test]
    fn chat_role_serializes_snake_case() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}

//! Chat session state.
//!
//! A session owns the transcript shown in the chat panel. Sending a message
//! appends the user's turn, streams the reply into a model message that is
//! updated after every delta, and falls back to a fixed notice when the
//! model call fails. The session never persists anything itself; callers
//! save [`ChatSession::messages`] after each send.

use tracing::{info, warn};

use omni_core::dataset::Dataset;
use omni_core::models::transcript::{Feedback, MessageRole, TranscriptMessage};
use omni_directives::determine_sentiment;

use crate::chat::{ChatMessage, ChatTransport};
use crate::context::{UNAVAILABLE_MESSAGE, build_system_prompt, welcome_message};
use crate::error::BedrockError;

/// Progress reported while a message is being sent.
#[derive(Debug)]
pub enum ChatEvent<'a> {
    /// The user's turn was appended.
    UserMessage(&'a TranscriptMessage),
    /// A fragment of the reply arrived; `message` holds the text so far.
    ReplyDelta {
        message: &'a TranscriptMessage,
        delta: &'a str,
    },
    /// The model call failed and the failure notice was appended.
    Failed(&'a TranscriptMessage),
}

/// What a call to [`ChatSession::send`] did.
#[derive(Debug)]
pub enum SendOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    /// The reply streamed in completely.
    Replied { message_id: String },
    /// The model call failed.
    Failed(BedrockError),
}

pub struct ChatSession<T> {
    transport: T,
    system_prompt: String,
    welcome: TranscriptMessage,
    messages: Vec<TranscriptMessage>,
}

impl<T: ChatTransport> ChatSession<T> {
    /// Start a session over `messages`, typically the stored transcript.
    /// An empty transcript is seeded with the welcome message.
    pub fn new(
        transport: T,
        dataset: &Dataset,
        messages: Vec<TranscriptMessage>,
    ) -> Result<Self, BedrockError> {
        let welcome = welcome_message(&dataset.profile);
        let messages = if messages.is_empty() {
            vec![welcome.clone()]
        } else {
            messages
        };
        Ok(Self {
            transport,
            system_prompt: build_system_prompt(dataset)?,
            welcome,
            messages,
        })
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Conversation turns to send to the model.
    ///
    /// The welcome message, failure notices and empty replies are left out,
    /// and a user turn that never got a reply is dropped when a newer user
    /// turn follows it, so the result alternates user/assistant and starts
    /// with the user.
    pub fn history_for_model(&self) -> Vec<ChatMessage> {
        let mut history: Vec<ChatMessage> = Vec::new();
        for msg in &self.messages {
            if msg.is_welcome() || msg.is_error() {
                continue;
            }
            let last_is_user = history
                .last()
                .is_some_and(|m| m.role == crate::chat::ChatRole::User);
            match msg.role {
                MessageRole::User => {
                    if last_is_user {
                        history.pop();
                    }
                    history.push(ChatMessage::user(msg.text.clone()));
                }
                MessageRole::Model => {
                    if last_is_user && !msg.text.is_empty() {
                        history.push(ChatMessage::assistant(msg.text.clone()));
                    }
                }
            }
        }
        history
    }

    /// Send `text` and stream the reply into the transcript.
    ///
    /// `observer` sees the user turn, every reply delta, and the failure
    /// notice if the call fails.
    pub async fn send(
        &mut self,
        text: &str,
        observer: &mut (dyn FnMut(ChatEvent<'_>) + Send),
    ) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let user = TranscriptMessage::user(text, determine_sentiment(text));
        self.messages.push(user);
        if let Some(user) = self.messages.last() {
            observer(ChatEvent::UserMessage(user));
        }

        let history = self.history_for_model();
        let reply_index = self.messages.len();
        let placeholder = TranscriptMessage::model_placeholder();
        let message_id = placeholder.id.clone();
        self.messages.push(placeholder);

        let messages = &mut self.messages;
        let result = self
            .transport
            .stream_reply(&self.system_prompt, &history, &mut |delta| {
                let reply = &mut messages[reply_index];
                reply.text.push_str(delta);
                reply.sentiment = Some(determine_sentiment(&reply.text));
                observer(ChatEvent::ReplyDelta {
                    message: &messages[reply_index],
                    delta,
                });
            })
            .await;

        match result {
            Ok(()) => {
                info!(
                    message_id = %message_id,
                    chars = self.messages[reply_index].text.len(),
                    "assistant reply complete"
                );
                SendOutcome::Replied { message_id }
            }
            Err(e) => {
                warn!(error = %e, "assistant reply failed");
                if self.messages[reply_index].text.is_empty() {
                    self.messages.remove(reply_index);
                }
                self.messages.push(TranscriptMessage::error(UNAVAILABLE_MESSAGE));
                if let Some(notice) = self.messages.last() {
                    observer(ChatEvent::Failed(notice));
                }
                SendOutcome::Failed(e)
            }
        }
    }

    /// Drop the transcript and start over from the welcome message.
    pub fn clear(&mut self) {
        self.messages = vec![self.welcome.clone()];
        info!("chat transcript cleared");
    }

    /// Record thumbs up/down on an assistant message. Returns `false` when
    /// no assistant message has that id.
    pub fn set_feedback(&mut self, id: &str, feedback: Feedback) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.role == MessageRole::Model)
        {
            Some(msg) => {
                msg.feedback = Some(feedback);
                true
            }
            None => false,
        }
    }
}

use omni_core::models::transcript::{MessageRole, Sentiment};

use crate::blocks::RenderedMessage;
use crate::parse::{render_message, render_partial};
use crate::sentiment::determine_sentiment;

/// Snapshot of a message after a chunk has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamFrame {
    pub rendered: RenderedMessage,
    pub sentiment: Sentiment,
}

/// Accumulates a streamed reply and re-renders it after every chunk.
///
/// Every frame is rendered from the full buffer, so a directive split
/// across chunks becomes a widget as soon as its closing brace arrives.
#[derive(Debug)]
pub struct StreamRenderer {
    role: MessageRole,
    buffer: String,
    chunks: usize,
}

impl StreamRenderer {
    pub fn new(role: MessageRole) -> Self {
        Self {
            role,
            buffer: String::new(),
            chunks: 0,
        }
    }

    /// Append a chunk and render the text received so far.
    pub fn push(&mut self, chunk: &str) -> StreamFrame {
        self.buffer.push_str(chunk);
        self.chunks += 1;
        StreamFrame {
            rendered: render_partial(&self.buffer, self.role),
            sentiment: determine_sentiment(&self.buffer),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Render the final text. Directives still open at this point are shown
    /// as plain text.
    pub fn finish(self) -> (String, StreamFrame) {
        let frame = StreamFrame {
            rendered: render_message(&self.buffer, self.role),
            sentiment: determine_sentiment(&self.buffer),
        };
        (self.buffer, frame)
    }
}

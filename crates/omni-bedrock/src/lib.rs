//! omni-bedrock
//!
//! The Omni assistant: prompt and context assembly, the streaming Bedrock
//! transport, and the chat session that turns streamed replies into
//! transcript messages.

pub mod chat;
pub mod context;
pub mod error;
pub mod session;

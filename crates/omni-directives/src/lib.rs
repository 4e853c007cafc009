//! omni-directives
//!
//! Turns assistant text into renderable blocks: the safety notice, prose,
//! headers, bullets, and the inline `{score:...}`, `{viz:...}` and
//! `{insight:...}` widgets. Also estimates message tone and re-renders
//! replies incrementally while they stream in.

pub mod blocks;
pub mod parse;
pub mod sentiment;
pub mod stream;

pub use blocks::{Block, DirectiveKind, RenderedMessage, ScoreChart, VizKind, VizPoint, VizSpec};
pub use parse::{render_message, render_partial};
pub use sentiment::determine_sentiment;
pub use stream::StreamRenderer;

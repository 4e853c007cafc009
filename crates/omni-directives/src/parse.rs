//! Splitting assistant text into blocks.
//!
//! The assistant is prompted to embed three kinds of directive in otherwise
//! free-form prose:
//!
//! ```text
//! {score: Future Health, 55.6, 61.1}
//! {viz: {"type": "line", "title": "...", "data": [...]}}
//! {insight: Jane worries less than her parent thinks.}
//! ```
//!
//! The text is split around every directive and every line break, keeping
//! the separators. Each piece then becomes one [`Block`]. There is no
//! grammar beyond these literal patterns: directives do not nest, a viz
//! body ends at the first `}}` and an insight ends at the first `}`. A viz
//! whose body is not valid chart JSON is dropped.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use omni_core::models::transcript::MessageRole;

use crate::blocks::{Block, DirectiveKind, RenderedMessage, ScoreChart, VizSpec};

/// Separates the safety notice from the body of a reply.
pub const DISCLAIMER_SEPARATOR: &str = "---";

static TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(\{score:\s*[^,]+?,\s*[\d.]+\s*,\s*[\d.]+\s*\}|\{viz:\s*\{.*?\}\}|\{insight:\s*.*?\}|\n)",
    )
    .expect("trigger pattern is valid")
});

static SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{score:\s*([^,]+?),\s*([\d.]+)\s*,\s*([\d.]+)\s*\}")
        .expect("score pattern is valid")
});

static VIZ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\{viz:\s*(\{.*?\})\}").expect("viz pattern is valid")
});

static INSIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\{insight:\s*(.*?)\}").expect("insight pattern is valid")
});

static OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{(score|viz|insight):").expect("opener pattern is valid")
});

/// Split off the safety notice.
///
/// Returns `(disclaimer, body)`. Without a separator the whole text is the
/// body; with several, everything after the first one is the body.
pub fn split_disclaimer(text: &str) -> (Option<&str>, &str) {
    match text.split_once(DISCLAIMER_SEPARATOR) {
        Some((disclaimer, body)) => (Some(disclaimer), body),
        None => (None, text),
    }
}

/// Strip markdown emphasis markers and surrounding whitespace.
pub fn sanitize(s: &str) -> String {
    s.replace("**", "").replace('*', "").trim().to_string()
}

/// Split `content` around directives and line breaks, keeping both.
///
/// Empty pieces between adjacent separators are kept, so the output
/// alternates text, separator, text, ...
pub fn tokenize(content: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in TRIGGER.find_iter(content) {
        tokens.push(&content[last..m.start()]);
        tokens.push(m.as_str());
        last = m.end();
    }
    tokens.push(&content[last..]);
    tokens
}

/// Parse the longest numeric prefix of `s`, the way a lenient float reader
/// treats `"1.5.2"` as `1.5`.
pub fn parse_number_prefix(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    s[..end].parse().ok()
}

fn parse_score(token: &str) -> Option<ScoreChart> {
    let caps = SCORE.captures(token)?;
    Some(ScoreChart {
        label: caps[1].trim().to_string(),
        child: parse_number_prefix(&caps[2])?,
        parent: parse_number_prefix(&caps[3])?,
    })
}

enum Viz {
    Parsed(VizSpec),
    Invalid,
}

fn parse_viz(token: &str) -> Option<Viz> {
    let caps = VIZ.captures(token)?;
    match serde_json::from_str::<VizSpec>(&caps[1]) {
        Ok(spec) => Some(Viz::Parsed(spec)),
        Err(e) => {
            debug!(error = %e, "dropping viz directive with invalid body");
            Some(Viz::Invalid)
        }
    }
}

fn parse_insight(token: &str) -> Option<String> {
    INSIGHT.captures(token).map(|caps| sanitize(&caps[1]))
}

fn is_header(trimmed: &str) -> bool {
    trimmed.starts_with("###") || (trimmed.starts_with("**") && trimmed.ends_with("**"))
}

fn bullet_text(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('•')
        .or_else(|| trimmed.strip_prefix("- "))
}

fn parse_token(token: &str) -> Option<Block> {
    if token == "\n" {
        return Some(Block::Spacer);
    }
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(chart) = parse_score(trimmed) {
        return Some(Block::Score(chart));
    }
    match parse_viz(trimmed) {
        Some(Viz::Parsed(spec)) => return Some(Block::Viz(spec)),
        Some(Viz::Invalid) => return None,
        None => {}
    }
    if let Some(text) = parse_insight(trimmed) {
        return Some(Block::Insight { text });
    }

    if is_header(trimmed) {
        return Some(Block::Header {
            text: sanitize(trimmed.trim_start_matches('#')),
        });
    }
    if let Some(rest) = bullet_text(trimmed) {
        return Some(Block::Bullet {
            text: sanitize(rest),
        });
    }
    Some(Block::Paragraph {
        text: sanitize(token),
    })
}

/// Turn message body text into blocks.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    tokenize(content).into_iter().filter_map(parse_token).collect()
}

fn split_for_role(text: &str, role: MessageRole) -> (Option<String>, &str) {
    match (role, split_disclaimer(text)) {
        (MessageRole::Model, (Some(disclaimer), body)) => (Some(sanitize(disclaimer)), body),
        _ => (None, text),
    }
}

/// Render a complete message.
///
/// Only assistant messages get a separate safety notice; for user messages
/// the separator is treated as part of the body.
pub fn render_message(text: &str, role: MessageRole) -> RenderedMessage {
    let (disclaimer, body) = split_for_role(text, role);
    RenderedMessage {
        disclaimer,
        blocks: parse_blocks(body),
    }
}

/// Byte offset and kind of a directive that has been opened but whose
/// closing brace has not arrived.
///
/// A directive that is closed but does not match its pattern (say
/// `{score: X}`) is not open; it renders as text like any other prose.
pub fn unterminated_directive(content: &str) -> Option<(usize, DirectiveKind)> {
    let complete: Vec<(usize, usize)> = TRIGGER
        .find_iter(content)
        .filter(|m| m.as_str() != "\n")
        .map(|m| (m.start(), m.end()))
        .collect();

    OPENER.captures_iter(content).find_map(|caps| {
        let whole = caps.get(0)?;
        let start = whole.start();
        let covered = complete.iter().any(|&(s, e)| start >= s && start < e);
        if covered {
            return None;
        }
        let kind = match caps[1].to_ascii_lowercase().as_str() {
            "score" => DirectiveKind::Score,
            "viz" => DirectiveKind::Viz,
            _ => DirectiveKind::Insight,
        };
        let closing = match kind {
            DirectiveKind::Viz => "}}",
            _ => "}",
        };
        if content[whole.end()..].contains(closing) {
            return None;
        }
        Some((start, kind))
    })
}

/// Render text that is still streaming in.
///
/// Identical to [`render_message`], except that a trailing directive which
/// is still open renders as [`Block::Pending`] instead of as raw text.
pub fn render_partial(text: &str, role: MessageRole) -> RenderedMessage {
    let (disclaimer, body) = split_for_role(text, role);
    let blocks = match unterminated_directive(body) {
        Some((start, kind)) => {
            let mut blocks = parse_blocks(&body[..start]);
            blocks.push(Block::Pending { directive: kind });
            blocks
        }
        None => parse_blocks(body),
    };
    RenderedMessage { disclaimer, blocks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_keeps_separators() {
        let tokens = tokenize("a\nb {insight: c} d");
        assert_eq!(tokens, ["a", "\n", "b ", "{insight: c}", " d"]);
    }

    #[test]
    fn adjacent_separators_leave_empty_pieces() {
        let tokens = tokenize("\n\n");
        assert_eq!(tokens, ["", "\n", "", "\n", ""]);
        assert_eq!(parse_blocks("\n\n"), [Block::Spacer, Block::Spacer]);
    }

    #[test]
    fn number_prefix_is_lenient() {
        assert_eq!(parse_number_prefix("55.6"), Some(55.6));
        assert_eq!(parse_number_prefix("1.5.2"), Some(1.5));
        assert_eq!(parse_number_prefix("."), None);
        assert_eq!(parse_number_prefix("7."), Some(7.0));
    }

    #[test]
    fn sanitize_strips_emphasis() {
        assert_eq!(sanitize("  **Bold** and *italic* "), "Bold and italic");
    }

    #[test]
    fn disclaimer_split_keeps_later_separators_in_body() {
        let (d, body) = split_disclaimer("Notice --- one --- two");
        assert_eq!(d, Some("Notice "));
        assert_eq!(body, " one --- two");
        assert_eq!(split_disclaimer("plain"), (None, "plain"));
    }

    #[test]
    fn directives_are_case_insensitive() {
        let blocks = parse_blocks("{SCORE: Coping, 68.8, 71.9}");
        assert_eq!(
            blocks,
            [Block::Score(ScoreChart {
                label: "Coping".to_string(),
                child: 68.8,
                parent: 71.9,
            })]
        );
    }

    #[test]
    fn invalid_viz_is_dropped() {
        let blocks = parse_blocks("before {viz: {not json}} after");
        assert_eq!(
            blocks,
            [
                Block::Paragraph { text: "before".to_string() },
                Block::Paragraph { text: "after".to_string() },
            ]
        );
    }

    #[test]
    fn bullet_keeps_inner_hyphens() {
        assert_eq!(
            parse_blocks("• Social-emotional well-being"),
            [Block::Bullet { text: "Social-emotional well-being".to_string() }]
        );
        assert_eq!(
            parse_blocks("- **Coping** is stable"),
            [Block::Bullet { text: "Coping is stable".to_string() }]
        );
    }

    #[test]
    fn headers_lose_hashes_and_stars() {
        assert_eq!(
            parse_blocks("### Key Findings"),
            [Block::Header { text: "Key Findings".to_string() }]
        );
        assert_eq!(
            parse_blocks("**Summary**"),
            [Block::Header { text: "Summary".to_string() }]
        );
    }

    #[test]
    fn user_text_has_no_disclaimer() {
        let rendered = render_message("a --- b", MessageRole::User);
        assert_eq!(rendered.disclaimer, None);
        assert_eq!(rendered.blocks, [Block::Paragraph { text: "a --- b".to_string() }]);
    }

    #[test]
    fn open_directive_is_detected() {
        assert_eq!(
            unterminated_directive("Look: {score: Coping, 68"),
            Some((6, DirectiveKind::Score))
        );
        assert_eq!(unterminated_directive("{score: Coping, 68, 71}"), None);
        assert_eq!(
            unterminated_directive("{insight: done} then {viz: {\"type\""),
            Some((21, DirectiveKind::Viz))
        );
    }

    #[test]
    fn closed_malformed_directive_is_not_open() {
        assert_eq!(unterminated_directive("Gap: {score: Coping, high, low} is notable."), None);
        assert_eq!(unterminated_directive("{score: X} and more"), None);
        // A viz body has closed its JSON object but not the directive.
        assert_eq!(
            unterminated_directive("{viz: {\"type\": \"bar\"}"),
            Some((0, DirectiveKind::Viz))
        );
    }

    #[test]
    fn directives_may_span_lines() {
        assert_eq!(
            parse_blocks("{insight: Jane copes\nwell at school}"),
            [Block::Insight { text: "Jane copes\nwell at school".to_string() }]
        );
        let blocks = parse_blocks("{viz: {\"type\": \"bar\",\n\"title\": \"Now\", \"data\": []}}");
        assert!(matches!(&blocks[..], [Block::Viz(spec)] if spec.title == "Now"));
    }

    #[test]
    fn unparseable_score_number_stays_literal() {
        assert_eq!(
            parse_blocks("{score: X, ., 3}"),
            [Block::Paragraph { text: "{score: X, ., 3}".to_string() }]
        );
    }
}

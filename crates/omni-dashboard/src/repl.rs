//! Interactive chat with the assistant.
//!
//! Replies are printed block by block as they stream in: a block is printed
//! once a later block has started, so text that may still grow and
//! directives that are still open are held back. If the final render splits
//! the text differently, printing resumes at the first block that changed.

use std::io::Write;

use eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use omni_bedrock::chat::{BedrockTransport, ChatTransport, load_sdk_config};
use omni_bedrock::context::{SUGGESTIONS, welcome_message};
use omni_bedrock::session::{ChatEvent, ChatSession, SendOutcome};
use omni_core::dataset::Dataset;
use omni_core::models::transcript::{Feedback, MessageRole, TranscriptMessage};
use omni_dashboard::config::load_config;
use omni_dashboard::views::Views;
use omni_directives::{Block, StreamRenderer};
use omni_storage::store::KeyValueStore;
use omni_storage::transcript::TranscriptStore;

use crate::commands::transcript_store;

/// Blocks of a streaming render that will not change as more text arrives.
/// The last block may still grow; behind an open directive the text leading
/// up to it may still merge with the directive.
fn stable_len(blocks: &[Block]) -> usize {
    let held = if matches!(blocks.last(), Some(Block::Pending { .. })) {
        2
    } else {
        1
    };
    blocks.len().saturating_sub(held)
}

/// Index to resume printing `blocks` from, given what is on screen, or
/// `None` when there is nothing new. A block that differs from the printed
/// one is printed again rather than lost.
fn resume_at(printed: &[Block], blocks: &[Block]) -> Option<usize> {
    let common = printed
        .iter()
        .zip(blocks)
        .take_while(|(shown, block)| shown == block)
        .count();
    (common < blocks.len()).then_some(common)
}

/// Prints a streaming reply without reprinting what is already on screen.
struct StreamPrinter<'a> {
    views: &'a Views,
    subject: &'a str,
    renderer: StreamRenderer,
    printed: Vec<Block>,
    disclaimer_shown: bool,
}

impl<'a> StreamPrinter<'a> {
    fn new(views: &'a Views, subject: &'a str) -> Self {
        Self {
            views,
            subject,
            renderer: StreamRenderer::new(MessageRole::Model),
            printed: Vec::new(),
            disclaimer_shown: false,
        }
    }

    fn on_delta(&mut self, delta: &str) {
        let frame = self.renderer.push(delta);
        // Until the separator arrives the notice would be mistaken for body
        // text.
        let Some(disclaimer) = &frame.rendered.disclaimer else {
            return;
        };
        if !self.disclaimer_shown {
            println!("  ! Safety Notice: {disclaimer}");
            self.disclaimer_shown = true;
        }
        let stable = stable_len(&frame.rendered.blocks);
        self.print_blocks(&frame.rendered.blocks[..stable]);
    }

    fn finish(mut self, reply: Option<&TranscriptMessage>) {
        let renderer = std::mem::replace(&mut self.renderer, StreamRenderer::new(MessageRole::Model));
        let (_, frame) = renderer.finish();
        if !self.disclaimer_shown
            && let Some(disclaimer) = &frame.rendered.disclaimer
        {
            println!("  ! Safety Notice: {disclaimer}");
        }
        self.print_blocks(&frame.rendered.blocks);
        if let Some(sentiment) = reply.and_then(|m| m.sentiment) {
            println!("  ({sentiment:?} tone)");
        }
    }

    fn print_blocks(&mut self, blocks: &[Block]) {
        let Some(from) = resume_at(&self.printed, blocks) else {
            return;
        };
        if from < self.printed.len() {
            debug!(from, "reply re-rendered differently, reprinting");
        }
        match self.views.chat_blocks(&blocks[from..], self.subject) {
            Ok(text) => {
                print!("{text}");
                let _ = std::io::stdout().flush();
            }
            Err(e) => warn!(error = %e, "failed to render reply blocks"),
        }
        self.printed = blocks.to_vec();
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_suggestions() {
    println!("Suggestions:");
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        println!("  /{} {suggestion}", i + 1);
    }
}

fn last_reply_id(messages: &[TranscriptMessage]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::Model && !m.is_welcome() && !m.is_error())
        .map(|m| m.id.clone())
}

async fn send<T: ChatTransport, S: KeyValueStore>(
    session: &mut ChatSession<T>,
    store: &TranscriptStore<S>,
    views: &Views,
    subject: &str,
    text: &str,
) {
    let mut printer = StreamPrinter::new(views, subject);
    let mut failure = None;
    println!("Omni is thinking...");

    let outcome = session
        .send(text, &mut |event| match event {
            ChatEvent::UserMessage(_) => {}
            ChatEvent::ReplyDelta { delta, .. } => printer.on_delta(delta),
            ChatEvent::Failed(notice) => failure = Some(notice.clone()),
        })
        .await;

    match outcome {
        SendOutcome::Ignored => {}
        SendOutcome::Replied { message_id } => {
            let reply = session.messages().iter().find(|m| m.id == message_id);
            printer.finish(reply);
        }
        SendOutcome::Failed(e) => {
            warn!(error = %e, "chat request failed");
            if let Some(notice) = failure {
                match views.chat_message(&notice, subject) {
                    Ok(text) => print!("{text}"),
                    Err(e) => warn!(error = %e, "failed to render notice"),
                }
            }
        }
    }

    store.save(session.messages());
}

pub async fn run(message: Option<String>) -> Result<()> {
    let config = load_config()?.with_env_overrides();
    let dataset = Dataset::fixture();
    let subject = dataset.profile.name.as_str();
    let views = Views::new()?;

    let store = transcript_store(&config)?;
    let messages = store.load(&welcome_message(&dataset.profile));

    let sdk_config = load_sdk_config(&config.region).await;
    let transport =
        BedrockTransport::new(&sdk_config, &config.model_id).with_temperature(config.temperature);
    info!(model_id = transport.model_id(), region = %config.region, "assistant ready");

    let mut session = ChatSession::new(transport, dataset, messages)?;

    if let Some(text) = message {
        send(&mut session, &store, &views, subject, &text).await;
        return Ok(());
    }

    for message in session.messages() {
        println!("{}", views.chat_message(message, subject)?);
    }
    print_suggestions();
    println!("Commands: /clear, /up, /down, /suggest, /quit");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "/quit" | "/exit" => break,
            "/suggest" => print_suggestions(),
            "/clear" => {
                session.clear();
                store.clear()?;
                println!("{}", views.chat_message(&session.messages()[0], subject)?);
            }
            "/up" | "/down" => {
                let feedback = if line == "/up" { Feedback::Up } else { Feedback::Down };
                match last_reply_id(session.messages()) {
                    Some(id) if session.set_feedback(&id, feedback) => {
                        store.save(session.messages());
                        println!("Thanks for the feedback.");
                    }
                    _ => println!("No reply to rate yet."),
                }
            }
            command if command.starts_with('/') => {
                let pick = command[1..]
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| SUGGESTIONS.get(i));
                match pick {
                    Some(suggestion) => {
                        println!("> {suggestion}");
                        send(&mut session, &store, &views, subject, suggestion).await;
                    }
                    None => println!("Unknown command: {command}"),
                }
            }
            text => send(&mut session, &store, &views, subject, text).await,
        }
        prompt();
    }

    Ok(())
}

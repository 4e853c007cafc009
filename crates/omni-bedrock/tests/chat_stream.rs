//! Integration test for the streaming Bedrock transport.
//!
//! This test calls the real Bedrock API and requires valid credentials in
//! the environment (e.g. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`) and
//! access to the model named by `OMNI_MODEL_ID`.
//!
//! Run with: `cargo test -p omni-bedrock --test chat_stream -- --ignored`

use omni_bedrock::chat::{BedrockTransport, load_sdk_config};
use omni_bedrock::session::{ChatEvent, ChatSession, SendOutcome};
use omni_core::dataset::Dataset;

const DEFAULT_MODEL: &str = "us.anthropic.claude-haiku-4-5-20251001-v1:0";

#[tokio::test]
#[ignore]
async fn live_reply_streams_with_disclaimer() {
    let config = load_sdk_config("us-east-1").await;
    let model_id = std::env::var("OMNI_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let transport = BedrockTransport::new(&config, model_id);
    let mut chat = ChatSession::new(transport, Dataset::fixture(), Vec::new()).unwrap();

    let mut deltas = 0usize;
    let outcome = chat
        .send("Analyze Jane's score gaps", &mut |event| {
            if let ChatEvent::ReplyDelta { delta, .. } = event {
                deltas += 1;
                print!("{delta}");
            }
        })
        .await;
    println!();

    match outcome {
        SendOutcome::Replied { .. } => {}
        other => panic!("expected a reply, got {other:?}"),
    }
    assert!(deltas > 0);
    let reply = &chat.messages()[2].text;
    assert!(reply.contains("---"), "reply should lead with a disclaimer");
}

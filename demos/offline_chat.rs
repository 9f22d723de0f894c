//! Drive a chat session without a model server.
//!
//! Run with `cargo run --example offline_chat`.  The scripted transport answers
//! by keyword after a short delay, and a second question sent while the first
//! is still pending is ignored.

use std::time::Duration;

use imali::chat::{ChatSession, SubmitOutcome};
use imali::{Language, PlainTextRenderer, Renderer, ScriptedTransport};

#[tokio::main]
async fn main() {
    let transport = ScriptedTransport::new().with_latency(Duration::from_millis(300));
    let session = ChatSession::new(transport, Language::En);
    let mut renderer = PlainTextRenderer::new();

    let (first, second) = futures::join!(
        session.submit("What is my projected revenue?"),
        session.submit("And my expenses?"),
    );
    if let SubmitOutcome::Replied {
        strategies_used, ..
    } = &first
    {
        renderer.print_strategies(strategies_used);
    }
    assert_eq!(second, SubmitOutcome::Busy);
    renderer.print_info("Second question ignored while the first was pending.");

    session.set_language(Language::Af);
    session.submit("Stuur die report").await;

    for message in session.transcript() {
        renderer.print_message(&message);
    }
    let stats = session.stats();
    renderer.print_info(&format!(
        "{} messages, {} replies, {} ignored",
        stats.message_count, stats.replies, stats.rejected
    ));
}

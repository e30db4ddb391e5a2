//! Prints events from a running opencode server.
//!
//! Prerequisites:
//! - Start a server, e.g. `opencode serve --port 4096`
//! - Set `OPENCODE_BASE_URL` if it is not on `http://localhost:54321`
//!
//! Run:
//!   OPENCODE_BASE_URL=http://localhost:4096 RUST_LOG=opencode_sdk=debug cargo run --example stream_events

use anyhow::Context;
use opencode_sdk::api::DirectoryParams;
use opencode_sdk::types::EventType;
use opencode_sdk::{OpencodeClient, RequestContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = OpencodeClient::new().context("building client")?;
    let ctx = RequestContext::new();

    // Ctrl-C ends the subscription cleanly.
    let cancel = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let sessions = client.session().list(&ctx, &DirectoryParams::default()).await?;
    println!("{} session(s) on {}", sessions.len(), client.config().base_url);

    let mut events = client.event().subscribe(&ctx, &DirectoryParams::default()).await;
    while events.next().await {
        let Some(event) = events.current() else { continue };
        match event.kind() {
            EventType::MessagePartUpdated => {
                let props = event.as_message_part_updated()?.properties;
                if let Some(delta) = props.delta {
                    print!("{}", delta);
                } else {
                    println!("[part {} {}]", props.part.kind(), props.part.id());
                }
            }
            EventType::SessionError => {
                let props = event.as_session_error()?.properties;
                let message = props.error.and_then(|e| e.message()).unwrap_or_default();
                println!("[session error] {}", message);
            }
            other if other.is_known() => println!("[{}]", other),
            other => println!("[unrecognised event {}]", other),
        }
    }

    match events.err() {
        Some(err) if err.is_cancelled() => Ok(()),
        Some(err) => Err(anyhow::anyhow!("event stream failed: {}", err)),
        None => Ok(()),
    }
}

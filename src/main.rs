//! Entry point: load config, connect to the chat room, and drive it from the terminal.

use copygram_client::config::Config;
use copygram_client::handlers::{ChatClient, ChatEvent};
use copygram_client::services::transcript::{Alignment, TranscriptEntry};
use copygram_client::services::Composer;
use copygram_client::ClientError;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const RIGHT_INDENT: &str = "                                        ";

fn print_entry(entry: &TranscriptEntry) {
    match entry {
        TranscriptEntry::Message(m) if m.alignment == Alignment::Right => {
            println!("{}{}", RIGHT_INDENT, entry)
        }
        _ => println!("{}", entry),
    }
}

/// Print rendered events; returns the navigation target when the viewer leaves.
async fn render(mut events: broadcast::Receiver<ChatEvent>) -> Option<String> {
    loop {
        match events.recv().await {
            Ok(ChatEvent::Rendered(entry)) => print_entry(&entry),
            Ok(ChatEvent::Cleared) => print_entry(&TranscriptEntry::Placeholder),
            Ok(ChatEvent::Navigate(url)) => return Some(url),
            Ok(ChatEvent::Malformed(reason)) => tracing::warn!(reason = %reason, "skipped frame"),
            Ok(ChatEvent::Disconnected) => return None,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "renderer lagging")
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = ChatClient::connect(
        &config.base_url,
        config.session_context(),
        config.cookie.as_deref(),
    )
    .await?;
    for entry in client.transcript().await.entries() {
        print_entry(entry);
    }

    let mut renderer = tokio::spawn(render(client.subscribe()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut composer = Composer::default();

    loop {
        tokio::select! {
            left = &mut renderer => {
                if let Ok(Some(url)) = left {
                    println!("-> {}", url);
                }
                break;
            }
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let result = match line.trim() {
                    "/quit" => break,
                    "/clear" => client.clear_chat().await,
                    "/leave" => client.leave_group().await,
                    cmd if cmd.starts_with("/attach ") => {
                        composer.attach(cmd.trim_start_matches("/attach ").trim());
                        Ok(())
                    }
                    "/detach" => {
                        let dropped = composer.detach_all();
                        tracing::info!(files = dropped.len(), "attachments dropped");
                        Ok(())
                    }
                    _ => {
                        composer.input = line.clone();
                        client.send_message(&mut composer).await.map(|_| ())
                    }
                };
                if let Err(e) = result {
                    if matches!(e, ClientError::Attachment { .. }) {
                        // the unreadable path would fail every later send
                        let dropped = composer.detach_all();
                        tracing::warn!(error = %e, files = dropped.len(), "message not sent, attachments dropped");
                    } else if e.is_transport() {
                        tracing::error!(error = %e, "chat transport failed");
                    } else {
                        tracing::warn!(error = %e, "chat action rejected");
                    }
                }
            }
        }
    }

    renderer.abort();
    client.close().await?;
    Ok(())
}

//! Chat room WebSocket client: one connection per room, writer queue, reader dispatch.

use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::connect_async;
use tracing::{debug, error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::models::event::{IncomingEvent, OutgoingEvent};
use crate::models::session::SessionContext;
use crate::services::attachments::{encode_all, FileSource, LocalFiles};
use crate::services::chat::{Applied, ChatSession, Composer};
use crate::services::transcript::{Transcript, TranscriptEntry};

/// What the UI layer hears about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Rendered(TranscriptEntry),
    Cleared,
    /// The viewer left the group; leave the room page.
    Navigate(String),
    /// A frame that could not be understood; the transcript is unchanged.
    Malformed(String),
    /// The socket went away. There is no reconnect.
    Disconnected,
}

/// Unique connection id for log correlation.
pub fn generate_connection_id() -> String {
    format!("{}.{}", std::process::id(), Uuid::new_v4().as_simple())
}

/// `ws://` or `wss://` (iff the page is `https`) + host + `/ws/chat/<id>/`.
pub fn endpoint_url(page: &Url, chat_id: u64) -> ClientResult<Url> {
    let scheme = if page.scheme() == "https" { "wss" } else { "ws" };
    let host = page
        .host_str()
        .ok_or_else(|| ClientError::Config(format!("page URL has no host: {}", page)))?;
    let authority = match page.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    Ok(Url::parse(&format!(
        "{}://{}/ws/chat/{}/",
        scheme, authority, chat_id
    ))?)
}

/// Parse and apply one text frame to the session.
pub(crate) fn dispatch_frame(session: &mut ChatSession, text: &str) -> Option<ChatEvent> {
    let event = match serde_json::from_str::<IncomingEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(chat_id = session.context().chat_id, error = %e, "malformed chat frame");
            return Some(ChatEvent::Malformed(e.to_string()));
        }
    };
    match session.apply(event, &chrono::Local::now()) {
        Applied::Appended(entry) => Some(ChatEvent::Rendered(entry)),
        Applied::Cleared => Some(ChatEvent::Cleared),
        Applied::Navigate(url) => Some(ChatEvent::Navigate(url)),
        Applied::Ignored => None,
    }
}

/// Live chat session bound to one room socket.
pub struct ChatClient {
    connection_id: String,
    session: Arc<Mutex<ChatSession>>,
    tx: mpsc::UnboundedSender<String>,
    events: broadcast::Sender<ChatEvent>,
    files: Arc<dyn FileSource>,
    send_task: JoinHandle<()>,
    recv_task: JoinHandle<()>,
}

impl ChatClient {
    /// Connect reading attachments from the local filesystem.
    pub async fn connect(
        page: &Url,
        ctx: SessionContext,
        cookie: Option<&str>,
    ) -> ClientResult<Self> {
        Self::connect_with(page, ctx, cookie, Arc::new(LocalFiles)).await
    }

    pub async fn connect_with(
        page: &Url,
        ctx: SessionContext,
        cookie: Option<&str>,
        files: Arc<dyn FileSource>,
    ) -> ClientResult<Self> {
        let url = endpoint_url(page, ctx.chat_id)?;
        let mut request = url.as_str().into_client_request()?;
        if let Some(cookie) = cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ClientError::Config(format!("cookie header: {}", e)))?;
            request.headers_mut().insert("cookie", value);
        }

        let (stream, _) = connect_async(request).await?;
        let connection_id = generate_connection_id();
        info!(connection_id = %connection_id, chat_id = ctx.chat_id, url = %url, "chat connected");

        let (mut sender, mut receiver) = stream.split();
        let session = Arc::new(Mutex::new(ChatSession::new(ctx)));
        let (events, _) = broadcast::channel(256);

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let send_id = connection_id.clone();
        let send_task = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                if let Err(e) = sender.send(Message::Text(frame)).await {
                    warn!(connection_id = %send_id, error = %e, "chat send failed");
                    return;
                }
            }
            let _ = sender.send(Message::Close(None)).await;
            debug!(connection_id = %send_id, "chat writer closed");
        });

        let recv_session = session.clone();
        let recv_events = events.clone();
        let recv_id = connection_id.clone();
        let recv_task = tokio::spawn(async move {
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        let event = {
                            let mut session = recv_session.lock().await;
                            dispatch_frame(&mut session, &text)
                        };
                        if let Some(event) = event {
                            let _ = recv_events.send(event);
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(connection_id = %recv_id, error = %e, "chat receive failed");
                        break;
                    }
                }
            }
            error!(connection_id = %recv_id, "chat socket closed unexpectedly");
            let _ = recv_events.send(ChatEvent::Disconnected);
        });

        Ok(Self {
            connection_id,
            session,
            tx,
            events,
            files,
            send_task,
            recv_task,
        })
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the rendered transcript.
    pub async fn transcript(&self) -> Transcript {
        self.session.lock().await.transcript().clone()
    }

    pub async fn session_count(&self) -> u64 {
        self.session.lock().await.session_count()
    }

    pub async fn context(&self) -> SessionContext {
        self.session.lock().await.context().clone()
    }

    fn queue(&self, event: &OutgoingEvent) -> ClientResult<()> {
        let frame = serde_json::to_string(event)?;
        self.tx.send(frame).map_err(|_| ClientError::Closed)?;
        debug!(connection_id = %self.connection_id, action = event.action(), "frame queued");
        Ok(())
    }

    /// Send the composed message. `Ok(false)` when there was nothing to send.
    /// Every selected file is read before anything is sent; one failed read aborts the send.
    pub async fn send_message(&self, composer: &mut Composer) -> ClientResult<bool> {
        if composer.is_blank() {
            return Ok(false);
        }
        let attachments = encode_all(self.files.as_ref(), &composer.files).await?;
        let count = attachments.len();
        let mut session = self.session.lock().await;
        let Some(event) = session.message_event(&composer.input, attachments) else {
            return Ok(false);
        };
        self.queue(&event)?;
        session.record_sent();
        drop(session);
        composer.reset();
        info!(connection_id = %self.connection_id, attachments = count, "message sent");
        Ok(true)
    }

    pub async fn clear_chat(&self) -> ClientResult<()> {
        let event = self.session.lock().await.clear_event()?;
        self.queue(&event)
    }

    pub async fn leave_group(&self) -> ClientResult<()> {
        let event = self.session.lock().await.leave_event()?;
        self.queue(&event)
    }

    /// Page unload: send `remove_chat` if this direct chat never got a message,
    /// flush the writer and close. Returns whether `remove_chat` went out.
    pub async fn close(self) -> ClientResult<bool> {
        let unload = self.session.lock().await.unload_event();
        let removed = match &unload {
            Some(event) => self.queue(event).is_ok(),
            None => false,
        };
        self.recv_task.abort();
        drop(self.tx);
        let _ = self.send_task.await;
        info!(connection_id = %self.connection_id, removed, "chat closed");
        Ok(removed)
    }
}

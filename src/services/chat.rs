//! Chat session state: what to send for each UI action and how to render each inbound frame.

use chrono::{DateTime, TimeZone};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};
use crate::models::attachment::Attachment;
use crate::models::event::{IncomingEvent, OutgoingEvent};
use crate::models::session::{ChatKind, SessionContext};
use crate::services::transcript::{
    format_timestamp, Alignment, AttachmentLink, MessageEntry, Transcript, TranscriptEntry,
};

/// Message input plus the files picked for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    pub input: String,
    pub files: Vec<PathBuf>,
}

impl Composer {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            files: Vec::new(),
        }
    }

    pub fn attach(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    /// Whitespace-only text and no files: nothing to send.
    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty() && self.files.is_empty()
    }

    /// Drop the file selection and keep the text.
    pub fn detach_all(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.files)
    }

    /// Clear the input and the file selection after a successful send.
    pub fn reset(&mut self) {
        self.input.clear();
        self.files.clear();
    }
}

/// Result of applying one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Appended(TranscriptEntry),
    Cleared,
    /// The viewer left; the page should go here.
    Navigate(String),
    Ignored,
}

/// Transcript and counters for one page view of one room.
#[derive(Debug, Clone)]
pub struct ChatSession {
    ctx: SessionContext,
    transcript: Transcript,
    /// Messages rendered during this page view, from any sender. Not persisted.
    session_count: u64,
    /// A message frame was queued locally during this page view. Survives clears.
    sent_this_view: bool,
}

impl ChatSession {
    pub fn new(ctx: SessionContext) -> Self {
        let transcript = if ctx.initial_message_count == 0 {
            Transcript::empty_room()
        } else {
            Transcript::new()
        };
        Self {
            ctx,
            transcript,
            session_count: 0,
            sent_this_view: false,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn session_count(&self) -> u64 {
        self.session_count
    }

    pub fn sent_this_view(&self) -> bool {
        self.sent_this_view
    }

    /// Note that a message frame was handed to the socket, before any echo.
    pub fn record_sent(&mut self) {
        self.sent_this_view = true;
    }

    /// Frame for a composed message, or `None` when there is nothing to send.
    pub fn message_event(&self, text: &str, attachments: Vec<Attachment>) -> Option<OutgoingEvent> {
        if text.trim().is_empty() && attachments.is_empty() {
            return None;
        }
        Some(OutgoingEvent::SendMessage {
            url: self.ctx.kind,
            chat: self.ctx.chat_id,
            user: self.ctx.user.clone(),
            avatar: self.ctx.avatar.clone(),
            message: text.to_string(),
            files: if attachments.is_empty() {
                None
            } else {
                Some(attachments)
            },
        })
    }

    pub fn clear_event(&self) -> ClientResult<OutgoingEvent> {
        if !self.ctx.can_clear() {
            return Err(ClientError::NotPermitted(
                "only the group owner can clear this chat".to_string(),
            ));
        }
        Ok(OutgoingEvent::ClearChat {
            chat: self.ctx.chat_id,
            url: self.ctx.kind,
        })
    }

    pub fn leave_event(&self) -> ClientResult<OutgoingEvent> {
        if !self.ctx.can_leave() {
            return Err(ClientError::NotPermitted(
                "only group chats can be left".to_string(),
            ));
        }
        Ok(OutgoingEvent::LeaveGroup {
            chat: self.ctx.chat_id,
            user: self.ctx.user.clone(),
        })
    }

    /// A direct chat that was empty on load and stayed empty is removed when the page goes away.
    /// Own sends count as soon as they are queued; an unechoed message still keeps the chat.
    pub fn should_remove_on_unload(&self) -> bool {
        self.ctx.kind == ChatKind::Direct
            && self.ctx.initial_message_count == 0
            && self.session_count == 0
            && !self.sent_this_view
    }

    pub fn unload_event(&self) -> Option<OutgoingEvent> {
        self.should_remove_on_unload()
            .then_some(OutgoingEvent::RemoveChat { chat: self.ctx.chat_id })
    }

    /// Render one inbound frame; `now` stamps new messages.
    pub fn apply<Tz>(&mut self, event: IncomingEvent, now: &DateTime<Tz>) -> Applied
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match event {
            IncomingEvent::SendMessage {
                user,
                message,
                avatar,
                files,
            } => {
                let mine = self.ctx.is_viewer(&user);
                let attachments = files
                    .unwrap_or_default()
                    .into_iter()
                    .map(|f| AttachmentLink {
                        href: f.href(&self.ctx.media_url),
                        name: f.name,
                    })
                    .collect();
                let entry = TranscriptEntry::Message(MessageEntry {
                    timestamp: format_timestamp(now, self.ctx.locale),
                    alignment: if mine { Alignment::Right } else { Alignment::Left },
                    author: if mine { "Me".to_string() } else { user },
                    avatar,
                    attachments,
                    text: message.unwrap_or_default(),
                });
                self.transcript.push(entry.clone());
                self.session_count += 1;
                debug!(chat_id = self.ctx.chat_id, count = self.session_count, "message rendered");
                Applied::Appended(entry)
            }
            IncomingEvent::ClearChat {} => {
                self.transcript.reset();
                self.session_count = 0;
                info!(chat_id = self.ctx.chat_id, "chat cleared");
                Applied::Cleared
            }
            IncomingEvent::LeaveGroup { user } => {
                let entry = TranscriptEntry::Notice(format!("{} left this group", user));
                self.transcript.push(entry.clone());
                if self.ctx.is_viewer(&user) {
                    info!(chat_id = self.ctx.chat_id, "left group");
                    Applied::Navigate(self.ctx.leave_url.clone())
                } else {
                    Applied::Appended(entry)
                }
            }
            IncomingEvent::RemoveChat {} => Applied::Ignored,
        }
    }
}

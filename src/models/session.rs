//! Per-page chat session context.

use chrono::Locale;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Room kind, serialized as the route name the server dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatKind {
    /// One-to-one chat.
    #[serde(rename = "private_chat")]
    Direct,
    /// Group chat with an owner.
    #[serde(rename = "group_chat")]
    Group,
}

impl ChatKind {
    pub fn route_name(&self) -> &'static str {
        match self {
            ChatKind::Direct => "private_chat",
            ChatKind::Group => "group_chat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chat kind {0:?}, expected private_chat or group_chat")]
pub struct UnknownChatKind(pub String);

impl FromStr for ChatKind {
    type Err = UnknownChatKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim() {
            "private_chat" => Ok(ChatKind::Direct),
            "group_chat" => Ok(ChatKind::Group),
            other => Err(UnknownChatKind(other.to_string())),
        }
    }
}

/// Immutable facts about the room and viewer, supplied by the hosting page.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub chat_id: u64,
    /// Local viewer's username.
    pub user: String,
    pub avatar: String,
    pub kind: ChatKind,
    /// Group owner. Unused for direct chats.
    pub owner: Option<String>,
    /// Messages already in the room when the page loaded.
    pub initial_message_count: u64,
    /// Where to go after leaving a group.
    pub leave_url: String,
    /// Prefix under which stored attachments are served.
    pub media_url: String,
    /// Viewer's locale, used for month names in timestamps.
    pub locale: Locale,
}

impl SessionContext {
    pub fn is_owner(&self) -> bool {
        self.owner.as_deref() == Some(self.user.as_str())
    }

    /// Any participant may clear a direct chat; only the owner may clear a group.
    pub fn can_clear(&self) -> bool {
        match self.kind {
            ChatKind::Direct => true,
            ChatKind::Group => self.is_owner(),
        }
    }

    pub fn can_leave(&self) -> bool {
        self.kind == ChatKind::Group
    }

    pub fn is_viewer(&self, user: &str) -> bool {
        self.user == user
    }
}

//! Chat frames exchanged over the room WebSocket, discriminated by `action`.

use serde::{Deserialize, Serialize};

use crate::models::attachment::{Attachment, FileRef};
use crate::models::session::ChatKind;

/// Frame sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OutgoingEvent {
    SendMessage {
        url: ChatKind,
        chat: u64,
        user: String,
        avatar: String,
        message: String,
        /// Omitted from the frame when nothing is attached.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        files: Option<Vec<Attachment>>,
    },
    ClearChat {
        chat: u64,
        url: ChatKind,
    },
    LeaveGroup {
        chat: u64,
        user: String,
    },
    RemoveChat {
        chat: u64,
    },
}

impl OutgoingEvent {
    pub fn action(&self) -> &'static str {
        match self {
            OutgoingEvent::SendMessage { .. } => "send_message",
            OutgoingEvent::ClearChat { .. } => "clear_chat",
            OutgoingEvent::LeaveGroup { .. } => "leave_group",
            OutgoingEvent::RemoveChat { .. } => "remove_chat",
        }
    }
}

/// Frame broadcast by the server to every socket in the room.
/// Extra fields the server adds (`type`, `chat`, `url`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum IncomingEvent {
    SendMessage {
        user: String,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
        #[serde(default)]
        files: Option<Vec<FileRef>>,
    },
    ClearChat {},
    LeaveGroup {
        user: String,
    },
    /// Echo of a client's unload notice; nothing to render.
    RemoveChat {},
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn send_message_without_files_omits_field() {
        let ev = OutgoingEvent::SendMessage {
            url: ChatKind::Direct,
            chat: 12,
            user: "alice".to_string(),
            avatar: "/a.png".to_string(),
            message: "hi".to_string(),
            files: None,
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["action"], "send_message");
        assert_eq!(v["chat"], 12);
        assert_eq!(v["user"], "alice");
        assert_eq!(v["message"], "hi");
        assert_eq!(v["url"], "private_chat");
        assert!(v.get("files").is_none());
    }

    #[test]
    fn send_message_files_are_pairs() {
        let ev = OutgoingEvent::SendMessage {
            url: ChatKind::Group,
            chat: 1,
            user: "alice".to_string(),
            avatar: String::new(),
            message: String::new(),
            files: Some(vec![Attachment::from_bytes("a.txt", b"x")]),
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["files"], json!([["data:text/plain;base64,eA==", "a.txt"]]));
    }

    #[test]
    fn management_frames() {
        let clear = serde_json::to_value(OutgoingEvent::ClearChat { chat: 4, url: ChatKind::Group }).unwrap();
        assert_eq!(clear, json!({"action": "clear_chat", "chat": 4, "url": "group_chat"}));
        let leave = serde_json::to_value(OutgoingEvent::LeaveGroup { chat: 4, user: "bob".to_string() }).unwrap();
        assert_eq!(leave, json!({"action": "leave_group", "chat": 4, "user": "bob"}));
        let remove = serde_json::to_value(OutgoingEvent::RemoveChat { chat: 4 }).unwrap();
        assert_eq!(remove, json!({"action": "remove_chat", "chat": 4}));
    }

    #[test]
    fn incoming_ignores_server_fields() {
        let raw = r#"{"action":"send_message","type":"chat.message","url":"private_chat","chat":"9",
            "user":"bob","avatar":"/b.png","message":"yo","files":null}"#;
        let ev: IncomingEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            ev,
            IncomingEvent::SendMessage {
                user: "bob".to_string(),
                message: Some("yo".to_string()),
                avatar: Some("/b.png".to_string()),
                files: None,
            }
        );
    }

    #[test]
    fn incoming_files_and_clear() {
        let raw = r#"{"action":"send_message","user":"bob","message":"","files":[["data:..","x.png"]]}"#;
        match serde_json::from_str::<IncomingEvent>(raw).unwrap() {
            IncomingEvent::SendMessage { files: Some(files), .. } => assert_eq!(files[0].name, "x.png"),
            other => panic!("unexpected {:?}", other),
        }
        let clear: IncomingEvent = serde_json::from_str(r#"{"action":"clear_chat","chat":9,"type":"chat.message"}"#).unwrap();
        assert_eq!(clear, IncomingEvent::ClearChat {});
    }

    #[test]
    fn unknown_action_is_an_error() {
        assert!(serde_json::from_str::<IncomingEvent>(r#"{"action":"typing","user":"bob"}"#).is_err());
        assert!(serde_json::from_str::<IncomingEvent>(r#"{"user":"bob"}"#).is_err());
    }
}

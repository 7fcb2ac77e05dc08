//! Session state: transcript rendering, chat actions, attachments, and button models.

pub mod actions;
pub mod attachments;
pub mod chat;
pub mod transcript;

pub use attachments::{FileSource, LocalFiles};
pub use chat::{Applied, ChatSession, Composer};
pub use transcript::{Transcript, TranscriptEntry};

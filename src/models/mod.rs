//! Data models for chat frames, session context, attachments, and action statuses.

pub mod attachment;
pub mod event;
pub mod session;
pub mod status;

pub use attachment::*;
pub use event::*;
pub use session::*;
pub use status::*;

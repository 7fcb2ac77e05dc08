//! Client for the Copygram social app.
//!
//! Provides a WebSocket chat room client with an append-only rendered
//! transcript, and the CSRF-guarded HTTP calls behind likes, saves,
//! comment deletes and follows.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use handlers::http::ActionsClient;
pub use handlers::ws::{ChatClient, ChatEvent};
pub use models::session::{ChatKind, SessionContext};
pub use services::chat::{ChatSession, Composer};

//! I/O edges: the chat room WebSocket and the HTTP action endpoints.

pub mod http;
pub mod ws;

pub use http::*;
pub use ws::*;

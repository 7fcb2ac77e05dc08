//! Client error types shared by the chat socket and the HTTP actions.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Client-level errors.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Attachment {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Cross-origin request blocked: {0}")]
    CrossOrigin(String),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(String),

    #[error("Chat connection closed")]
    Closed,
}

impl ClientError {
    /// Transport failures: nothing the user did, nothing to retry here.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::WebSocket(_) | ClientError::Http(_) | ClientError::Closed
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(ClientError::Closed.is_transport());
        assert!(!ClientError::NotPermitted("clear".to_string()).is_transport());
        assert!(!ClientError::UnexpectedStatus("Nope".to_string()).is_transport());
    }

    #[test]
    fn attachment_error_names_the_file() {
        let err = ClientError::Attachment {
            path: "cat.png".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Attachment cat.png: missing");
    }
}

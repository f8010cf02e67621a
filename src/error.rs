use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Error fetching snippets: {status}")]
    FetchFailed { status: u16 },

    #[error("{}", create_failed_message(.status, .message))]
    CreateFailed { status: u16, message: Option<String> },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snippet in response: {0}")]
    InvalidSnippet(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

// A server-supplied message wins over the generic status text.
fn create_failed_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Error creating snippet: failed with status {}", status),
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

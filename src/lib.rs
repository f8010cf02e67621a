//! snippet-client - A terminal client for a remote code snippet library.
//!
//! Snippets are listed, filtered by language and created against the
//! service's HTTP API. All state lives in one [`AppState`] and changes only
//! through [`app::update`].

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod models;
pub mod ui;

// Re-export
pub use api::SnippetApi;
pub use app::{update, AppState, Command, Message, SnippetController};
pub use cli::{Commands, SnippetCli};
pub use commands::handle_command;
pub use config::{ClientConfig, DEFAULT_API_BASE, DEFAULT_LIMIT};
pub use error::{ClientError, Result};
pub use interactive::run_interactive;
pub use logging::init_logging;
pub use models::{DraftField, DraftForm, FilterCriteria, FilterForm, NewSnippet, Snippet};

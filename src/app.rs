//! Application state and the transitions that drive it.
//!
//! Every user or network event is a [`Message`]. [`update`] applies it to the
//! [`AppState`] and may hand back a [`Command`] describing the network call to
//! make next; running that command yields another message. Nothing else
//! mutates the state.

use crate::api::SnippetApi;
use crate::error::ClientError;
use crate::models::{DraftField, DraftForm, FilterCriteria, FilterForm, NewSnippet, Snippet};
use tracing::debug;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AppState {
    pub snippets: Vec<Snippet>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: FilterForm,
    pub draft: DraftForm,
}

#[derive(Debug)]
pub enum Message {
    FilterLanguageChanged(String),
    FilterLimitChanged(String),
    ApplyFilter,
    ResetFilter,
    LoadSnippets(FilterCriteria),
    SnippetsLoaded(Result<Vec<Snippet>, ClientError>),
    DraftFieldChanged(DraftField, String),
    SubmitDraft,
    SnippetCreated(Result<Snippet, ClientError>),
}

/// Network work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchSnippets(FilterCriteria),
    CreateSnippet(NewSnippet),
}

impl Command {
    /// Perform the call and turn its outcome into the completion message.
    /// Every outcome maps to a message, so the matching completion always arrives.
    pub async fn execute(self, api: &SnippetApi) -> Message {
        match self {
            Command::FetchSnippets(criteria) => {
                Message::SnippetsLoaded(api.list_snippets(&criteria).await)
            }
            Command::CreateSnippet(payload) => {
                Message::SnippetCreated(api.create_snippet(&payload).await)
            }
        }
    }
}

pub fn update(state: &mut AppState, message: Message) -> Option<Command> {
    match message {
        Message::FilterLanguageChanged(language) => {
            state.filter.language = language;
            None
        }
        Message::FilterLimitChanged(limit) => {
            state.filter.set_limit_input(&limit);
            None
        }
        Message::ApplyFilter => {
            let criteria = state.filter.criteria();
            update(state, Message::LoadSnippets(criteria))
        }
        Message::ResetFilter => {
            state.filter = FilterForm::default();
            update(state, Message::LoadSnippets(FilterCriteria::default()))
        }
        Message::LoadSnippets(criteria) => {
            state.loading = true;
            state.error = None;
            Some(Command::FetchSnippets(criteria))
        }
        Message::SnippetsLoaded(result) => {
            state.loading = false;
            match result {
                Ok(snippets) => state.snippets = snippets,
                Err(e) => state.error = Some(e.to_string()),
            }
            None
        }
        Message::DraftFieldChanged(field, value) => {
            state.draft.set(field, value);
            None
        }
        Message::SubmitDraft => {
            state.error = None;
            Some(Command::CreateSnippet(state.draft.to_new_snippet()))
        }
        Message::SnippetCreated(result) => {
            match result {
                Ok(created) => {
                    state.snippets.insert(0, created);
                    state.draft = DraftForm::default();
                }
                Err(e) => state.error = Some(e.to_string()),
            }
            None
        }
    }
}

/// Owns the state and runs each operation to completion.
///
/// Used by the headless commands and tests; the interactive view drives the
/// same [`update`] but runs commands as background tasks.
pub struct SnippetController {
    api: SnippetApi,
    state: AppState,
}

impl SnippetController {
    pub fn new(api: SnippetApi) -> Self {
        Self {
            api,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply a message, then await and apply any follow-up until the chain settles.
    pub async fn dispatch(&mut self, message: Message) {
        let mut next = Some(message);
        while let Some(message) = next.take() {
            debug!(?message, "dispatch");
            if let Some(command) = update(&mut self.state, message) {
                next = Some(command.execute(&self.api).await);
            }
        }
    }

    pub async fn load_snippets(&mut self, criteria: Option<FilterCriteria>) {
        self.dispatch(Message::LoadSnippets(criteria.unwrap_or_default()))
            .await
    }

    pub async fn apply_filter(&mut self) {
        self.dispatch(Message::ApplyFilter).await
    }

    pub async fn reset_filter(&mut self) {
        self.dispatch(Message::ResetFilter).await
    }

    pub async fn submit_new_snippet(&mut self) {
        self.dispatch(Message::SubmitDraft).await
    }

    pub fn update_draft_field(&mut self, field: DraftField, value: impl Into<String>) {
        update(
            &mut self.state,
            Message::DraftFieldChanged(field, value.into()),
        );
    }

    pub fn set_filter_language(&mut self, language: impl Into<String>) {
        update(
            &mut self.state,
            Message::FilterLanguageChanged(language.into()),
        );
    }

    pub fn set_filter_limit(&mut self, limit: impl Into<String>) {
        update(&mut self.state, Message::FilterLimitChanged(limit.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LIMIT;

    fn snippet(id: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            title: format!("title {}", id),
            language: "rust".to_string(),
            code: "fn main() {}".to_string(),
            description: None,
            tags: vec![],
            created_at: None,
        }
    }

    fn filled_draft() -> DraftForm {
        DraftForm {
            title: "Hello".to_string(),
            language: "rust".to_string(),
            code: "println!(\"hi\");".to_string(),
            description: String::new(),
            tags: "web, db, , utils".to_string(),
        }
    }

    #[test]
    fn apply_filter_omits_unset_fields() {
        let mut state = AppState::default();
        update(&mut state, Message::FilterLimitChanged(String::new()));
        let command = update(&mut state, Message::ApplyFilter);
        assert_eq!(
            command,
            Some(Command::FetchSnippets(FilterCriteria {
                language: None,
                limit: None,
            }))
        );

        update(&mut state, Message::FilterLanguageChanged("go".to_string()));
        update(&mut state, Message::FilterLimitChanged("3".to_string()));
        let command = update(&mut state, Message::ApplyFilter);
        assert_eq!(
            command,
            Some(Command::FetchSnippets(FilterCriteria {
                language: Some("go".to_string()),
                limit: Some(3),
            }))
        );
    }

    #[test]
    fn reset_filter_restores_defaults_and_fetches_unfiltered() {
        let mut state = AppState::default();
        update(&mut state, Message::FilterLanguageChanged("go".to_string()));
        update(&mut state, Message::FilterLimitChanged("50".to_string()));

        let command = update(&mut state, Message::ResetFilter);
        assert_eq!(state.filter.language, "");
        assert_eq!(state.filter.limit, Some(DEFAULT_LIMIT));
        assert_eq!(
            command,
            Some(Command::FetchSnippets(FilterCriteria::default()))
        );
        assert!(state.loading);
    }

    #[test]
    fn loading_spans_exactly_the_request() {
        let mut state = AppState::default();
        assert!(!state.loading);

        update(&mut state, Message::LoadSnippets(FilterCriteria::default()));
        assert!(state.loading);

        update(&mut state, Message::SnippetsLoaded(Ok(vec![snippet("a")])));
        assert!(!state.loading);
        assert_eq!(state.snippets.len(), 1);

        update(&mut state, Message::LoadSnippets(FilterCriteria::default()));
        assert!(state.loading);
        update(
            &mut state,
            Message::SnippetsLoaded(Err(ClientError::FetchFailed { status: 500 })),
        );
        assert!(!state.loading);
    }

    #[test]
    fn load_failure_keeps_existing_snippets() {
        let mut state = AppState {
            snippets: vec![snippet("a"), snippet("b")],
            ..AppState::default()
        };
        update(&mut state, Message::LoadSnippets(FilterCriteria::default()));
        update(
            &mut state,
            Message::SnippetsLoaded(Err(ClientError::FetchFailed { status: 404 })),
        );
        assert_eq!(state.snippets.len(), 2);
        assert_eq!(
            state.error.as_deref(),
            Some("Error fetching snippets: 404")
        );
    }

    #[test]
    fn load_clears_previous_error_and_replaces_list() {
        let mut state = AppState {
            snippets: vec![snippet("old")],
            error: Some("boom".to_string()),
            ..AppState::default()
        };
        update(&mut state, Message::LoadSnippets(FilterCriteria::default()));
        assert_eq!(state.error, None);
        update(
            &mut state,
            Message::SnippetsLoaded(Ok(vec![snippet("x"), snippet("y")])),
        );
        let ids: Vec<_> = state.snippets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn submit_builds_payload_from_draft() {
        let mut state = AppState {
            draft: filled_draft(),
            error: Some("stale".to_string()),
            ..AppState::default()
        };
        let command = update(&mut state, Message::SubmitDraft);
        assert_eq!(state.error, None);
        assert!(!state.loading);
        match command {
            Some(Command::CreateSnippet(payload)) => {
                assert_eq!(payload.tags, vec!["web", "db", "utils"]);
                assert_eq!(payload.description, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn created_snippet_is_prepended_and_draft_cleared() {
        let mut state = AppState {
            snippets: vec![snippet("a")],
            draft: filled_draft(),
            ..AppState::default()
        };
        update(&mut state, Message::SubmitDraft);
        update(&mut state, Message::SnippetCreated(Ok(snippet("new"))));
        assert_eq!(state.snippets[0].id, "new");
        assert_eq!(state.snippets.len(), 2);
        assert_eq!(state.draft, DraftForm::default());
    }

    #[test]
    fn create_failure_keeps_draft_and_list() {
        let mut state = AppState {
            snippets: vec![snippet("a")],
            draft: filled_draft(),
            ..AppState::default()
        };
        update(&mut state, Message::SubmitDraft);
        update(
            &mut state,
            Message::SnippetCreated(Err(ClientError::CreateFailed {
                status: 400,
                message: Some("duplicate title".to_string()),
            })),
        );
        assert_eq!(state.error.as_deref(), Some("duplicate title"));
        assert_eq!(state.draft, filled_draft());
        assert_eq!(state.snippets.len(), 1);
    }

    #[test]
    fn error_survives_unrelated_edits() {
        let mut state = AppState {
            error: Some("Error fetching snippets: 500".to_string()),
            ..AppState::default()
        };
        update(
            &mut state,
            Message::DraftFieldChanged(DraftField::Title, "x".to_string()),
        );
        update(&mut state, Message::FilterLanguageChanged("go".to_string()));
        assert_eq!(
            state.error.as_deref(),
            Some("Error fetching snippets: 500")
        );
        assert_eq!(state.draft.title, "x");
    }
}

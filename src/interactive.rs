use crate::api::SnippetApi;
use crate::app::{update, AppState, Message};
use crate::error::Result;
use crate::models::FilterCriteria;
use crate::ui::{self, Focus, ViewState};

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error};

const PAGE: u16 = 10;

/// What the event loop should do after a key press.
#[derive(Debug)]
pub enum KeyAction {
    Nothing,
    Dispatch(Message),
    Quit,
}

/// Run the full-screen snippet view until the user exits.
pub async fn run_interactive(api: SnippetApi) -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    install_panic_hook();

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    let result = run_app(&mut terminal, api).await;

    // Clean up terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

// Leave raw mode before the default hook prints, or the message is unreadable.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        error!("panic in interactive view: {}", panic_info);
        previous(panic_info);
    }));
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: SnippetApi,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut app = AppState::default();
    let mut view = ViewState::default();
    let mut events = EventStream::new();

    // Initial unfiltered load, like the first render of the page.
    dispatch(
        &mut app,
        Message::LoadSnippets(FilterCriteria::default()),
        &api,
        &tx,
    );

    loop {
        view.list_width = terminal.size()?.width.saturating_sub(2);
        terminal.draw(|f| ui::render(f, &app, &view))?;

        tokio::select! {
            Some(message) = rx.recv() => {
                dispatch(&mut app, message, &api, &tx);
                view.scroll = view.scroll.min(max_scroll(&app, &view));
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => match handle_key(key, &app, &mut view) {
                    KeyAction::Quit => break,
                    KeyAction::Dispatch(message) => dispatch(&mut app, message, &api, &tx),
                    KeyAction::Nothing => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

/// Apply a message; any network command runs in the background and reports back
/// through `tx` so input keeps flowing while it is pending.
fn dispatch(
    app: &mut AppState,
    message: Message,
    api: &SnippetApi,
    tx: &UnboundedSender<Message>,
) {
    debug!(?message, "dispatch");
    if let Some(command) = update(app, message) {
        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let message = command.execute(&api).await;
            // The receiver only closes when the view has exited.
            let _ = tx.send(message);
        });
    }
}

fn max_scroll(app: &AppState, view: &ViewState) -> u16 {
    let width = Some(usize::from(view.list_width)).filter(|w| *w > 0);
    let last = ui::list_line_count(&app.snippets, width).saturating_sub(1);
    u16::try_from(last).unwrap_or(u16::MAX)
}

/// Translate a key press into a view change and/or a message.
pub fn handle_key(key: KeyEvent, app: &AppState, view: &mut ViewState) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Nothing;
    }
    view.notice = None;

    // AltGr arrives as Ctrl+Alt on Windows; those keys are characters.
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('c') if ctrl => return KeyAction::Quit,
        KeyCode::Char('r') if ctrl => return KeyAction::Dispatch(Message::ResetFilter),
        KeyCode::Char('s') if ctrl => return submit(app, view),
        KeyCode::Char(_) if ctrl => return KeyAction::Nothing,
        KeyCode::Tab => {
            view.focus = view.focus.next();
            return KeyAction::Nothing;
        }
        KeyCode::BackTab => {
            view.focus = view.focus.prev();
            return KeyAction::Nothing;
        }
        _ => {}
    }

    match view.focus {
        Focus::FilterLanguage => match key.code {
            KeyCode::Enter => KeyAction::Dispatch(Message::ApplyFilter),
            code => edit(&app.filter.language, code)
                .map(|value| KeyAction::Dispatch(Message::FilterLanguageChanged(value)))
                .unwrap_or(KeyAction::Nothing),
        },
        Focus::FilterLimit => match key.code {
            KeyCode::Enter => KeyAction::Dispatch(Message::ApplyFilter),
            KeyCode::Char(c) if !c.is_ascii_digit() => KeyAction::Nothing,
            code => edit(&app.filter.limit_input(), code)
                .map(|value| KeyAction::Dispatch(Message::FilterLimitChanged(value)))
                .unwrap_or(KeyAction::Nothing),
        },
        Focus::Draft(field) => match key.code {
            KeyCode::Enter if field.is_multiline() => {
                let mut value = app.draft.get(field).to_string();
                value.push('\n');
                KeyAction::Dispatch(Message::DraftFieldChanged(field, value))
            }
            KeyCode::Enter => submit(app, view),
            code => edit(app.draft.get(field), code)
                .map(|value| KeyAction::Dispatch(Message::DraftFieldChanged(field, value)))
                .unwrap_or(KeyAction::Nothing),
        },
        Focus::Snippets => {
            let max = max_scroll(app, view);
            view.scroll = match key.code {
                KeyCode::Up => view.scroll.saturating_sub(1),
                KeyCode::Down => view.scroll.saturating_add(1).min(max),
                KeyCode::PageUp => view.scroll.saturating_sub(PAGE),
                KeyCode::PageDown => view.scroll.saturating_add(PAGE).min(max),
                KeyCode::Home => 0,
                KeyCode::End => max,
                _ => view.scroll,
            };
            KeyAction::Nothing
        }
    }
}

// Append or delete at the end of a field; None when the key does not edit.
fn edit(current: &str, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) => {
            let mut value = current.to_string();
            value.push(c);
            Some(value)
        }
        KeyCode::Backspace => {
            let mut value = current.to_string();
            value.pop()?;
            Some(value)
        }
        _ => None,
    }
}

// Required markers live here, in the form, not in the request builder.
fn submit(app: &AppState, view: &mut ViewState) -> KeyAction {
    let missing = app.draft.missing_required();
    if let Some(first) = missing.first() {
        let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
        view.notice = Some(format!("Please fill out {}", labels.join(", ")));
        view.focus = Focus::Draft(*first);
        return KeyAction::Nothing;
    }
    KeyAction::Dispatch(Message::SubmitDraft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DraftField, DraftForm, Snippet};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn focused(focus: Focus) -> ViewState {
        ViewState {
            focus,
            ..ViewState::default()
        }
    }

    #[test]
    fn typing_in_filter_language_appends() {
        let app = AppState::default();
        let mut view = ViewState::default();
        match handle_key(key(KeyCode::Char('g')), &app, &mut view) {
            KeyAction::Dispatch(Message::FilterLanguageChanged(value)) => assert_eq!(value, "g"),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn enter_in_filter_applies_it() {
        let app = AppState::default();
        let mut view = focused(Focus::FilterLimit);
        assert!(matches!(
            handle_key(key(KeyCode::Enter), &app, &mut view),
            KeyAction::Dispatch(Message::ApplyFilter)
        ));
    }

    #[test]
    fn limit_field_accepts_digits_only() {
        let app = AppState::default();
        let mut view = focused(Focus::FilterLimit);
        assert!(matches!(
            handle_key(key(KeyCode::Char('x')), &app, &mut view),
            KeyAction::Nothing
        ));
        match handle_key(key(KeyCode::Char('5')), &app, &mut view) {
            KeyAction::Dispatch(Message::FilterLimitChanged(value)) => assert_eq!(value, "105"),
            other => panic!("unexpected action: {:?}", other),
        }
        match handle_key(key(KeyCode::Backspace), &app, &mut view) {
            KeyAction::Dispatch(Message::FilterLimitChanged(value)) => assert_eq!(value, "1"),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn backspace_on_empty_field_does_nothing() {
        let app = AppState::default();
        let mut view = focused(Focus::Draft(DraftField::Title));
        assert!(matches!(
            handle_key(key(KeyCode::Backspace), &app, &mut view),
            KeyAction::Nothing
        ));
    }

    #[test]
    fn enter_in_code_inserts_newline() {
        let app = AppState {
            draft: DraftForm {
                code: "a".to_string(),
                ..DraftForm::default()
            },
            ..AppState::default()
        };
        let mut view = focused(Focus::Draft(DraftField::Code));
        match handle_key(key(KeyCode::Enter), &app, &mut view) {
            KeyAction::Dispatch(Message::DraftFieldChanged(DraftField::Code, value)) => {
                assert_eq!(value, "a\n")
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn submit_with_missing_required_fields_shows_notice() {
        let app = AppState {
            draft: DraftForm {
                title: "t".to_string(),
                ..DraftForm::default()
            },
            ..AppState::default()
        };
        let mut view = focused(Focus::Draft(DraftField::Tags));
        assert!(matches!(
            handle_key(ctrl('s'), &app, &mut view),
            KeyAction::Nothing
        ));
        assert_eq!(
            view.notice.as_deref(),
            Some("Please fill out Language, Code")
        );
        assert_eq!(view.focus, Focus::Draft(DraftField::Language));
        // The notice goes away on the next key press.
        handle_key(key(KeyCode::Tab), &app, &mut view);
        assert_eq!(view.notice, None);
    }

    #[test]
    fn submit_with_required_fields_dispatches() {
        let app = AppState {
            draft: DraftForm {
                title: "t".to_string(),
                language: "rust".to_string(),
                code: "x".to_string(),
                ..DraftForm::default()
            },
            ..AppState::default()
        };
        let mut view = focused(Focus::Draft(DraftField::Title));
        assert!(matches!(
            handle_key(key(KeyCode::Enter), &app, &mut view),
            KeyAction::Dispatch(Message::SubmitDraft)
        ));
    }

    #[test]
    fn global_shortcuts() {
        let app = AppState::default();
        let mut view = ViewState::default();
        assert!(matches!(
            handle_key(ctrl('r'), &app, &mut view),
            KeyAction::Dispatch(Message::ResetFilter)
        ));
        assert!(matches!(
            handle_key(key(KeyCode::Esc), &app, &mut view),
            KeyAction::Quit
        ));
        assert!(matches!(
            handle_key(ctrl('c'), &app, &mut view),
            KeyAction::Quit
        ));
    }

    #[test]
    fn altgr_characters_are_typed() {
        let app = AppState::default();
        let mut view = focused(Focus::Draft(DraftField::Code));
        let altgr = KeyEvent::new(
            KeyCode::Char('{'),
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        );
        match handle_key(altgr, &app, &mut view) {
            KeyAction::Dispatch(Message::DraftFieldChanged(DraftField::Code, value)) => {
                assert_eq!(value, "{")
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn list_scroll_saturates_on_huge_lists() {
        let snippet = Snippet {
            id: "1".to_string(),
            title: "t".to_string(),
            language: "text".to_string(),
            code: "x\n".repeat(70_000),
            description: None,
            tags: vec![],
            created_at: None,
        };
        let app = AppState {
            snippets: vec![snippet],
            ..AppState::default()
        };
        let mut view = focused(Focus::Snippets);
        handle_key(key(KeyCode::End), &app, &mut view);
        assert_eq!(view.scroll, u16::MAX);
        handle_key(key(KeyCode::Down), &app, &mut view);
        assert_eq!(view.scroll, u16::MAX);
    }

    #[test]
    fn list_scroll_is_clamped() {
        let app = AppState::default();
        let mut view = focused(Focus::Snippets);
        handle_key(key(KeyCode::PageDown), &app, &mut view);
        assert_eq!(view.scroll, 0);
        handle_key(key(KeyCode::Up), &app, &mut view);
        assert_eq!(view.scroll, 0);
    }
}

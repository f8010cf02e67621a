use crate::app::AppState;
use crate::models::{DraftField, Snippet};

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const EMPTY_MESSAGE: &str = "No snippets found. Try creating one!";
pub const LOADING_MESSAGE: &str = "Loading…";

const TAB_WIDTH: usize = 4;
const MAX_ERROR_ROWS: usize = 6;

pub fn chip_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Gray)
        .add_modifier(Modifier::BOLD)
}

/// Which input currently receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    FilterLanguage,
    FilterLimit,
    Draft(DraftField),
    Snippets,
}

impl Focus {
    const ORDER: [Focus; 8] = [
        Focus::FilterLanguage,
        Focus::FilterLimit,
        Focus::Draft(DraftField::Title),
        Focus::Draft(DraftField::Language),
        Focus::Draft(DraftField::Code),
        Focus::Draft(DraftField::Description),
        Focus::Draft(DraftField::Tags),
        Focus::Snippets,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Focus {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Focus {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Presentation-only state: never sent anywhere, never touched by `update`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub focus: Focus,
    pub scroll: u16,
    pub notice: Option<String>,
    /// Inner width of the snippet list at the last draw; 0 before the first one.
    pub list_width: u16,
}

/// Draw the whole screen
pub fn render(f: &mut Frame, app: &AppState, view: &ViewState) {
    let size = f.area();
    let error_height = app
        .error
        .as_deref()
        .map_or(0, |error| error_banner_height(error, size.width));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Header
            Constraint::Length(error_height), // Error banner
            Constraint::Length(3),            // Filter form
            Constraint::Length(3),            // Title + language
            Constraint::Length(6),            // Code
            Constraint::Length(4),            // Description
            Constraint::Length(3),            // Tags
            Constraint::Min(5),               // Snippet list
            Constraint::Length(1),            // Help text
        ])
        .split(size);

    render_header(f, chunks[0]);
    if let Some(error) = &app.error {
        render_error(f, chunks[1], error);
    }

    let filter_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[2]);
    render_field(
        f,
        filter_row[0],
        " Search: Language (e.g., javascript) ",
        &app.filter.language,
        view.focus == Focus::FilterLanguage,
    );
    render_field(
        f,
        filter_row[1],
        " Limit ",
        &app.filter.limit_input(),
        view.focus == Focus::FilterLimit,
    );

    let title_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    let draft_areas = [
        (DraftField::Title, title_row[0]),
        (DraftField::Language, title_row[1]),
        (DraftField::Code, chunks[4]),
        (DraftField::Description, chunks[5]),
        (DraftField::Tags, chunks[6]),
    ];
    for (field, area) in draft_areas {
        render_field(
            f,
            area,
            &draft_label(field),
            app.draft.get(field),
            view.focus == Focus::Draft(field),
        );
    }

    render_snippets(f, chunks[7], app, view);
    render_help(f, chunks[8], view);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Snippet Library",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Store and search your code snippets.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(header, area);
}

/// Rows needed to show the wrapped error inside its border, up to a cap.
pub fn error_banner_height(error: &str, width: u16) -> u16 {
    let rows = wrap_text(error, usize::from(width.saturating_sub(2)))
        .len()
        .clamp(1, MAX_ERROR_ROWS);
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
}

fn render_error(f: &mut Frame, area: Rect, error: &str) {
    let style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = wrap_text(error, usize::from(area.width.saturating_sub(2)))
        .into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect();
    let banner = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Error ")
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(banner, area);
}

fn draft_label(field: DraftField) -> String {
    match field {
        DraftField::Description => " Description (optional) ".to_string(),
        DraftField::Tags => " Tags (comma-separated) ".to_string(),
        field if field.is_required() => format!(" {} * ", field.label()),
        field => format!(" {} ", field.label()),
    }
}

fn render_field(f: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let lines: Vec<Line> = value
        .split('\n')
        .map(|line| Line::from(expand_tabs(line)))
        .collect();
    let (scroll, cursor) = tail_view(area, &lines);

    let paragraph = Paragraph::new(lines).scroll((scroll, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(border_style),
    );
    f.render_widget(paragraph, area);

    if focused {
        f.set_cursor_position(cursor);
    }
}

// Keep the end of the text in view while typing, with the cursor after it.
fn tail_view(area: Rect, lines: &[Line]) -> (u16, Position) {
    let inner_height = usize::from(area.height.saturating_sub(2)).max(1);
    let last_row = lines.len().saturating_sub(1);
    let scroll = last_row.saturating_sub(inner_height - 1);

    let row = u16::try_from(last_row - scroll).unwrap_or(u16::MAX);
    let col = u16::try_from(lines.last().map_or(0, Line::width)).unwrap_or(u16::MAX);
    let cursor = Position::new(
        area.x
            .saturating_add(1)
            .saturating_add(col)
            .min(area.right().saturating_sub(2)),
        area.y.saturating_add(1).saturating_add(row),
    );
    (u16::try_from(scroll).unwrap_or(u16::MAX), cursor)
}

fn render_snippets(f: &mut Frame, area: Rect, app: &AppState, view: &ViewState) {
    let mut title = vec![Span::raw(" Snippets ")];
    if app.loading {
        title.push(Span::styled(
            format!("{} ", LOADING_MESSAGE),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let border_style = if view.focus == Focus::Snippets {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title))
        .border_style(border_style);

    if app.snippets.is_empty() {
        let body = if app.loading { "" } else { EMPTY_MESSAGE };
        let empty = Paragraph::new(Span::styled(body, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = usize::from(area.width.saturating_sub(2));
    let lines: Vec<Line> = app
        .snippets
        .iter()
        .flat_map(|snippet| snippet_card(snippet, Some(width)))
        .collect();
    let list = Paragraph::new(lines).scroll((view.scroll, 0)).block(block);
    f.render_widget(list, area);
}

fn render_help(f: &mut Frame, area: Rect, view: &ViewState) {
    let help = match &view.notice {
        Some(notice) => Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(": Next field  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(": Apply/Save  "),
            Span::styled("Ctrl+S", Style::default().fg(Color::Yellow)),
            Span::raw(": Save snippet  "),
            Span::styled("Ctrl+R", Style::default().fg(Color::Yellow)),
            Span::raw(": Reset filters  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(": Exit"),
        ]),
    };
    f.render_widget(Paragraph::new(help), area);
}

/// The lines making up one snippet in the list, ending with a blank separator.
///
/// With `wrap_width`, the description is wrapped to that many columns. Code is
/// never wrapped.
pub fn snippet_card(snippet: &Snippet, wrap_width: Option<usize>) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            snippet.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            snippet.language.clone(),
            Style::default().fg(Color::Cyan),
        )),
    ];

    if let Some(description) = snippet.description() {
        let rows = match wrap_width {
            Some(width) => wrap_text(description, width),
            None => description.split('\n').map(str::to_string).collect(),
        };
        lines.extend(rows.into_iter().map(Line::from));
    }

    let code_style = Style::default().fg(Color::Green);
    for code_line in snippet.code.split('\n') {
        lines.push(Line::from(vec![
            Span::styled("│ ", Style::default().fg(Color::DarkGray)),
            Span::styled(expand_tabs(code_line), code_style),
        ]));
    }

    if !snippet.tags.is_empty() {
        lines.push(tag_chips(&snippet.tags));
    }

    lines.push(Line::from(Span::styled(
        format!("Created: {}", snippet.formatted_created_at()),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines
}

/// One chip per tag, in order, separated by a space.
pub fn tag_chips(tags: &[String]) -> Line<'static> {
    let mut spans = Vec::with_capacity(tags.len() * 2);
    for (idx, tag) in tags.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!(" {} ", tag), chip_style()));
    }
    Line::from(spans)
}

/// Total rendered height of the snippet list.
pub fn list_line_count(snippets: &[Snippet], wrap_width: Option<usize>) -> usize {
    snippets
        .iter()
        .map(|s| snippet_card(s, wrap_width).len())
        .sum()
}

/// Greedy word wrap by character count. Line breaks in `text` are kept and
/// words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for source in text.split('\n') {
        let mut row = String::new();
        let mut len = 0;
        for word in source.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            if len > 0 && len + 1 + chars.len() > width {
                rows.push(std::mem::take(&mut row));
                len = 0;
            }
            if len > 0 {
                row.push(' ');
                len += 1;
            }
            while len + chars.len() > width {
                let rest = chars.split_off(width - len);
                row.extend(chars);
                rows.push(std::mem::take(&mut row));
                len = 0;
                chars = rest;
            }
            len += chars.len();
            row.extend(chars);
        }
        rows.push(row);
    }
    rows
}

// Terminal cells have no tab stops.
fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

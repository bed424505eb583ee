//! Open-record screen: asks for the id of the record to update.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::EntityKind;
use crate::tui::action::Action;
use crate::tui::app::Screen;

/// State for the open-record prompt.
#[derive(Debug, Clone)]
pub struct OpenRecordState {
    kind: EntityKind,
    input: String,
    loading: bool,
    error: Option<String>,
}

impl OpenRecordState {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            input: String::new(),
            loading: false,
            error: None,
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::Navigate(Screen::Home),
            _ if self.loading => Action::None,
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(ch);
                Action::None
            }
            KeyCode::Backspace => {
                self.input.pop();
                Action::None
            }
            KeyCode::Enter => self.submit(),
            _ => Action::None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Shows a fetch failure and accepts input again.
    pub fn fail(&mut self, msg: String) {
        self.loading = false;
        self.error = Some(msg);
    }

    fn submit(&mut self) -> Action {
        let id = self.input.trim();
        if id.is_empty() {
            self.error = Some("Record id is required.".to_string());
            return Action::None;
        }
        self.error = None;
        self.loading = true;
        Action::FetchRecord(self.kind, id.to_string())
    }
}

/// Renders the open-record prompt.
#[mutants::skip]
pub fn draw_open_record(state: &OpenRecordState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" Update {} ", state.kind().label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [input_area, message_area, _spacer, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(state.input()),
        Span::styled(
            "\u{2588}",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ),
    ]))
    .block(
        Block::default()
            .title("Record id *")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(input, input_area);

    let message = if state.loading() {
        Some(Span::styled("Loading…", Style::default().fg(Color::Yellow)))
    } else {
        state
            .error()
            .map(|e| Span::styled(e, Style::default().fg(Color::Red)))
    };
    if let Some(message) = message {
        frame.render_widget(Paragraph::new(Line::from(message)), message_area);
    }

    let footer = Paragraph::new("Enter: open  Esc: back  F1: help")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

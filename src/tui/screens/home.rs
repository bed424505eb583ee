//! Home screen: choose what to create or update.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::model::EntityKind;
use crate::tui::action::Action;

/// One line of the home menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub kind: EntityKind,
    /// `true` to update an existing record, `false` to create one.
    pub update: bool,
}

impl MenuEntry {
    pub fn label(self) -> String {
        let verb = if self.update { "Update" } else { "Create" };
        format!("{verb} {}", self.kind.label())
    }
}

/// Creates first, then updates, each in entity order.
fn menu() -> Vec<MenuEntry> {
    [false, true]
        .into_iter()
        .flat_map(|update| {
            EntityKind::all()
                .iter()
                .map(move |&kind| MenuEntry { kind, update })
        })
        .collect()
}

/// State for the home screen.
#[derive(Debug, Clone)]
pub struct HomeState {
    entries: Vec<MenuEntry>,
    selected: usize,
    notice: Option<String>,
}

impl Default for HomeState {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeState {
    pub fn new() -> Self {
        Self {
            entries: menu(),
            selected: 0,
            notice: None,
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
                Action::None
            }
            KeyCode::Enter => {
                self.notice = None;
                let entry = self.entries[self.selected];
                if entry.update {
                    Action::PromptRecord(entry.kind)
                } else {
                    Action::OpenCreate(entry.kind)
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// A one-line message shown under the menu.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, msg: String) {
        self.notice = Some(msg);
    }
}

/// Renders the home screen.
#[mutants::skip]
pub fn draw_home(state: &HomeState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" sportdesk ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [list_area, notice_area, footer_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let items: Vec<ListItem> = state
        .entries()
        .iter()
        .map(|e| ListItem::new(e.label()))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.selected()));
    frame.render_stateful_widget(list, list_area, &mut list_state);

    if let Some(notice) = state.notice() {
        let line = Paragraph::new(Line::from(Span::styled(
            notice,
            Style::default().fg(Color::Green),
        )));
        frame.render_widget(line, notice_area);
    }

    let footer = Paragraph::new("↑/↓: select  Enter: open  F1: help  q/Esc: quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

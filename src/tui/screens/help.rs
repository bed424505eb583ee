//! Help screen: the key reference for the screen it was opened from.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};

use crate::tui::action::Action;
use crate::tui::app::Screen;

/// Rows moved by PageUp / PageDown.
const PAGE: usize = 10;

/// One key binding and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub keys: &'static str,
    pub does: &'static str,
}

const fn hint(keys: &'static str, does: &'static str) -> KeyHint {
    KeyHint { keys, does }
}

/// A titled group of bindings.
pub type Section = (&'static str, &'static [KeyHint]);

static ANYWHERE: Section = ("Anywhere", &[hint("F1", "this help")]);

static HOME: &[Section] = &[(
    "Menu",
    &[
        hint("↑/↓", "choose an entry"),
        hint("Enter", "open a create form, or ask for a record id"),
        hint("q / Esc", "quit"),
    ],
)];

static OPEN_RECORD: &[Section] = &[(
    "Record id",
    &[
        hint("Enter", "fetch the record and open its update form"),
        hint("Backspace", "delete a character"),
        hint("Esc", "back to the menu"),
    ],
)];

static EDITOR: &[Section] = &[
    (
        "Moving around",
        &[
            hint("Tab / Shift-Tab", "next / previous input; checks the one left"),
            hint("Esc", "close the form"),
        ],
    ),
    (
        "Editing",
        &[
            hint("←/→ or Space", "cycle a category"),
            hint("Space", "toggle a yes/no field"),
            hint("Ctrl+G", "take the slug from the title again"),
            hint("Enter (body)", "new paragraph"),
        ],
    ),
    (
        "Saving",
        &[
            hint("Enter / Ctrl+S", "validate and save"),
            hint("Ctrl+U", "upload the file named in the image path"),
            hint("Enter / Esc", "dismiss the saved / failed message"),
        ],
    ),
];

static HELP: &[Section] = &[(
    "Help",
    &[
        hint("↑/↓", "scroll a line"),
        hint("PgUp / PgDn", "scroll a page"),
        hint("Home", "back to the top"),
        hint("q / Esc", "return"),
    ],
)];

/// The sections shown for `origin`, most specific first.
pub fn sections(origin: Screen) -> Vec<Section> {
    let own = match origin {
        Screen::Home => HOME,
        Screen::OpenRecord => OPEN_RECORD,
        Screen::Editor => EDITOR,
        Screen::Help => return HELP.to_vec(),
    };
    own.iter().copied().chain([ANYWHERE]).collect()
}

fn rows(origin: Screen) -> Vec<Row<'static>> {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut rows = Vec::new();
    for (title, hints) in sections(origin) {
        if !rows.is_empty() {
            rows.push(Row::new([""]));
        }
        rows.push(Row::new([title]).style(heading));
        rows.extend(hints.iter().map(|h| {
            Row::new([h.keys, h.does]).style(Style::default().fg(Color::Gray))
        }));
    }
    rows
}

/// State for the help screen.
#[derive(Debug, Clone)]
pub struct HelpState {
    offset: usize,
    origin: Screen,
}

impl Default for HelpState {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            origin: Screen::Home,
        }
    }

    /// First visible row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The screen help returns to.
    pub fn origin(&self) -> Screen {
        self.origin
    }

    pub fn set_origin(&mut self, screen: Screen) {
        self.origin = screen;
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let last = rows(self.origin).len().saturating_sub(1);
        self.offset = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Navigate(self.origin),
            KeyCode::Up => self.offset.saturating_sub(1),
            KeyCode::Down => self.offset + 1,
            KeyCode::PageUp => self.offset.saturating_sub(PAGE),
            KeyCode::PageDown => self.offset + PAGE,
            KeyCode::Home => 0,
            _ => return Action::None,
        }
        .min(last);
        Action::None
    }
}

/// Renders the help screen.
#[mutants::skip]
pub fn draw_help(state: &HelpState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" Help: {} ", state.origin().label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let table = Table::new(
        rows(state.origin()),
        [Constraint::Length(18), Constraint::Min(0)],
    )
    .column_spacing(2);
    let mut table_state = TableState::default().with_offset(state.offset());
    frame.render_stateful_widget(table, table_area, &mut table_state);

    let footer = Paragraph::new("↑/↓ PgUp/PgDn: scroll  q/Esc: back")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

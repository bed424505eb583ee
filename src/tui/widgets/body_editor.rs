//! Multi-line body editor backed by `tui-textarea`.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

use crate::session::{RichTextBinding, html_to_lines, lines_to_html};

/// The editor holding a form's rich-text body.
#[derive(Debug, Clone)]
pub struct BodyEditor {
    textarea: TextArea<'static>,
}

impl Default for BodyEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyEditor {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
        }
    }

    /// Loads stored HTML into the editor.
    pub fn from_html(html: &str) -> Self {
        let lines = html_to_lines(html);
        if lines.is_empty() {
            return Self::new();
        }
        Self {
            textarea: TextArea::new(lines),
        }
    }

    /// Passes a key to the text area.
    pub fn input(&mut self, key: KeyEvent) {
        let _ = self.textarea.input(key);
    }

    pub fn lines(&self) -> &[String] {
        self.textarea.lines()
    }
}

impl RichTextBinding for BodyEditor {
    fn html(&self) -> Option<String> {
        Some(lines_to_html(self.textarea.lines()))
    }

    fn clear(&mut self) {
        self.textarea = TextArea::default();
    }
}

/// Renders the body editor with its label and inline error.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_body_editor(
    editor: &mut BodyEditor,
    label: &str,
    error: Option<String>,
    focused: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let border_color = if error.is_some() {
        Color::Red
    } else if focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let title = match error {
        Some(err) => format!("{label} * ({err})"),
        None => format!("{label} *"),
    };
    editor.textarea.set_block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    let cursor = if focused {
        Style::default().bg(Color::Yellow)
    } else {
        Style::default()
    };
    editor.textarea.set_cursor_style(cursor);
    frame.render_widget(&editor.textarea, area);
}

//! Editor form widget: focus over a schema's inputs and field rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{EntityKind, FieldKind, FieldSpec};
use crate::session::FormSession;

/// One focusable input of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A visible schema field.
    Field(&'static FieldSpec),
    /// The rich-text body editor.
    Body,
    /// The path of the image to upload.
    ImagePath,
}

/// The editor's inputs in display order, with focus management.
#[derive(Debug, Clone)]
pub struct Form {
    slots: Vec<Slot>,
    focus: usize,
}

impl Form {
    /// Visible fields of `kind`, then the body, then the image path.
    pub fn for_kind(kind: EntityKind) -> Self {
        let mut slots: Vec<Slot> = kind
            .fields()
            .iter()
            .filter(|spec| !spec.hidden)
            .map(Slot::Field)
            .collect();
        slots.push(Slot::Body);
        slots.push(Slot::ImagePath);
        Self { slots, focus: 0 }
    }

    /// Returns the index of the currently focused slot.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Returns the currently focused slot.
    pub fn focused(&self) -> Slot {
        self.slots[self.focus]
    }

    /// Moves focus to the next slot, wrapping around.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.slots.len();
    }

    /// Moves focus to the previous slot, wrapping around.
    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.slots.len() - 1) % self.slots.len();
    }

    /// Moves focus to the slot for `name`, if it is visible.
    pub fn focus_field(&mut self, name: &str) {
        if let Some(i) = self
            .slots
            .iter()
            .position(|s| matches!(s, Slot::Field(spec) if spec.name == name))
        {
            self.focus = i;
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The schema fields, in order.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.slots.iter().filter_map(|s| match s {
            Slot::Field(spec) => Some(*spec),
            _ => None,
        })
    }
}

/// Text shown for a field's current value.
pub fn display_value(spec: &FieldSpec, session: &FormSession) -> String {
    let values = session.values();
    match spec.kind {
        FieldKind::Text => values.text(spec.name).to_string(),
        FieldKind::Flag => {
            if values.flag(spec.name) {
                "[x]".to_string()
            } else {
                "[ ]".to_string()
            }
        }
        FieldKind::Choice(choices) => {
            let value = values.text(spec.name);
            choices
                .iter()
                .find(|c| c.value == value)
                .map_or_else(|| "< none >".to_string(), |c| format!("< {} >", c.label))
        }
    }
}

/// First field row to draw so that the focused row stays visible.
fn window_start(focus: usize, total: usize, visible: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    focus
        .saturating_sub(visible - 1)
        .min(total - visible)
}

/// Renders the schema fields, scrolled to keep the focused field in view.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, session: &FormSession, frame: &mut Frame, area: Rect) {
    let row_height = 3_u16;
    let fields: Vec<&FieldSpec> = form.fields().collect();
    let visible = usize::from(area.height / row_height);
    let focused_field = match form.focused() {
        Slot::Field(_) => Some(form.focus()),
        _ => None,
    };
    let start = window_start(focused_field.unwrap_or(0), fields.len(), visible);

    let shown: Vec<(usize, &FieldSpec)> = fields
        .iter()
        .copied()
        .enumerate()
        .skip(start)
        .take(visible)
        .collect();
    let constraints: Vec<Constraint> = shown
        .iter()
        .map(|_| Constraint::Length(row_height))
        .collect();
    let rows = Layout::vertical(constraints).split(area);

    for ((i, spec), row) in shown.into_iter().zip(rows.iter()) {
        let is_focused = focused_field == Some(i);
        let error = session.error(spec.name);

        let border_color = if error.is_some() {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let label = if spec.is_required() {
            format!("{} *", spec.label)
        } else {
            spec.label.to_string()
        };

        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = vec![Span::raw(display_value(spec, session))];
        if is_focused && spec.kind == FieldKind::Text {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), *row);

        if let Some(err) = error {
            let error_line = Paragraph::new(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red),
            ));
            let err_area = Rect {
                x: row.x + 2,
                y: row.y + row_height.saturating_sub(1),
                width: row.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(error_line, err_area);
        }
    }
}

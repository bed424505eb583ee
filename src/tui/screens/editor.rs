//! Editor screen: the create/update form for one record.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::model::{FieldKind, FieldSpec, Record};
use crate::session::{FormSession, SubmitState};
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::widgets::{
    BodyEditor, Form, Slot, StatusBarContext, draw_body_editor, draw_form, draw_status_bar,
    mode_word,
};

/// State for the editor screen.
#[derive(Debug, Clone)]
pub struct EditorState {
    session: FormSession,
    body: BodyEditor,
    form: Form,
    /// Tags background completions for this editor.
    serial: u64,
    notice: Option<String>,
}

impl EditorState {
    /// An editor for a blank create form.
    pub fn create(session: FormSession, serial: u64) -> Self {
        let form = Form::for_kind(session.kind());
        Self {
            session,
            body: BodyEditor::new(),
            form,
            serial,
            notice: None,
        }
    }

    /// An editor for a fetched record.
    pub fn update(session: FormSession, record: &Record, serial: u64) -> Self {
        let form = Form::for_kind(session.kind());
        Self {
            session,
            body: BodyEditor::from_html(record.html()),
            form,
            serial,
            notice: None,
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.session.state().is_terminal() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.session.dismiss();
            }
            return Action::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Navigate(Screen::Home),
            KeyCode::Tab => {
                self.blur();
                self.form.focus_next();
                return Action::None;
            }
            KeyCode::BackTab => {
                self.blur();
                self.form.focus_prev();
                return Action::None;
            }
            KeyCode::Char('s') if ctrl => return self.submit(),
            KeyCode::Char('u') if ctrl => return Action::Upload,
            KeyCode::Char('g') if ctrl => {
                self.session.follow_title();
                return Action::None;
            }
            _ => {}
        }

        match self.form.focused() {
            Slot::Field(spec) => self.edit_field(spec, key),
            Slot::Body => {
                self.body.input(key);
                Action::None
            }
            Slot::ImagePath => {
                match key.code {
                    KeyCode::Enter => return self.submit(),
                    KeyCode::Char(ch) if !ctrl => {
                        let mut path = self.session.file_input().to_string();
                        path.push(ch);
                        self.session.set_file_input(path);
                    }
                    KeyCode::Backspace => {
                        let mut path = self.session.file_input().to_string();
                        path.pop();
                        self.session.set_file_input(path);
                    }
                    _ => {}
                }
                Action::None
            }
        }
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FormSession {
        &mut self.session
    }

    pub fn body(&self) -> &BodyEditor {
        &self.body
    }

    /// The session and its body editor, borrowed together.
    pub fn parts_mut(&mut self) -> (&mut FormSession, &mut BodyEditor) {
        (&mut self.session, &mut self.body)
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// A one-line message for refused actions.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, msg: String) {
        self.notice = Some(msg);
    }

    /// Moves focus to the first field with an error.
    pub fn focus_first_error(&mut self) {
        let first = self
            .form
            .fields()
            .find(|spec| self.session.error(spec.name).is_some())
            .map(|spec| spec.name);
        if let Some(name) = first {
            self.form.focus_field(name);
        }
    }

    fn submit(&mut self) -> Action {
        self.notice = None;
        Action::Submit
    }

    fn blur(&mut self) {
        match self.form.focused() {
            Slot::Field(spec) => self.session.blur(spec.name),
            Slot::Body => self.session.blur_body(&self.body),
            Slot::ImagePath => {}
        }
    }

    fn edit_field(&mut self, spec: &'static FieldSpec, key: KeyEvent) -> Action {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match (spec.kind, key.code) {
            (_, KeyCode::Enter) => return self.submit(),
            (FieldKind::Text, KeyCode::Char(ch)) if plain => {
                let mut value = self.session.values().text(spec.name).to_string();
                value.push(ch);
                self.session.set(spec.name, value);
            }
            (FieldKind::Text, KeyCode::Backspace) => {
                let mut value = self.session.values().text(spec.name).to_string();
                value.pop();
                self.session.set(spec.name, value);
            }
            (FieldKind::Choice(choices), KeyCode::Right | KeyCode::Char(' ')) => {
                let next = cycle(choices.len(), self.choice_index(spec, choices), true);
                self.session.set(spec.name, choices[next].value);
            }
            (FieldKind::Choice(choices), KeyCode::Left) => {
                let prev = cycle(choices.len(), self.choice_index(spec, choices), false);
                self.session.set(spec.name, choices[prev].value);
            }
            (FieldKind::Flag, KeyCode::Char(' ')) => {
                let flag = self.session.values().flag(spec.name);
                self.session.set(spec.name, !flag);
            }
            _ => {}
        }
        Action::None
    }

    fn choice_index(&self, spec: &FieldSpec, choices: &[crate::model::Choice]) -> Option<usize> {
        let value = self.session.values().text(spec.name);
        choices.iter().position(|c| c.value == value)
    }
}

/// Steps through `len` choices; from "none" forward lands on the first, back on the last.
fn cycle(len: usize, current: Option<usize>, forward: bool) -> usize {
    match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    }
}

/// Renders the editor screen.
#[mutants::skip]
pub fn draw_editor(state: &mut EditorState, frame: &mut Frame, area: Rect) {
    let session = &state.session;
    let title = format!(
        " {} {} ",
        mode_word(session.mode()),
        session.kind().label()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [fields_area, body_area, image_area, notice_area, status_area, footer_area] =
        Layout::vertical([
            Constraint::Min(6),
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

    draw_form(&state.form, &state.session, frame, fields_area);

    let focused = state.form.focused();
    let (body_name, body_label) = state.session.kind().body_field();
    let body_error = state.session.error(body_name).map(|e| e.to_string());
    draw_body_editor(
        &mut state.body,
        body_label,
        body_error,
        focused == Slot::Body,
        frame,
        body_area,
    );

    let image_focused = focused == Slot::ImagePath;
    let mut spans = vec![Span::raw(state.session.file_input().to_string())];
    if image_focused {
        spans.push(Span::styled(
            "\u{2588}",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    let image_input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("Image file (Ctrl+U: upload)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if image_focused {
                Color::Yellow
            } else {
                Color::DarkGray
            })),
    );
    frame.render_widget(image_input, image_area);

    if let Some(notice) = state.notice() {
        let line = Paragraph::new(Span::styled(notice, Style::default().fg(Color::Red)));
        frame.render_widget(line, notice_area);
    }

    draw_status_bar(
        &StatusBarContext::from_session(&state.session),
        frame,
        status_area,
    );

    let footer = Paragraph::new(
        "Tab/Shift+Tab: next/prev  Enter/Ctrl+S: save  Ctrl+U: upload  Esc: back  F1: help",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    draw_result_overlay(state.session.state(), frame, area);
}

/// Renders the success/failure confirmation over the form.
#[mutants::skip]
fn draw_result_overlay(state: &SubmitState, frame: &mut Frame, area: Rect) {
    let (title, color, message) = match state {
        SubmitState::Succeeded => (" Saved ", Color::Green, "The record was saved.".to_string()),
        SubmitState::Failed(err) => (" Save failed ", Color::Red, err.clone()),
        SubmitState::Idle | SubmitState::Submitting => return,
    };

    let [popup] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(7)])
        .flex(Flex::Center)
        .areas(popup);

    let lines = vec![
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc: dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

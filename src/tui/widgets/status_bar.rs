//! Status bar widget: one-line editor context display.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::FormMode;
use crate::session::{FormSession, SubmitState};

/// Data passed to the status bar widget; decoupled from `FormSession`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarContext {
    /// Entity label, e.g. "Sport Club".
    pub kind: String,
    /// Record id for update forms.
    pub record_id: Option<String>,
    pub uploading: bool,
    pub preview: Option<String>,
    /// Submission state label.
    pub state: String,
    pub failed: bool,
}

impl StatusBarContext {
    pub fn from_session(session: &FormSession) -> Self {
        Self {
            kind: session.kind().label().to_string(),
            record_id: session.mode().record_id().map(str::to_string),
            uploading: session.uploading(),
            preview: session.preview().map(str::to_string),
            state: session.state().label().to_string(),
            failed: matches!(session.state(), SubmitState::Failed(_)),
        }
    }
}

/// Renders a one-line status bar showing the editor context.
///
/// Display format (left-aligned, Cyan):
/// - Create: `[Event] new  ready`
/// - Update: `[News] #42  uploading…  preview: https://cdn/x.png  saved`
///
/// Renders nothing if `ctx.kind` is empty (no open editor).
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    if ctx.kind.is_empty() {
        return;
    }

    let cyan = Style::default().fg(Color::Cyan);
    let yellow = Style::default().fg(Color::Yellow);
    let state_style = if ctx.failed {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let mode = match &ctx.record_id {
        Some(id) => format!("#{id}"),
        None => "new".to_string(),
    };
    let mut spans = vec![
        Span::styled(format!("[{}] ", ctx.kind), cyan),
        Span::styled(mode, cyan),
        Span::styled("  ", cyan),
    ];
    if ctx.uploading {
        spans.push(Span::styled("uploading…  ", yellow));
    }
    if let Some(preview) = &ctx.preview {
        spans.push(Span::styled(format!("preview: {preview}  "), cyan));
    }
    spans.push(Span::styled(ctx.state.clone(), state_style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Short mode word for titles.
pub fn mode_word(mode: &FormMode) -> &'static str {
    match mode {
        FormMode::Create => "Create",
        FormMode::Update(_) => "Update",
    }
}

//! Reusable TUI widgets.

pub mod body_editor;
pub mod form;
pub mod status_bar;

pub use body_editor::{BodyEditor, draw_body_editor};
pub use form::{Form, Slot, display_value, draw_form};
pub use status_bar::{StatusBarContext, draw_status_bar, mode_word};

//! TUI screen implementations.

pub mod editor;
pub mod help;
pub mod home;
pub mod open_record;

pub use editor::{EditorState, draw_editor};
pub use help::{HelpState, draw_help};
pub use home::{HomeState, MenuEntry, draw_home};
pub use open_record::{OpenRecordState, draw_open_record};

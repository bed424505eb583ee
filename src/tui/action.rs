//! Actions returned by screen event handlers.

use crate::model::EntityKind;

use super::app::Screen;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these to start network work and navigate between
/// screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// Open a blank create form.
    OpenCreate(EntityKind),
    /// Ask for the id of a record to update.
    PromptRecord(EntityKind),
    /// Fetch a record and open it in an update form.
    FetchRecord(EntityKind, String),
    /// Upload the file named in the editor's image path.
    Upload,
    /// Validate and send the editor's form.
    Submit,
    /// Quit the application.
    Quit,
}

//! Edit-mode state machine.
//!
//! Tracks whether a submit creates a new record or updates an existing one.

use std::fmt;

use crate::record::RecordId;

/// What a submit will do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Submitting creates a new record.
    #[default]
    Create,
    /// Submitting overwrites the record with this id.
    Edit(RecordId),
}

impl EditMode {
    /// Heading for the form in this mode.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Create => "Add vehicle",
            Self::Edit(_) => "Edit vehicle",
        }
    }

    /// Check if a record is being edited.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// The id of the record being edited, if any.
    #[must_use]
    pub fn target(&self) -> Option<&RecordId> {
        match self {
            Self::Create => None,
            Self::Edit(id) => Some(id),
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Edit(id) => write!(f, "edit {id}"),
        }
    }
}

/// The edit session owned by a form controller.
///
/// Starts in [`EditMode::Create`] and has no terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    mode: EditMode,
}

impl EditSession {
    /// A new session in create mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current mode.
    #[must_use]
    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Enter edit mode for `id`, from any state.
    pub fn begin_edit(&mut self, id: RecordId) {
        self.mode = EditMode::Edit(id);
    }

    /// Leave edit mode without saving.
    pub fn cancel(&mut self) {
        self.mode = EditMode::Create;
    }

    /// Return to create mode after a submit completed.
    ///
    /// Returns the id that was being edited, if any.
    pub fn finish_submit(&mut self) -> Option<RecordId> {
        match std::mem::take(&mut self.mode) {
            EditMode::Create => None,
            EditMode::Edit(id) => Some(id),
        }
    }
}

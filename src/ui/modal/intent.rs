use crate::resource::PersonRecord;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum EmployeeModalIntent {
    View { record: PersonRecord },
    Edit { record: PersonRecord },
    /// Switch an open view into the edit form.
    StartEdit,
    Close,
    FocusNext,
    FocusPrev,
    Type(char),
    Backspace,
    SaveStarted,
    SaveFailed { message: String },
    /// The save went through. Closes the modal.
    SaveSucceeded,
}

impl Intent for EmployeeModalIntent {}

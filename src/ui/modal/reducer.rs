use crate::ui::modal::intent::EmployeeModalIntent;
use crate::ui::modal::state::{EmployeeForm, EmployeeModalState, FormField};
use crate::ui::mvi::Reducer;

const FIELD_COUNT: usize = FormField::ALL.len();

pub struct EmployeeModalReducer;

impl Reducer for EmployeeModalReducer {
    type State = EmployeeModalState;
    type Intent = EmployeeModalIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            EmployeeModalIntent::View { record } => EmployeeModalState::Viewing { record },
            EmployeeModalIntent::Edit { record } => editing(record),
            EmployeeModalIntent::StartEdit => match state {
                EmployeeModalState::Viewing { record } => editing(record),
                other => other,
            },
            EmployeeModalIntent::Close => match state {
                // A save in flight keeps the form open until it settles
                saving @ EmployeeModalState::Editing { saving: true, .. } => saving,
                _ => EmployeeModalState::Hidden,
            },
            EmployeeModalIntent::FocusNext => move_focus(state, |focused| (focused + 1) % FIELD_COUNT),
            EmployeeModalIntent::FocusPrev => {
                move_focus(state, |focused| (focused + FIELD_COUNT - 1) % FIELD_COUNT)
            }
            EmployeeModalIntent::Type(ch) => edit_focused(state, |value| value.push(ch)),
            EmployeeModalIntent::Backspace => edit_focused(state, |value| {
                value.pop();
            }),
            EmployeeModalIntent::SaveStarted => match state {
                EmployeeModalState::Editing {
                    record,
                    form,
                    focused,
                    ..
                } => EmployeeModalState::Editing {
                    record,
                    form,
                    focused,
                    saving: true,
                    error: None,
                },
                other => other,
            },
            EmployeeModalIntent::SaveFailed { message } => match state {
                EmployeeModalState::Editing {
                    record,
                    form,
                    focused,
                    ..
                } => EmployeeModalState::Editing {
                    record,
                    form,
                    focused,
                    saving: false,
                    error: Some(message),
                },
                other => other,
            },
            EmployeeModalIntent::SaveSucceeded => match state {
                EmployeeModalState::Editing { .. } => EmployeeModalState::Hidden,
                other => other,
            },
        }
    }
}

fn editing(record: crate::resource::PersonRecord) -> EmployeeModalState {
    let form = EmployeeForm::from_record(&record);
    EmployeeModalState::Editing {
        record,
        form,
        focused: 0,
        saving: false,
        error: None,
    }
}

fn move_focus(state: EmployeeModalState, step: impl FnOnce(usize) -> usize) -> EmployeeModalState {
    match state {
        EmployeeModalState::Editing {
            record,
            form,
            focused,
            saving: false,
            error,
        } => EmployeeModalState::Editing {
            record,
            form,
            focused: step(focused),
            saving: false,
            error,
        },
        other => other,
    }
}

fn edit_focused(state: EmployeeModalState, edit: impl FnOnce(&mut String)) -> EmployeeModalState {
    match state {
        EmployeeModalState::Editing {
            record,
            mut form,
            focused,
            saving: false,
            error,
        } => {
            if let Some(field) = FormField::ALL.get(focused) {
                edit(form.value_mut(*field));
            }
            EmployeeModalState::Editing {
                record,
                form,
                focused,
                saving: false,
                error,
            }
        }
        other => other,
    }
}

use std::marker::PhantomData;

use crate::list::intent::ListIntent;
use crate::list::state::{DeletePolicy, ListState};
use crate::resource::{dedupe_by_id, Resource};
use crate::ui::mvi::Reducer;

pub struct ListReducer<R>(PhantomData<R>);

impl<R: Resource> Reducer for ListReducer<R> {
    type State = ListState<R>;
    type Intent = ListIntent<R>;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ListIntent::Replace { items } => {
                let (items, _) = dedupe_by_id(items);
                state.items = items;
                // Anything still in flight stays out of sight
                let pending = &state.pending;
                state.hidden.retain(|id| pending.contains(id));
                state.last_reconciled = None;
                state
            }
            ListIntent::RequestDelete { id } => {
                if state.pending.contains(&id) || state.hidden.contains(&id) {
                    return state;
                }
                match state.policy {
                    DeletePolicy::Optimistic => {
                        state.hidden.insert(id.clone());
                        state.pending.insert(id);
                    }
                    DeletePolicy::ConfirmThenHide => {
                        state.confirming = Some(id);
                    }
                }
                state
            }
            ListIntent::CancelDelete => {
                state.confirming = None;
                state
            }
            ListIntent::ConfirmDelete => {
                if let Some(id) = state.confirming.take() {
                    state.last_error = None;
                    state.pending.insert(id);
                }
                state
            }
            ListIntent::DeleteSucceeded { id } => {
                if !state.pending.remove(&id) {
                    return state;
                }
                state.hidden.insert(id.clone());
                state.last_reconciled = Some(id);
                if state.policy == DeletePolicy::ConfirmThenHide {
                    state.refresh_requested = true;
                }
                state
            }
            ListIntent::DeleteFailed { id, message } => {
                if !state.pending.remove(&id) {
                    return state;
                }
                state.last_reconciled = None;
                if state.policy == DeletePolicy::ConfirmThenHide {
                    state.last_error = Some(message);
                }
                state
            }
            ListIntent::RefreshHandled => {
                state.refresh_requested = false;
                state
            }
            ListIntent::DismissError => {
                state.last_error = None;
                state
            }
        }
    }
}

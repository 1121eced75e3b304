use crate::resource::Resource;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum ListIntent<R: Resource> {
    /// A fresh fetch arrived.
    Replace { items: Vec<R> },
    /// User asked to delete `id`. Hides it or asks for confirmation,
    /// depending on the policy.
    RequestDelete { id: R::Id },
    CancelDelete,
    /// User answered yes; the delete request goes out.
    ConfirmDelete,
    DeleteSucceeded { id: R::Id },
    DeleteFailed { id: R::Id, message: String },
    /// The owner re-fetched after a confirmed delete.
    RefreshHandled,
    DismissError,
}

impl<R: Resource> Intent for ListIntent<R> {}

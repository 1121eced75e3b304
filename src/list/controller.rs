use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::client::ClientError;
use crate::list::intent::ListIntent;
use crate::list::reducer::ListReducer;
use crate::list::state::{DeletePolicy, ListState};
use crate::resource::Resource;
use crate::ui::mvi::Reducer;

/// Issues the upstream delete for one record.
#[async_trait]
pub trait Deleter<R: Resource>: Send + Sync {
    async fn delete(&self, id: R::Id) -> Result<(), ClientError>;
}

/// Emitted when a delete settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent<Id> {
    Reconciled { id: Id },
    DeleteFailed { id: Id, message: String },
    /// A confirmed delete succeeded; the owner should re-fetch.
    RefreshRequested,
}

type Notifier<Id> = Arc<dyn Fn(ListEvent<Id>) + Send + Sync>;

/// Sole owner of a list's visible projection.
///
/// All mutation goes through [`ListReducer`]. Cloning shares the same
/// state, so delete tasks can settle while the UI keeps reading.
pub struct ListController<R: Resource> {
    state: Arc<Mutex<ListState<R>>>,
    deleter: Arc<dyn Deleter<R>>,
    notify: Notifier<R::Id>,
}

impl<R: Resource> Clone for ListController<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            deleter: Arc::clone(&self.deleter),
            notify: Arc::clone(&self.notify),
        }
    }
}

impl<R: Resource> ListController<R> {
    pub fn new(policy: DeletePolicy, deleter: Arc<dyn Deleter<R>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ListState::new(policy))),
            deleter,
            notify: Arc::new(|_| {}),
        }
    }

    pub fn with_notifier<F>(mut self, notify: F) -> Self
    where
        F: Fn(ListEvent<R::Id>) + Send + Sync + 'static,
    {
        self.notify = Arc::new(notify);
        self
    }

    pub fn policy(&self) -> DeletePolicy {
        self.state.lock().policy
    }

    pub fn snapshot(&self) -> ListState<R> {
        self.state.lock().clone()
    }

    pub fn visible(&self) -> Vec<R> {
        self.state.lock().visible()
    }

    pub fn replace(&self, items: Vec<R>) {
        self.dispatch(ListIntent::Replace { items });
    }

    /// Starts a delete.
    ///
    /// Under [`DeletePolicy::Optimistic`] the item disappears now and the
    /// returned task settles the request in the background. Under
    /// [`DeletePolicy::ConfirmThenHide`] this only opens the confirmation
    /// and returns `None`; see [`ListController::confirm_delete`].
    pub fn request_delete(&self, id: R::Id) -> Option<JoinHandle<()>> {
        let started = {
            let mut state = self.state.lock();
            let already_pending = state.is_pending(&id);
            *state = ListReducer::reduce(
                std::mem::take(&mut *state),
                ListIntent::RequestDelete { id: id.clone() },
            );
            !already_pending && state.is_pending(&id)
        };
        if !started {
            return None;
        }

        tracing::debug!(id = %id, "Hiding item before delete");
        let controller = self.clone();
        Some(tokio::spawn(async move {
            controller.settle(id).await;
        }))
    }

    pub fn cancel_delete(&self) {
        self.dispatch(ListIntent::CancelDelete);
    }

    /// Sends the delete the user just confirmed and waits for it.
    ///
    /// Returns `None` when nothing was awaiting confirmation, otherwise
    /// whether the delete succeeded.
    pub async fn confirm_delete(&self) -> Option<bool> {
        let id = self.state.lock().confirming.clone()?;
        self.dispatch(ListIntent::ConfirmDelete);
        Some(self.settle(id).await)
    }

    pub fn dismiss_error(&self) {
        self.dispatch(ListIntent::DismissError);
    }

    /// Clears a pending refresh request. Returns whether one was pending.
    pub fn take_refresh_request(&self) -> bool {
        let requested = self.state.lock().refresh_requested;
        if requested {
            self.dispatch(ListIntent::RefreshHandled);
        }
        requested
    }

    async fn settle(&self, id: R::Id) -> bool {
        match self.deleter.delete(id.clone()).await {
            Ok(()) => {
                tracing::info!(id = %id, "Delete confirmed");
                let policy = self.policy();
                self.dispatch(ListIntent::DeleteSucceeded { id: id.clone() });
                (self.notify)(ListEvent::Reconciled { id });
                if policy == DeletePolicy::ConfirmThenHide {
                    (self.notify)(ListEvent::RefreshRequested);
                }
                true
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(id = %id, error = %message, "Delete failed");
                self.dispatch(ListIntent::DeleteFailed {
                    id: id.clone(),
                    message: message.clone(),
                });
                (self.notify)(ListEvent::DeleteFailed { id, message });
                false
            }
        }
    }

    fn dispatch(&self, intent: ListIntent<R>) {
        let mut state = self.state.lock();
        *state = ListReducer::reduce(std::mem::take(&mut *state), intent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::CatalogItem;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDeleter {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Deleter<CatalogItem> for CountingDeleter {
        async fn delete(&self, _id: u64) -> Result<(), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ClientError::Fetch {
                    status: 500,
                    message: "Failed to delete product".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn item(id: u64) -> CatalogItem {
        CatalogItem {
            id,
            title: format!("Item {id}"),
            price: 1.0,
            thumbnail: String::new(),
            category: "a".to_string(),
        }
    }

    #[tokio::test]
    async fn optimistic_request_spawns_single_delete() {
        let deleter = Arc::new(CountingDeleter {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let controller = ListController::new(DeletePolicy::Optimistic, deleter.clone());
        controller.replace(vec![item(1), item(2)]);

        let handle = controller.request_delete(1).expect("delete task");
        assert!(controller.request_delete(1).is_none());
        handle.await.unwrap();

        assert_eq!(deleter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.visible(), vec![item(2)]);
    }

    #[tokio::test]
    async fn confirm_without_request_is_none() {
        let deleter = Arc::new(CountingDeleter {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let controller = ListController::new(DeletePolicy::ConfirmThenHide, deleter.clone());
        assert_eq!(controller.confirm_delete().await, None);
        assert_eq!(deleter.calls.load(Ordering::SeqCst), 0);
    }
}

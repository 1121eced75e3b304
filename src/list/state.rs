use std::collections::BTreeSet;

use crate::resource::Resource;
use crate::ui::mvi::UiState;

/// How a list reacts to a delete intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Hide at once, delete in the background, never show the item again
    /// even if the delete fails.
    #[default]
    Optimistic,
    /// Ask first, wait for the server, hide and refresh only on success.
    /// A failure leaves the item visible and records the error.
    ConfirmThenHide,
}

/// Observable phase of a list, derived from its in-flight deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase<Id> {
    /// Shows the last fetch minus settled removals.
    Idle,
    /// Deletes still in flight, in id order.
    PendingRemoval(Vec<Id>),
    /// The most recent delete succeeded and nothing else is in flight.
    Reconciled(Id),
}

/// Client-side projection of one upstream collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<R: Resource> {
    pub policy: DeletePolicy,
    /// Last fetched collection, unique by id.
    pub items: Vec<R>,
    /// Ids excluded from [`ListState::visible`].
    pub hidden: BTreeSet<R::Id>,
    /// Ids whose delete request has not settled.
    pub pending: BTreeSet<R::Id>,
    /// Id awaiting the user's yes/no, under [`DeletePolicy::ConfirmThenHide`].
    pub confirming: Option<R::Id>,
    pub last_reconciled: Option<R::Id>,
    pub last_error: Option<String>,
    /// Set after a confirmed delete; cleared once the owner re-fetches.
    pub refresh_requested: bool,
}

impl<R: Resource> Default for ListState<R> {
    fn default() -> Self {
        Self::new(DeletePolicy::default())
    }
}

impl<R: Resource> UiState for ListState<R> {}

impl<R: Resource> ListState<R> {
    pub fn new(policy: DeletePolicy) -> Self {
        Self {
            policy,
            items: Vec::new(),
            hidden: BTreeSet::new(),
            pending: BTreeSet::new(),
            confirming: None,
            last_reconciled: None,
            last_error: None,
            refresh_requested: false,
        }
    }

    /// Items to render, in fetch order.
    pub fn visible(&self) -> Vec<R> {
        self.items
            .iter()
            .filter(|item| !self.hidden.contains(item.id()))
            .cloned()
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !self.hidden.contains(item.id()))
            .count()
    }

    pub fn is_pending(&self, id: &R::Id) -> bool {
        self.pending.contains(id)
    }

    pub fn phase(&self) -> ListPhase<R::Id> {
        if !self.pending.is_empty() {
            return ListPhase::PendingRemoval(self.pending.iter().cloned().collect());
        }
        match &self.last_reconciled {
            Some(id) => ListPhase::Reconciled(id.clone()),
            None => ListPhase::Idle,
        }
    }
}

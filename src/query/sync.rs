use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::query::debounce::Debouncer;
use crate::query::params::QueryParams;

/// Keeps the search buffer and category in step with the committed
/// [`QueryParams`].
///
/// Search edits are buffered and commit after the debounce delay; a
/// category selection commits at once. Subscribers see one change per
/// commit that actually altered the parameters.
#[derive(Clone)]
pub struct QuerySync {
    committed: Arc<watch::Sender<QueryParams>>,
    buffer: Arc<Mutex<String>>,
    debouncer: Arc<Debouncer>,
    commits: Arc<AtomicU64>,
}

impl QuerySync {
    pub fn new(initial: QueryParams, debounce: Duration) -> Self {
        let buffer = initial.q.clone();
        let (tx, _rx) = watch::channel(initial);
        Self {
            committed: Arc::new(tx),
            buffer: Arc::new(Mutex::new(buffer)),
            debouncer: Arc::new(Debouncer::new(debounce)),
            commits: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryParams> {
        self.committed.subscribe()
    }

    /// Last committed parameters.
    pub fn current(&self) -> QueryParams {
        self.committed.borrow().clone()
    }

    /// What the search field shows, committed or not.
    pub fn search_buffer(&self) -> String {
        self.buffer.lock().clone()
    }

    /// Number of commits that changed the parameters.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Records a search edit and restarts the debounce timer.
    pub fn input_search(&self, text: impl Into<String>) {
        let text = text.into();
        *self.buffer.lock() = text.clone();

        let committed = Arc::clone(&self.committed);
        let commits = Arc::clone(&self.commits);
        self.debouncer.schedule(async move {
            commit(&committed, &commits, |params| {
                if params.q == text {
                    return false;
                }
                params.q = text;
                true
            });
        });
    }

    /// Commits a category immediately. An empty slug clears the filter.
    pub fn select_category(&self, slug: impl Into<String>) {
        let slug = slug.into();
        commit(&self.committed, &self.commits, |params| {
            if params.category == slug {
                return false;
            }
            params.category = slug;
            true
        });
    }

    /// Replaces everything, as when navigating to a new address.
    ///
    /// Any pending search edit is dropped and the buffer follows the new
    /// search text.
    pub fn navigate(&self, params: QueryParams) {
        self.debouncer.cancel();
        *self.buffer.lock() = params.q.clone();
        commit(&self.committed, &self.commits, |current| {
            if *current == params {
                return false;
            }
            *current = params;
            true
        });
    }
}

fn commit<F>(committed: &watch::Sender<QueryParams>, commits: &AtomicU64, modify: F)
where
    F: FnOnce(&mut QueryParams) -> bool,
{
    let changed = committed.send_if_modified(modify);
    if changed {
        commits.fetch_add(1, Ordering::SeqCst);
        let params = committed.borrow();
        tracing::debug!(q = %params.q, category = %params.category, "Committed query");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn typing_within_window_commits_once() {
        let sync = QuerySync::new(QueryParams::default(), DEBOUNCE);
        let mut rx = sync.subscribe();

        for prefix in ["s", "sh", "sho", "shoe"] {
            sync.input_search(prefix);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(sync.commit_count(), 0);
        assert_eq!(sync.search_buffer(), "shoe");

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(sync.commit_count(), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().q, "shoe");
    }

    #[tokio::test(start_paused = true)]
    async fn category_commits_without_delay() {
        let sync = QuerySync::new(QueryParams::default(), DEBOUNCE);
        sync.select_category("beauty");
        assert_eq!(sync.current().category, "beauty");
        assert_eq!(sync.commit_count(), 1);

        // Same slug again is not a change
        sync.select_category("beauty");
        assert_eq!(sync.commit_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retyping_committed_text_is_not_a_change() {
        let sync = QuerySync::new(QueryParams::new("shoe", ""), DEBOUNCE);
        sync.input_search("shoes");
        sync.input_search("shoe");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(sync.commit_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_search_commits_empty_string() {
        let sync = QuerySync::new(QueryParams::new("shoe", "beauty"), DEBOUNCE);
        sync.input_search("");
        tokio::time::sleep(Duration::from_millis(400)).await;
        let current = sync.current();
        assert_eq!(current.q, "");
        assert_eq!(current.category, "beauty");
        assert!(current.search().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn navigate_cancels_pending_search() {
        let sync = QuerySync::new(QueryParams::default(), DEBOUNCE);
        sync.input_search("lamp");
        sync.navigate(QueryParams::new("phone", "smartphones"));
        assert_eq!(sync.search_buffer(), "phone");
        assert!(!sync.has_pending_search());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(sync.current().q, "phone");
        assert_eq!(sync.commit_count(), 1);
    }
}

//! Synchronous push notification
//!
//! Listeners fire on the thread that applied the mutation, strictly before
//! the corresponding queue pushes. A failing listener is isolated: the panic
//! is caught and reported, and delivery to remaining listeners and queues
//! proceeds.

use crate::event::AppliedUpdate;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;
use types::enums::{TableStatus, UpdateType};
use types::row::TableRow;

/// Push-style table subscriber.
///
/// All hooks default to no-ops so a subscriber implements only what it needs.
/// Hooks run on the mutating thread, inside the table's apply window; they
/// may read the table but must not mutate it (hand mutation work to another
/// thread, e.g. via a queue). The engine gives no cross-thread serialization
/// guarantee beyond per-table mutation order.
pub trait TableListener<R: TableRow>: Send + Sync {
    fn on_added(&self, _row_id: &str, _row: &R) {}
    fn on_changed(&self, _row_id: &str, _row: &R, _previous: &R) {}
    fn on_deleted(&self, _row_id: &str, _row: &R) {}
    fn on_status_changed(&self, _status: TableStatus) {}
}

/// Per-table listener registrations
pub(crate) struct ListenerSet<R: TableRow> {
    update: HashMap<UpdateType, Vec<Arc<dyn TableListener<R>>>>,
    status: Vec<Arc<dyn TableListener<R>>>,
}

impl<R: TableRow> ListenerSet<R> {
    pub(crate) fn new() -> Self {
        Self {
            update: HashMap::new(),
            status: Vec::new(),
        }
    }

    pub(crate) fn subscribe_update(
        &mut self,
        update_type: UpdateType,
        listener: Arc<dyn TableListener<R>>,
    ) {
        self.update.entry(update_type).or_default().push(listener);
    }

    pub(crate) fn unsubscribe_update(
        &mut self,
        update_type: UpdateType,
        listener: &Arc<dyn TableListener<R>>,
    ) {
        if let Some(listeners) = self.update.get_mut(&update_type) {
            listeners.retain(|l| !Arc::ptr_eq(l, listener));
        }
    }

    pub(crate) fn subscribe_status(&mut self, listener: Arc<dyn TableListener<R>>) {
        self.status.push(listener);
    }

    pub(crate) fn unsubscribe_status(&mut self, listener: &Arc<dyn TableListener<R>>) {
        self.status.retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Snapshot the listeners for one update type, so callbacks run without
    /// holding the registry lock
    pub(crate) fn listeners_for(&self, update_type: UpdateType) -> Vec<Arc<dyn TableListener<R>>> {
        self.update.get(&update_type).cloned().unwrap_or_default()
    }

    pub(crate) fn status_listeners(&self) -> Vec<Arc<dyn TableListener<R>>> {
        self.status.clone()
    }
}

/// Fire the matching hook on every listener, isolating failures
pub(crate) fn notify_update<R: TableRow>(
    listeners: &[Arc<dyn TableListener<R>>],
    applied: &AppliedUpdate<R>,
) {
    let row_id = applied.row.row_id();
    for listener in listeners {
        let outcome = catch_unwind(AssertUnwindSafe(|| match applied.update_type {
            UpdateType::Insert => listener.on_added(row_id, &applied.row),
            UpdateType::Update => {
                // previous is always present for a successful update
                if let Some(previous) = &applied.previous {
                    listener.on_changed(row_id, &applied.row, previous);
                }
            }
            UpdateType::Delete => listener.on_deleted(row_id, &applied.row),
        }));
        if outcome.is_err() {
            error!(
                table = %R::KIND,
                update = %applied.update_type,
                row_id,
                "table listener panicked; listener isolated"
            );
        }
    }
}

/// Fire `on_status_changed` on every listener, isolating failures
pub(crate) fn notify_status<R: TableRow>(
    listeners: &[Arc<dyn TableListener<R>>],
    status: TableStatus,
) {
    for listener in listeners {
        if catch_unwind(AssertUnwindSafe(|| listener.on_status_changed(status))).is_err() {
            error!(table = %R::KIND, ?status, "status listener panicked; listener isolated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use types::offer::OfferRow;

    struct Recorder {
        added: AtomicUsize,
        deleted: AtomicUsize,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                added: AtomicUsize::new(0),
                deleted: AtomicUsize::new(0),
            })
        }
    }

    impl TableListener<OfferRow> for Recorder {
        fn on_added(&self, _row_id: &str, _row: &OfferRow) {
            self.added.fetch_add(1, Ordering::SeqCst);
        }

        fn on_deleted(&self, _row_id: &str, _row: &OfferRow) {
            self.deleted.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicker;

    impl TableListener<OfferRow> for Panicker {
        fn on_added(&self, _row_id: &str, _row: &OfferRow) {
            panic!("listener bug");
        }
    }

    fn applied_insert(id: &str) -> AppliedUpdate<OfferRow> {
        AppliedUpdate {
            update_type: UpdateType::Insert,
            row: Arc::new(OfferRow::new(id)),
            previous: None,
            changed: Vec::new(),
        }
    }

    #[test]
    fn test_dispatch_routes_by_update_type() {
        let recorder = Recorder::new();
        let mut set: ListenerSet<OfferRow> = ListenerSet::new();
        set.subscribe_update(UpdateType::Insert, recorder.clone());

        notify_update(&set.listeners_for(UpdateType::Insert), &applied_insert("EUR/USD"));
        assert_eq!(recorder.added.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.deleted.load(Ordering::SeqCst), 0);

        // No Delete subscription, so a delete notifies nobody
        assert!(set.listeners_for(UpdateType::Delete).is_empty());
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let recorder = Recorder::new();
        let mut set: ListenerSet<OfferRow> = ListenerSet::new();
        set.subscribe_update(UpdateType::Insert, Arc::new(Panicker));
        set.subscribe_update(UpdateType::Insert, recorder.clone());

        // The panicking listener must not prevent delivery to the recorder
        notify_update(&set.listeners_for(UpdateType::Insert), &applied_insert("EUR/USD"));
        assert_eq!(recorder.added.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_by_identity() {
        let first = Recorder::new();
        let second = Recorder::new();
        let mut set: ListenerSet<OfferRow> = ListenerSet::new();

        let first_handle: Arc<dyn TableListener<OfferRow>> = first.clone();
        set.subscribe_update(UpdateType::Insert, first_handle.clone());
        set.subscribe_update(UpdateType::Insert, second.clone());

        set.unsubscribe_update(UpdateType::Insert, &first_handle);
        notify_update(&set.listeners_for(UpdateType::Insert), &applied_insert("EUR/USD"));

        assert_eq!(first.added.load(Ordering::SeqCst), 0);
        assert_eq!(second.added.load(Ordering::SeqCst), 1);
    }
}

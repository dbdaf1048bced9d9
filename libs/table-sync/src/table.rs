//! The per-kind mirrored table
//!
//! An ordered, key-indexed collection of immutable row snapshots. Mutation is
//! serialized per table; reads run concurrently against the storage lock and
//! observe whole rows only (never a torn cell).
//!
//! Lock discipline: the apply gate serializes mutation *and* the notification
//! that follows it, so every listener call and queue push happens in
//! application order. The storage lock is held only for the structural change
//! itself, keeping readers off the notification path. Listener callbacks and
//! queue pushes run without the storage or registry locks held.

use crate::cursor::RowCursor;
use crate::event::AppliedUpdate;
use crate::listeners::{self, ListenerSet, TableListener};
use crate::query::RowFilter;
use crate::queue::{AllEventQueue, UpdateEventQueue};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::debug;
use types::enums::{TableEventsFilter, TableKind, TableStatus, UpdateOrigin, UpdateType};
use types::errors::TableError;
use types::row::TableRow;

struct Storage<R: TableRow> {
    rows: Vec<Arc<R>>,
    index: HashMap<String, usize>,
    /// Columns touched by the most recent Update, per row key
    changed: HashMap<String, Vec<R::Field>>,
    status: TableStatus,
}

struct Subscriptions<R: TableRow> {
    listeners: ListenerSet<R>,
    typed_queues: Vec<Weak<UpdateEventQueue<R>>>,
    all_queues: Vec<Weak<AllEventQueue>>,
}

/// One mirrored table
pub struct Table<R: TableRow> {
    apply_gate: Mutex<()>,
    storage: RwLock<Storage<R>>,
    subs: Mutex<Subscriptions<R>>,
    events_filter: Mutex<TableEventsFilter>,
}

impl<R: TableRow> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TableRow> Table<R> {
    pub fn new() -> Self {
        Self {
            apply_gate: Mutex::new(()),
            storage: RwLock::new(Storage {
                rows: Vec::new(),
                index: HashMap::new(),
                changed: HashMap::new(),
                status: TableStatus::Initial,
            }),
            subs: Mutex::new(Subscriptions {
                listeners: ListenerSet::new(),
                typed_queues: Vec::new(),
                all_queues: Vec::new(),
            }),
            events_filter: Mutex::new(TableEventsFilter::AllEvents),
        }
    }

    /// The table kind this instance mirrors
    pub fn kind(&self) -> TableKind {
        R::KIND
    }

    /// Number of current rows
    pub fn size(&self) -> usize {
        self.storage.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.read().rows.is_empty()
    }

    /// Current refresh status
    pub fn status(&self) -> TableStatus {
        self.storage.read().status
    }

    /// Drive the refresh state machine.
    ///
    /// `Failed` is terminal for the table's lifetime; transitions out of it
    /// are ignored. Listeners are notified only on an actual change.
    pub fn set_status(&self, status: TableStatus) {
        let changed = {
            let mut storage = self.storage.write();
            if storage.status == TableStatus::Failed || storage.status == status {
                false
            } else {
                storage.status = status;
                true
            }
        };
        if changed {
            debug!(table = %R::KIND, ?status, "table status changed");
            let listeners = self.subs.lock().listeners.status_listeners();
            listeners::notify_status(&listeners, status);
        }
    }

    /// Current events filter
    pub fn events_filter(&self) -> TableEventsFilter {
        *self.events_filter.lock()
    }

    /// Choose whether locally-synthesized mutations are surfaced
    pub fn set_events_filter(&self, filter: TableEventsFilter) {
        *self.events_filter.lock() = filter;
    }

    /// Apply one mutation.
    ///
    /// Insert of an existing key fails with `DuplicateKey`; Update/Delete of
    /// a missing key fails with `UnknownRow`. A failed apply leaves the table
    /// untouched. On success the event is delivered to listeners first, then
    /// to every subscribed queue, in application order.
    pub fn apply(
        &self,
        update_type: UpdateType,
        row: R,
        origin: UpdateOrigin,
    ) -> Result<AppliedUpdate<R>, TableError> {
        let _gate = self.apply_gate.lock();
        let applied = self.apply_to_storage(update_type, row)?;
        debug!(
            table = %R::KIND,
            update = %update_type,
            row_id = %applied.row.row_id(),
            changed = applied.changed.len(),
            "applied mutation"
        );
        if self.is_surfaced(origin) {
            self.dispatch(&applied);
        }
        Ok(applied)
    }

    fn is_surfaced(&self, origin: UpdateOrigin) -> bool {
        match (*self.events_filter.lock(), origin) {
            (TableEventsFilter::ServerOnly, UpdateOrigin::Local) => false,
            _ => true,
        }
    }

    fn apply_to_storage(
        &self,
        update_type: UpdateType,
        row: R,
    ) -> Result<AppliedUpdate<R>, TableError> {
        let mut guard = self.storage.write();
        let storage = &mut *guard;
        let row_id = row.row_id().to_string();

        match update_type {
            UpdateType::Insert => {
                if storage.index.contains_key(&row_id) {
                    return Err(TableError::DuplicateKey {
                        kind: R::KIND,
                        row_id,
                    });
                }
                let row = Arc::new(row);
                storage.index.insert(row_id.clone(), storage.rows.len());
                storage.rows.push(row.clone());
                storage.changed.remove(&row_id);
                Ok(AppliedUpdate {
                    update_type,
                    row,
                    previous: None,
                    changed: Vec::new(),
                })
            }
            UpdateType::Update => {
                let position = *storage.index.get(&row_id).ok_or(TableError::UnknownRow {
                    kind: R::KIND,
                    row_id: row_id.clone(),
                })?;
                let previous = storage.rows[position].clone();
                let changed = R::changed_fields(&previous, &row);
                let row = Arc::new(row);
                storage.rows[position] = row.clone();
                storage.changed.insert(row_id, changed.clone());
                Ok(AppliedUpdate {
                    update_type,
                    row,
                    previous: Some(previous),
                    changed,
                })
            }
            UpdateType::Delete => {
                let position = storage.index.remove(&row_id).ok_or(TableError::UnknownRow {
                    kind: R::KIND,
                    row_id: row_id.clone(),
                })?;
                let removed = storage.rows.remove(position);
                // Positions after the removal point shift down by one
                for (i, r) in storage.rows.iter().enumerate().skip(position) {
                    storage.index.insert(r.row_id().to_string(), i);
                }
                storage.changed.remove(&row_id);
                Ok(AppliedUpdate {
                    update_type,
                    row: removed.clone(),
                    previous: Some(removed),
                    changed: Vec::new(),
                })
            }
        }
    }

    fn dispatch(&self, applied: &AppliedUpdate<R>) {
        let (listeners, typed_queues, all_queues) = {
            let mut subs = self.subs.lock();
            (
                subs.listeners.listeners_for(applied.update_type),
                upgrade_all(&mut subs.typed_queues),
                upgrade_all(&mut subs.all_queues),
            )
        };

        // Listeners see the new state first; queues are the buffered path.
        listeners::notify_update(&listeners, applied);

        for queue in &typed_queues {
            if queue.update_type() == applied.update_type {
                queue.push_row(&applied.row);
            }
        }

        if !all_queues.is_empty() {
            let event = applied.to_row_event();
            for queue in &all_queues {
                queue.push_event(&event);
            }
        }
    }

    /// Replace the table contents from a full venue snapshot.
    ///
    /// Emits no per-row events; status moves to `Refreshed` on success. A
    /// duplicate key inside the snapshot fails the load and leaves the table
    /// contents untouched.
    pub fn load_snapshot(&self, rows: Vec<R>) -> Result<(), TableError> {
        let _gate = self.apply_gate.lock();
        let mut fresh_rows = Vec::with_capacity(rows.len());
        let mut fresh_index = HashMap::with_capacity(rows.len());
        for row in rows {
            let row_id = row.row_id().to_string();
            if fresh_index.insert(row_id.clone(), fresh_rows.len()).is_some() {
                return Err(TableError::DuplicateKey {
                    kind: R::KIND,
                    row_id,
                });
            }
            fresh_rows.push(Arc::new(row));
        }

        {
            let mut storage = self.storage.write();
            storage.rows = fresh_rows;
            storage.index = fresh_index;
            storage.changed.clear();
        }
        debug!(table = %R::KIND, rows = self.size(), "snapshot loaded");
        self.set_status(TableStatus::Refreshed);
        Ok(())
    }

    /// Row at `index`; `OutOfRange` past the end
    pub fn get_row(&self, index: usize) -> Result<Arc<R>, TableError> {
        let storage = self.storage.read();
        storage.rows.get(index).cloned().ok_or(TableError::OutOfRange {
            index,
            size: storage.rows.len(),
        })
    }

    /// Key lookup; `None` rather than an error when absent
    pub fn find_row(&self, row_id: &str) -> Option<Arc<R>> {
        let storage = self.storage.read();
        storage
            .index
            .get(row_id)
            .map(|&position| storage.rows[position].clone())
    }

    /// Snapshot of the current row sequence
    pub fn rows(&self) -> Vec<Arc<R>> {
        self.storage.read().rows.clone()
    }

    /// Visit every row of the snapshot taken at call time, in index order.
    ///
    /// Snapshot-consistent, not mutation-consistent: a row deleted after the
    /// snapshot was taken is still visited with its last-known value.
    pub fn for_each(&self, mut visitor: impl FnMut(&R)) {
        for row in self.rows() {
            visitor(&row);
        }
    }

    /// Whether the most recent Update of the row at `index` touched `field`.
    ///
    /// Cleared when the row is next inserted, deleted, or replaced by a
    /// snapshot load.
    pub fn is_cell_changed(&self, index: usize, field: R::Field) -> Result<bool, TableError> {
        let storage = self.storage.read();
        let row = storage.rows.get(index).ok_or(TableError::OutOfRange {
            index,
            size: storage.rows.len(),
        })?;
        Ok(storage
            .changed
            .get(row.row_id())
            .map(|fields| fields.contains(&field))
            .unwrap_or(false))
    }

    /// Cursor over all rows
    pub fn cursor(self: &Arc<Self>) -> RowCursor<R> {
        RowCursor::new(self, None)
    }

    /// Cursor over rows matching `filter`
    pub fn cursor_filtered(self: &Arc<Self>, filter: RowFilter<R::Field>) -> RowCursor<R> {
        RowCursor::new(self, Some(filter))
    }

    /// Advance a cursor: the next row satisfying its filter, or `None` once
    /// past the end (the cursor is then exhausted permanently)
    pub fn next_row(&self, cursor: &mut RowCursor<R>) -> Option<Arc<R>> {
        if cursor.exhausted {
            return None;
        }
        let storage = self.storage.read();
        let mut position = cursor.position;
        while position < storage.rows.len() {
            let row = &storage.rows[position];
            position += 1;
            let matched = cursor
                .filter
                .as_ref()
                .map_or(true, |filter| filter.matches(&**row));
            if matched {
                cursor.position = position;
                return Some(row.clone());
            }
        }
        cursor.position = storage.rows.len();
        cursor.exhausted = true;
        None
    }

    /// Subscribe to one update type
    pub fn subscribe_update(&self, update_type: UpdateType, listener: Arc<dyn TableListener<R>>) {
        self.subs.lock().listeners.subscribe_update(update_type, listener);
    }

    /// Unsubscribe a handle previously passed to `subscribe_update`
    pub fn unsubscribe_update(&self, update_type: UpdateType, listener: &Arc<dyn TableListener<R>>) {
        self.subs
            .lock()
            .listeners
            .unsubscribe_update(update_type, listener);
    }

    /// Subscribe to status transitions
    pub fn subscribe_status(&self, listener: Arc<dyn TableListener<R>>) {
        self.subs.lock().listeners.subscribe_status(listener);
    }

    /// Unsubscribe a handle previously passed to `subscribe_status`
    pub fn unsubscribe_status(&self, listener: &Arc<dyn TableListener<R>>) {
        self.subs.lock().listeners.unsubscribe_status(listener);
    }

    /// New queue receiving this table's events of one update type.
    ///
    /// Every queue gets an independent, order-preserving copy of the stream.
    /// Dropping the returned `Arc` releases the subscription.
    pub fn update_event_queue(
        &self,
        update_type: UpdateType,
        need_copy: bool,
    ) -> Arc<UpdateEventQueue<R>> {
        let queue = UpdateEventQueue::new(update_type, need_copy);
        self.subs.lock().typed_queues.push(Arc::downgrade(&queue));
        queue
    }

    /// New queue receiving every update type of this table
    pub fn all_event_queue(&self, need_copy: bool) -> Arc<AllEventQueue> {
        let queue = AllEventQueue::new(Some(R::KIND), need_copy);
        self.subs.lock().all_queues.push(Arc::downgrade(&queue));
        queue
    }

    /// Attach an externally owned all-events queue (the manager-wide queue)
    pub(crate) fn attach_all_queue(&self, queue: &Arc<AllEventQueue>) {
        self.subs.lock().all_queues.push(Arc::downgrade(queue));
    }
}

/// Upgrade live registrations, dropping dead ones in place
fn upgrade_all<T>(registrations: &mut Vec<Weak<T>>) -> Vec<Arc<T>> {
    let mut live = Vec::with_capacity(registrations.len());
    registrations.retain(|weak| match weak.upgrade() {
        Some(strong) => {
            live.push(strong);
            true
        }
        None => false,
    });
    live
}

//! Blocking event queues
//!
//! Thread-safe FIFOs bridging table mutations to consumers. Two flavors share
//! one core: [`UpdateEventQueue`] carries rows of a single update type for one
//! table, [`AllEventQueue`] carries kind-erased events (and, on the
//! manager-wide queue, batch markers).
//!
//! Multiple producers and consumers are safe. Each queue is an independent
//! subscription: every queue registered for a table/type receives its own
//! order-preserving copy of the event stream. Dropping the last `Arc` to a
//! queue releases the subscription.

use crate::event::{AllEvent, RowEvent};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;
use types::enums::{TableKind, UpdateType, UpdatesProcessStatus};
use types::row::TableRow;

/// How often a breakable wait re-samples its continuation flag
const BREAK_POLL: Duration = Duration::from_millis(10);

/// Fired once per successful push, before blocked consumers are woken.
///
/// Lets wake-driven designs be layered on top of polling; the listener must
/// not assume the item is still queued when it runs.
pub trait QueuePutListener<T>: Send + Sync {
    fn on_put(&self, item: &T);
}

/// MPMC FIFO with blocking, timed, and breakable waits
struct Channel<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
    put_listeners: Mutex<Vec<Arc<dyn QueuePutListener<T>>>>,
}

impl<T: Clone> Channel<T> {
    fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            put_listeners: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, item: T) {
        self.items.lock().push_back(item.clone());
        // Put listeners run before waiters are notified, so a wake-driven
        // consumer layered on a listener observes the item on its next poll.
        let listeners = self.put_listeners.lock().clone();
        for listener in &listeners {
            listener.on_put(&item);
        }
        self.available.notify_one();
    }

    fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    fn len(&self) -> usize {
        self.items.lock().len()
    }

    fn try_pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    fn wait_pop(&self) -> T {
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            self.available.wait(&mut items);
        }
    }

    fn timed_wait_pop(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            if self.available.wait_until(&mut items, deadline).timed_out() {
                return items.pop_front();
            }
        }
    }

    fn breakable_wait_pop(&self, keep_waiting: &AtomicBool) -> Option<T> {
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            if !keep_waiting.load(Ordering::Acquire) {
                return None;
            }
            // The flag is sampled, not interrupt-driven; wake periodically.
            self.available.wait_for(&mut items, BREAK_POLL);
        }
    }

    fn clear(&self) {
        self.items.lock().clear();
    }

    fn subscribe(&self, listener: Arc<dyn QueuePutListener<T>>) {
        self.put_listeners.lock().push(listener);
    }

    fn unsubscribe(&self, listener: &Arc<dyn QueuePutListener<T>>) {
        self.put_listeners
            .lock()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }
}

/// Per-table, per-update-type event queue.
///
/// Yields the rows of exactly one update type for one table, in application
/// order.
pub struct UpdateEventQueue<R: TableRow> {
    channel: Channel<Arc<R>>,
    update_type: UpdateType,
    need_copy: bool,
}

impl<R: TableRow> UpdateEventQueue<R> {
    pub(crate) fn new(update_type: UpdateType, need_copy: bool) -> Arc<Self> {
        Arc::new(Self {
            channel: Channel::new(),
            update_type,
            need_copy,
        })
    }

    /// Table this queue belongs to
    pub fn table_kind(&self) -> TableKind {
        R::KIND
    }

    /// Update type this queue carries
    pub fn update_type(&self) -> UpdateType {
        self.update_type
    }

    /// Whether consumers receive detached row copies
    pub fn need_copy(&self) -> bool {
        self.need_copy
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Non-blocking get; `None` when the queue is empty
    pub fn try_get(&self) -> Option<Arc<R>> {
        self.channel.try_pop()
    }

    /// Block until an item is available
    pub fn wait_get(&self) -> Arc<R> {
        self.channel.wait_pop()
    }

    /// Block up to `timeout`; `None` on expiry. A zero timeout never parks.
    pub fn timed_wait_get(&self, timeout: Duration) -> Option<Arc<R>> {
        self.channel.timed_wait_pop(timeout)
    }

    /// Block while `keep_waiting` is true and the queue is empty.
    ///
    /// Returns `None` when the flag flips with no item queued; callers loop
    /// and re-check, since the flag is sampled rather than interrupt-driven.
    pub fn breakable_wait_get(&self, keep_waiting: &AtomicBool) -> Option<Arc<R>> {
        self.channel.breakable_wait_pop(keep_waiting)
    }

    /// Atomically discard everything queued; in-flight pushes are unaffected
    pub fn delete_all_events(&self) {
        self.channel.clear();
    }

    pub fn subscribe_on_put(&self, listener: Arc<dyn QueuePutListener<Arc<R>>>) {
        self.channel.subscribe(listener);
    }

    pub fn unsubscribe_on_put(&self, listener: &Arc<dyn QueuePutListener<Arc<R>>>) {
        self.channel.unsubscribe(listener);
    }

    pub(crate) fn push_row(&self, row: &Arc<R>) {
        let item = if self.need_copy {
            Arc::new((**row).clone())
        } else {
            Arc::clone(row)
        };
        trace!(table = %R::KIND, update = %self.update_type, row_id = %row.row_id(), "queue push");
        self.channel.push(item);
    }
}

/// All-events queue: every update type for one table, or (on the manager-wide
/// flavor) for all seven tables plus batch markers.
pub struct AllEventQueue {
    channel: Channel<AllEvent>,
    /// `None` for the manager-wide queue
    scope: Option<TableKind>,
    need_copy: bool,
}

impl AllEventQueue {
    pub(crate) fn new(scope: Option<TableKind>, need_copy: bool) -> Arc<Self> {
        Arc::new(Self {
            channel: Channel::new(),
            scope,
            need_copy,
        })
    }

    /// Table this queue is scoped to; `None` for the manager-wide queue
    pub fn table_kind(&self) -> Option<TableKind> {
        self.scope
    }

    /// Whether consumers receive detached row copies
    pub fn need_copy(&self) -> bool {
        self.need_copy
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Non-blocking get; `None` when the queue is empty
    pub fn try_get(&self) -> Option<AllEvent> {
        self.channel.try_pop()
    }

    /// Block until an item is available
    pub fn wait_get(&self) -> AllEvent {
        self.channel.wait_pop()
    }

    /// Block up to `timeout`; `None` on expiry. A zero timeout never parks.
    pub fn timed_wait_get(&self, timeout: Duration) -> Option<AllEvent> {
        self.channel.timed_wait_pop(timeout)
    }

    /// Block while `keep_waiting` is true and the queue is empty
    pub fn breakable_wait_get(&self, keep_waiting: &AtomicBool) -> Option<AllEvent> {
        self.channel.breakable_wait_pop(keep_waiting)
    }

    /// Atomically discard everything queued; in-flight pushes are unaffected
    pub fn delete_all_events(&self) {
        self.channel.clear();
    }

    pub fn subscribe_on_put(&self, listener: Arc<dyn QueuePutListener<AllEvent>>) {
        self.channel.subscribe(listener);
    }

    pub fn unsubscribe_on_put(&self, listener: &Arc<dyn QueuePutListener<AllEvent>>) {
        self.channel.unsubscribe(listener);
    }

    pub(crate) fn push_event(&self, event: &RowEvent) {
        let event = if self.need_copy {
            event.deep_copy()
        } else {
            event.clone()
        };
        self.channel.push(AllEvent::Update(event));
    }

    pub(crate) fn push_marker(&self, status: UpdatesProcessStatus) {
        self.channel.push(AllEvent::Marker(status));
    }
}

//! The seven-table owner
//!
//! Routes the feed into the per-kind tables, brackets grouped updates with
//! process-status markers, exposes the manager-wide all-events queue, and
//! tracks the aggregate load status.
//!
//! Lock discipline: the update gate and the batch gate are always acquired
//! before any per-table lock, never after, so the global lock/unlock window
//! cannot deadlock against per-table mutation.

use crate::queue::AllEventQueue;
use crate::table::Table;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info};
use types::account::AccountRow;
use types::closed_trade::ClosedTradeRow;
use types::enums::{
    TableKind, TableManagerStatus, TableStatus, UpdateOrigin, UpdateType, UpdatesProcessStatus,
};
use types::errors::TableError;
use types::message::MessageRow;
use types::offer::OfferRow;
use types::order::OrderRow;
use types::row::{Row, TableRow};
use types::summary::SummaryRow;
use types::trade::TradeRow;

/// One routed mutation from the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedUpdate {
    pub kind: TableKind,
    pub update_type: UpdateType,
    pub row: Row,
    pub origin: UpdateOrigin,
}

impl FeedUpdate {
    /// Mutation pushed by the venue
    pub fn server(update_type: UpdateType, row: Row) -> Self {
        Self {
            kind: row.kind(),
            update_type,
            row,
            origin: UpdateOrigin::Server,
        }
    }

    /// Mutation synthesized by the terminal
    pub fn local(update_type: UpdateType, row: Row) -> Self {
        Self {
            kind: row.kind(),
            update_type,
            row,
            origin: UpdateOrigin::Local,
        }
    }
}

/// Subscriber to batch bracket markers
pub trait UpdatesProcessListener: Send + Sync {
    fn on_updates_process_status(&self, status: UpdatesProcessStatus);
}

struct UpdateGate {
    locked: bool,
    pending: Vec<FeedUpdate>,
}

/// Owns the seven tables of one trading session
pub struct TableManager {
    offers: Arc<Table<OfferRow>>,
    accounts: Arc<Table<AccountRow>>,
    orders: Arc<Table<OrderRow>>,
    trades: Arc<Table<TradeRow>>,
    closed_trades: Arc<Table<ClosedTradeRow>>,
    messages: Arc<Table<MessageRow>>,
    summary: Arc<Table<SummaryRow>>,
    /// Serializes batches so marker brackets never interleave
    batch_gate: Mutex<()>,
    gate: Mutex<UpdateGate>,
    all_queues: Mutex<Vec<Weak<AllEventQueue>>>,
    process_listeners: Mutex<Vec<Arc<dyn UpdatesProcessListener>>>,
    status: Mutex<TableManagerStatus>,
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TableManager {
    pub fn new() -> Self {
        Self {
            offers: Arc::new(Table::new()),
            accounts: Arc::new(Table::new()),
            orders: Arc::new(Table::new()),
            trades: Arc::new(Table::new()),
            closed_trades: Arc::new(Table::new()),
            messages: Arc::new(Table::new()),
            summary: Arc::new(Table::new()),
            batch_gate: Mutex::new(()),
            gate: Mutex::new(UpdateGate {
                locked: false,
                pending: Vec::new(),
            }),
            all_queues: Mutex::new(Vec::new()),
            process_listeners: Mutex::new(Vec::new()),
            status: Mutex::new(TableManagerStatus::TablesLoading),
        }
    }

    pub fn offers(&self) -> &Arc<Table<OfferRow>> {
        &self.offers
    }

    pub fn accounts(&self) -> &Arc<Table<AccountRow>> {
        &self.accounts
    }

    pub fn orders(&self) -> &Arc<Table<OrderRow>> {
        &self.orders
    }

    pub fn trades(&self) -> &Arc<Table<TradeRow>> {
        &self.trades
    }

    pub fn closed_trades(&self) -> &Arc<Table<ClosedTradeRow>> {
        &self.closed_trades
    }

    pub fn messages(&self) -> &Arc<Table<MessageRow>> {
        &self.messages
    }

    pub fn summary(&self) -> &Arc<Table<SummaryRow>> {
        &self.summary
    }

    /// Aggregate load status
    pub fn status(&self) -> TableManagerStatus {
        *self.status.lock()
    }

    /// Refresh status of one table
    pub fn table_status(&self, kind: TableKind) -> TableStatus {
        match kind {
            TableKind::Offers => self.offers.status(),
            TableKind::Accounts => self.accounts.status(),
            TableKind::Orders => self.orders.status(),
            TableKind::Trades => self.trades.status(),
            TableKind::ClosedTrades => self.closed_trades.status(),
            TableKind::Messages => self.messages.status(),
            TableKind::Summary => self.summary.status(),
        }
    }

    /// Row count of one table
    pub fn table_size(&self, kind: TableKind) -> usize {
        match kind {
            TableKind::Offers => self.offers.size(),
            TableKind::Accounts => self.accounts.size(),
            TableKind::Orders => self.orders.size(),
            TableKind::Trades => self.trades.size(),
            TableKind::ClosedTrades => self.closed_trades.size(),
            TableKind::Messages => self.messages.size(),
            TableKind::Summary => self.summary.size(),
        }
    }

    /// Drive one table's refresh status from the session layer and recompute
    /// the aggregate
    pub fn set_table_status(&self, kind: TableKind, status: TableStatus) {
        match kind {
            TableKind::Offers => self.offers.set_status(status),
            TableKind::Accounts => self.accounts.set_status(status),
            TableKind::Orders => self.orders.set_status(status),
            TableKind::Trades => self.trades.set_status(status),
            TableKind::ClosedTrades => self.closed_trades.set_status(status),
            TableKind::Messages => self.messages.set_status(status),
            TableKind::Summary => self.summary.set_status(status),
        }
        self.recompute_status();
    }

    fn recompute_status(&self) {
        let mut status = self.status.lock();
        if status.is_terminal() {
            return;
        }
        let statuses: Vec<TableStatus> =
            TableKind::ALL.iter().map(|k| self.table_status(*k)).collect();
        if statuses.contains(&TableStatus::Failed) {
            *status = TableManagerStatus::TablesLoadFailed;
            info!("table load failed");
        } else if statuses.iter().all(|s| *s == TableStatus::Refreshed) {
            *status = TableManagerStatus::TablesLoaded;
            info!("all tables loaded");
        }
    }

    /// Apply one feed mutation, or buffer it while updates are locked.
    ///
    /// Emits no markers; grouped venue responses go through [`apply_batch`].
    ///
    /// [`apply_batch`]: TableManager::apply_batch
    pub fn apply_update(&self, update: FeedUpdate) -> Result<(), TableError> {
        {
            let mut gate = self.gate.lock();
            if gate.locked {
                gate.pending.push(update);
                return Ok(());
            }
        }
        let _batch = self.batch_gate.lock();
        self.route(update).map(|_| ())
    }

    /// Apply a grouped venue response atomically with respect to other
    /// batches, bracketed by Begin/End markers on the manager-wide queue.
    ///
    /// A schema error inside the batch is reported after the remaining
    /// mutations were still applied; the bracket is always closed.
    pub fn apply_batch(&self, updates: Vec<FeedUpdate>) -> Result<(), TableError> {
        {
            let mut gate = self.gate.lock();
            if gate.locked {
                gate.pending.extend(updates);
                return Ok(());
            }
        }
        let _batch = self.batch_gate.lock();
        self.run_batch(updates)
    }

    fn run_batch(&self, updates: Vec<FeedUpdate>) -> Result<(), TableError> {
        if updates.is_empty() {
            return Ok(());
        }
        self.emit_marker(UpdatesProcessStatus::BeginTablesUpdate);
        let mut first_error = None;
        for update in updates {
            if let Err(e) = self.route(update) {
                error!(error = %e, "batched update failed");
                first_error.get_or_insert(e);
            }
        }
        self.emit_marker(UpdatesProcessStatus::EndTablesUpdate);
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Buffer incoming mutations until [`unlock_updates`] is called.
    ///
    /// Readers get a fully consistent cross-table view for the duration; the
    /// feed is never blocked, only deferred.
    ///
    /// [`unlock_updates`]: TableManager::unlock_updates
    pub fn lock_updates(&self) {
        let mut gate = self.gate.lock();
        if !gate.locked {
            gate.locked = true;
            debug!("table updates locked");
        }
    }

    /// Apply everything buffered during the lock window as one bracketed
    /// batch. Schema errors in deferred mutations are logged, not returned:
    /// the producer that would have received them is no longer on the stack.
    pub fn unlock_updates(&self) {
        let mut gate = self.gate.lock();
        if !gate.locked {
            return;
        }
        // Batch gate is taken while still holding the update gate (the order
        // is gate, then batch gate, everywhere), so nothing slips between
        // unlocking and draining.
        let _batch = self.batch_gate.lock();
        gate.locked = false;
        let pending = std::mem::take(&mut gate.pending);
        drop(gate);
        debug!(deferred = pending.len(), "table updates unlocked");
        if !pending.is_empty() {
            if let Err(e) = self.run_batch(pending) {
                error!(error = %e, "deferred batch reported schema errors");
            }
        }
    }

    fn route(&self, update: FeedUpdate) -> Result<(), TableError> {
        if update.row.kind() != update.kind {
            return Err(TableError::KindMismatch {
                expected: update.kind,
                actual: update.row.kind(),
            });
        }
        match update.kind {
            TableKind::Offers => self.apply_to(&self.offers, update),
            TableKind::Accounts => self.apply_to(&self.accounts, update),
            TableKind::Orders => self.apply_to(&self.orders, update),
            TableKind::Trades => self.apply_to(&self.trades, update),
            TableKind::ClosedTrades => self.apply_to(&self.closed_trades, update),
            TableKind::Messages => self.apply_to(&self.messages, update),
            TableKind::Summary => self.apply_to(&self.summary, update),
        }
    }

    fn apply_to<R: TableRow>(
        &self,
        table: &Arc<Table<R>>,
        update: FeedUpdate,
    ) -> Result<(), TableError> {
        let actual = update.row.kind();
        let row = R::from_row(update.row).ok_or(TableError::KindMismatch {
            expected: R::KIND,
            actual,
        })?;
        table.apply(update.update_type, row, update.origin).map(|_| ())
    }

    /// New manager-wide queue receiving every event of all seven tables plus
    /// Begin/End markers, in application order
    pub fn tables_update_queue(&self, need_copy: bool) -> Arc<AllEventQueue> {
        let queue = AllEventQueue::new(None, need_copy);
        self.all_queues.lock().push(Arc::downgrade(&queue));
        self.offers.attach_all_queue(&queue);
        self.accounts.attach_all_queue(&queue);
        self.orders.attach_all_queue(&queue);
        self.trades.attach_all_queue(&queue);
        self.closed_trades.attach_all_queue(&queue);
        self.messages.attach_all_queue(&queue);
        self.summary.attach_all_queue(&queue);
        queue
    }

    /// Subscribe to Begin/End batch markers
    pub fn subscribe_updates_process_status(&self, listener: Arc<dyn UpdatesProcessListener>) {
        self.process_listeners.lock().push(listener);
    }

    /// Unsubscribe a handle previously passed to
    /// `subscribe_updates_process_status`
    pub fn unsubscribe_updates_process_status(&self, listener: &Arc<dyn UpdatesProcessListener>) {
        self.process_listeners
            .lock()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    fn emit_marker(&self, status: UpdatesProcessStatus) {
        let queues = {
            let mut registrations = self.all_queues.lock();
            let mut live = Vec::with_capacity(registrations.len());
            registrations.retain(|weak| match weak.upgrade() {
                Some(strong) => {
                    live.push(strong);
                    true
                }
                None => false,
            });
            live
        };
        for queue in &queues {
            queue.push_marker(status);
        }
        let listeners = self.process_listeners.lock().clone();
        for listener in &listeners {
            if catch_unwind(AssertUnwindSafe(|| listener.on_updates_process_status(status)))
                .is_err()
            {
                error!(?status, "process-status listener panicked; listener isolated");
            }
        }
    }
}

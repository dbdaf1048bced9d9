//! Table synchronization engine
//!
//! Maintains a client-side, in-memory mirror of the venue's relational state
//! (offers, accounts, orders, trades, closed trades, messages, summaries) and
//! dispatches ordered change notifications without blocking the feed thread.
//!
//! The feed delivers `(TableKind, UpdateType, Row)` mutations already parsed
//! from the wire; the [`TableManager`] routes each one to its [`Table`], which
//! applies it, tracks changed cells, and fans the event out to synchronous
//! listeners, per-update-type queues, and the manager-wide all-events queue.
//! Readers iterate and query tables concurrently with mutation; rows handed
//! out are immutable snapshots.
//!
//! # Modules
//! - `table`: the per-kind mirrored table
//! - `queue`: blocking MPMC event queues (typed and all-events)
//! - `listeners`: synchronous push notification
//! - `manager`: the seven-table owner, batching and aggregate status
//! - `query`: column predicates for filtered iteration
//! - `cursor`: resumable row cursors

pub mod cursor;
pub mod event;
pub mod listeners;
pub mod manager;
pub mod query;
pub mod queue;
pub mod table;

pub use cursor::RowCursor;
pub use event::{AllEvent, AppliedUpdate, RowEvent};
pub use listeners::TableListener;
pub use manager::{FeedUpdate, TableManager, UpdatesProcessListener};
pub use query::{Condition, LogicOp, RelationalOp, RowFilter};
pub use queue::{AllEventQueue, QueuePutListener, UpdateEventQueue};
pub use table::Table;

// Re-export the schema crate so downstream callers need a single dependency.
pub use types;

//! Shared enumerations for the table mirror
//!
//! Wire ids match the venue protocol and never change meaning across a
//! deployment; adding a variant appends a new id.

use crate::errors::TableError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven mirrored table kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Offers,
    Accounts,
    Orders,
    Trades,
    ClosedTrades,
    Messages,
    Summary,
}

impl TableKind {
    /// All kinds, in wire-id order
    pub const ALL: [TableKind; 7] = [
        TableKind::Offers,
        TableKind::Accounts,
        TableKind::Orders,
        TableKind::Trades,
        TableKind::ClosedTrades,
        TableKind::Messages,
        TableKind::Summary,
    ];

    /// Get the wire id
    pub fn wire_id(&self) -> i32 {
        match self {
            TableKind::Offers => 0,
            TableKind::Accounts => 1,
            TableKind::Orders => 2,
            TableKind::Trades => 3,
            TableKind::ClosedTrades => 4,
            TableKind::Messages => 5,
            TableKind::Summary => 6,
        }
    }

    /// String label for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Offers => "Offers",
            TableKind::Accounts => "Accounts",
            TableKind::Orders => "Orders",
            TableKind::Trades => "Trades",
            TableKind::ClosedTrades => "ClosedTrades",
            TableKind::Messages => "Messages",
            TableKind::Summary => "Summary",
        }
    }
}

impl TryFrom<i32> for TableKind {
    type Error = TableError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TableKind::Offers),
            1 => Ok(TableKind::Accounts),
            2 => Ok(TableKind::Orders),
            3 => Ok(TableKind::Trades),
            4 => Ok(TableKind::ClosedTrades),
            5 => Ok(TableKind::Messages),
            6 => Ok(TableKind::Summary),
            other => Err(TableError::InvalidTableKind { value: other }),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-row mutation type pushed by the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateType {
    Insert,
    Update,
    Delete,
}

impl UpdateType {
    pub const ALL: [UpdateType; 3] = [UpdateType::Insert, UpdateType::Update, UpdateType::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Insert => "Insert",
            UpdateType::Update => "Update",
            UpdateType::Delete => "Delete",
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-table refresh status
///
/// `Initial → Refreshing → Refreshed | Failed`. Once `Refreshed`, row
/// mutations never change the status; `Failed` is terminal for the table's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableStatus {
    Initial,
    Refreshing,
    Refreshed,
    Failed,
}

impl TableStatus {
    /// Whether the table finished its initial load (successfully or not)
    pub fn is_settled(&self) -> bool {
        matches!(self, TableStatus::Refreshed | TableStatus::Failed)
    }
}

/// Aggregate load status across all seven tables
///
/// Moves monotonically from `TablesLoading` to one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableManagerStatus {
    TablesLoading,
    TablesLoaded,
    TablesLoadFailed,
}

impl TableManagerStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TableManagerStatus::TablesLoading)
    }
}

/// Batch bracket markers on the manager-wide event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdatesProcessStatus {
    BeginTablesUpdate,
    EndTablesUpdate,
}

/// Controls whether locally-synthesized events are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableEventsFilter {
    /// Surface both server-pushed and locally-synthesized events
    AllEvents,
    /// Surface server-pushed events only
    ServerOnly,
}

/// Where a mutation originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateOrigin {
    /// Pushed by the venue feed
    Server,
    /// Synthesized by the terminal (e.g. derived-column recalculation)
    Local,
}

/// Order/position side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Venue wire code ("B" / "S")
    pub fn as_code(&self) -> &'static str {
        match self {
            Side::Buy => "B",
            Side::Sell => "S",
        }
    }
}

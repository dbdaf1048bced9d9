//! The `Row` tagged union and the `TableRow` trait
//!
//! A row is an immutable value snapshot: the engine replaces the whole row on
//! update and hands out the last-known value on delete, so a row held by a
//! consumer never observes later table mutations.

use crate::account::AccountRow;
use crate::cell::Cell;
use crate::closed_trade::ClosedTradeRow;
use crate::enums::TableKind;
use crate::message::MessageRow;
use crate::offer::OfferRow;
use crate::order::OrderRow;
use crate::summary::SummaryRow;
use crate::trade::TradeRow;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Common surface of the seven row kinds.
///
/// `Field` is the kind's column enum; `FIELDS` enumerates every column in
/// layout order, which is what generic changed-cell detection iterates.
pub trait TableRow: Clone + Debug + Send + Sync + Sized + 'static {
    /// Column identifier for this kind
    type Field: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// The table this row kind belongs to
    const KIND: TableKind;

    /// Every column, in layout order (append-only across deployments)
    const FIELDS: &'static [Self::Field];

    /// The venue-assigned key, unique within the table
    fn row_id(&self) -> &str;

    /// Read one cell; `None` means the cell is not set
    fn cell(&self, field: Self::Field) -> Option<Cell>;

    /// Wrap into the kind-erased union
    fn into_row(self) -> Row;

    /// Unwrap from the kind-erased union
    fn from_row(row: Row) -> Option<Self>;

    /// Borrow from the kind-erased union
    fn as_row(row: &Row) -> Option<&Self>;

    /// Columns whose values differ between two row snapshots
    fn changed_fields(previous: &Self, current: &Self) -> Vec<Self::Field> {
        Self::FIELDS
            .iter()
            .copied()
            .filter(|f| previous.cell(*f) != current.cell(*f))
            .collect()
    }
}

/// Kind-erased row, as carried by the feed and the all-events queues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table")]
pub enum Row {
    Offer(OfferRow),
    Account(AccountRow),
    Order(OrderRow),
    Trade(TradeRow),
    ClosedTrade(ClosedTradeRow),
    Message(MessageRow),
    Summary(SummaryRow),
}

impl Row {
    /// The table kind this row belongs to
    pub fn kind(&self) -> TableKind {
        match self {
            Row::Offer(_) => TableKind::Offers,
            Row::Account(_) => TableKind::Accounts,
            Row::Order(_) => TableKind::Orders,
            Row::Trade(_) => TableKind::Trades,
            Row::ClosedTrade(_) => TableKind::ClosedTrades,
            Row::Message(_) => TableKind::Messages,
            Row::Summary(_) => TableKind::Summary,
        }
    }

    /// The venue-assigned key
    pub fn row_id(&self) -> &str {
        match self {
            Row::Offer(r) => r.row_id(),
            Row::Account(r) => r.row_id(),
            Row::Order(r) => r.row_id(),
            Row::Trade(r) => r.row_id(),
            Row::ClosedTrade(r) => r.row_id(),
            Row::Message(r) => r.row_id(),
            Row::Summary(r) => r.row_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_row_kind_and_id() {
        let mut account = AccountRow::new("A1");
        account.balance = Some(Decimal::from(1000));
        let row = account.into_row();

        assert_eq!(row.kind(), TableKind::Accounts);
        assert_eq!(row.row_id(), "A1");
    }

    #[test]
    fn test_peel_matches_kind() {
        let row = OfferRow::new("EUR/USD").into_row();
        assert!(OfferRow::as_row(&row).is_some());
        assert!(AccountRow::as_row(&row).is_none());
        assert!(OfferRow::from_row(row).is_some());
    }

    #[test]
    fn test_changed_fields_detects_diff() {
        let mut before = AccountRow::new("A1");
        before.balance = Some(Decimal::from(1000));

        let mut after = before.clone();
        after.balance = Some(Decimal::from(1200));
        after.day_pl = Some(Decimal::from(200));

        let changed = AccountRow::changed_fields(&before, &after);
        assert!(changed.contains(&crate::account::AccountField::Balance));
        assert!(changed.contains(&crate::account::AccountField::DayPl));
        assert!(!changed.contains(&crate::account::AccountField::AccountName));
    }
}

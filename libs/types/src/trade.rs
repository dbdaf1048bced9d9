//! Trades (open positions) table row
//!
//! `pl`, `gross_pl`, `close_rate`, `stop` and `limit` are table columns the
//! terminal refreshes as the paired offer ticks.

use crate::cell::Cell;
use crate::enums::{Side, TableKind};
use crate::ids::{AccountId, OfferId, OrderId, RequestId, TradeId};
use crate::row::{Row, TableRow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Addressable columns of a Trades row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeField {
    TradeId,
    AccountId,
    AccountName,
    AccountKind,
    OfferId,
    Amount,
    Side,
    OpenRate,
    OpenTime,
    OpenQuoteId,
    OpenOrderId,
    OpenOrderReqId,
    Commission,
    RolloverInterest,
    TradeIdOrigin,
    UsedMargin,
    ValueDate,
    Parties,
    Pl,
    GrossPl,
    CloseRate,
    Stop,
    Limit,
}

/// One Trades row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRow {
    pub trade_id: TradeId,
    pub account_id: Option<AccountId>,
    pub account_name: Option<String>,
    pub account_kind: Option<String>,
    pub offer_id: Option<OfferId>,
    pub amount: Option<Decimal>,
    pub side: Option<Side>,
    pub open_rate: Option<Decimal>,
    pub open_time: Option<DateTime<Utc>>,
    pub open_quote_id: Option<String>,
    pub open_order_id: Option<OrderId>,
    pub open_order_req_id: Option<RequestId>,
    pub commission: Option<Decimal>,
    pub rollover_interest: Option<Decimal>,
    pub trade_id_origin: Option<TradeId>,
    pub used_margin: Option<Decimal>,
    pub value_date: Option<String>,
    pub parties: Option<String>,
    /// Table column: floating profit/loss in pips
    pub pl: Option<Decimal>,
    /// Table column: floating profit/loss in account currency
    pub gross_pl: Option<Decimal>,
    /// Table column: current rate the position would close at
    pub close_rate: Option<Decimal>,
    /// Table column: rate of the associated stop order, if any
    pub stop: Option<Decimal>,
    /// Table column: rate of the associated limit order, if any
    pub limit: Option<Decimal>,
}

impl TradeRow {
    /// Create a row with only the key set
    pub fn new(trade_id: impl Into<TradeId>) -> Self {
        Self {
            trade_id: trade_id.into(),
            account_id: None,
            account_name: None,
            account_kind: None,
            offer_id: None,
            amount: None,
            side: None,
            open_rate: None,
            open_time: None,
            open_quote_id: None,
            open_order_id: None,
            open_order_req_id: None,
            commission: None,
            rollover_interest: None,
            trade_id_origin: None,
            used_margin: None,
            value_date: None,
            parties: None,
            pl: None,
            gross_pl: None,
            close_rate: None,
            stop: None,
            limit: None,
        }
    }
}

impl TableRow for TradeRow {
    type Field = TradeField;

    const KIND: TableKind = TableKind::Trades;

    const FIELDS: &'static [TradeField] = &[
        TradeField::TradeId,
        TradeField::AccountId,
        TradeField::AccountName,
        TradeField::AccountKind,
        TradeField::OfferId,
        TradeField::Amount,
        TradeField::Side,
        TradeField::OpenRate,
        TradeField::OpenTime,
        TradeField::OpenQuoteId,
        TradeField::OpenOrderId,
        TradeField::OpenOrderReqId,
        TradeField::Commission,
        TradeField::RolloverInterest,
        TradeField::TradeIdOrigin,
        TradeField::UsedMargin,
        TradeField::ValueDate,
        TradeField::Parties,
        TradeField::Pl,
        TradeField::GrossPl,
        TradeField::CloseRate,
        TradeField::Stop,
        TradeField::Limit,
    ];

    fn row_id(&self) -> &str {
        self.trade_id.as_str()
    }

    fn cell(&self, field: TradeField) -> Option<Cell> {
        match field {
            TradeField::TradeId => Some(Cell::Text(self.trade_id.as_str().to_string())),
            TradeField::AccountId => {
                self.account_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            TradeField::AccountName => self.account_name.clone().map(Cell::Text),
            TradeField::AccountKind => self.account_kind.clone().map(Cell::Text),
            TradeField::OfferId => {
                self.offer_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            TradeField::Amount => self.amount.map(Cell::Decimal),
            TradeField::Side => self.side.map(|s| Cell::Text(s.as_code().to_string())),
            TradeField::OpenRate => self.open_rate.map(Cell::Decimal),
            TradeField::OpenTime => self.open_time.map(Cell::Time),
            TradeField::OpenQuoteId => self.open_quote_id.clone().map(Cell::Text),
            TradeField::OpenOrderId => {
                self.open_order_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            TradeField::OpenOrderReqId => {
                self.open_order_req_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            TradeField::Commission => self.commission.map(Cell::Decimal),
            TradeField::RolloverInterest => self.rollover_interest.map(Cell::Decimal),
            TradeField::TradeIdOrigin => {
                self.trade_id_origin.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            TradeField::UsedMargin => self.used_margin.map(Cell::Decimal),
            TradeField::ValueDate => self.value_date.clone().map(Cell::Text),
            TradeField::Parties => self.parties.clone().map(Cell::Text),
            TradeField::Pl => self.pl.map(Cell::Decimal),
            TradeField::GrossPl => self.gross_pl.map(Cell::Decimal),
            TradeField::CloseRate => self.close_rate.map(Cell::Decimal),
            TradeField::Stop => self.stop.map(Cell::Decimal),
            TradeField::Limit => self.limit.map(Cell::Decimal),
        }
    }

    fn into_row(self) -> Row {
        Row::Trade(self)
    }

    fn from_row(row: Row) -> Option<Self> {
        match row {
            Row::Trade(r) => Some(r),
            _ => None,
        }
    }

    fn as_row(row: &Row) -> Option<&Self> {
        match row {
            Row::Trade(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_refresh_touches_derived_columns_only() {
        let mut before = TradeRow::new("T-1");
        before.open_rate = Some("1.0930".parse().unwrap());
        before.gross_pl = Some("12.50".parse().unwrap());
        before.close_rate = Some("1.0941".parse().unwrap());

        let mut after = before.clone();
        after.gross_pl = Some("14.00".parse().unwrap());
        after.close_rate = Some("1.0943".parse().unwrap());

        let changed = TradeRow::changed_fields(&before, &after);
        assert_eq!(changed, vec![TradeField::GrossPl, TradeField::CloseRate]);
    }
}

//! ClosedTrades table row
//!
//! One row per position closed during the current trading day. Shares its key
//! space with the Trades table (`trade_id_remain` links a partial close back
//! to the surviving open position).

use crate::cell::Cell;
use crate::enums::{Side, TableKind};
use crate::ids::{AccountId, OfferId, OrderId, RequestId, TradeId};
use crate::row::{Row, TableRow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Addressable columns of a ClosedTrades row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosedTradeField {
    TradeId,
    AccountId,
    AccountName,
    AccountKind,
    OfferId,
    Amount,
    Side,
    GrossPl,
    Commission,
    RolloverInterest,
    OpenRate,
    OpenQuoteId,
    OpenTime,
    OpenOrderId,
    OpenOrderReqId,
    CloseRate,
    CloseQuoteId,
    CloseTime,
    CloseOrderId,
    CloseOrderReqId,
    TradeIdOrigin,
    TradeIdRemain,
    ValueDate,
    NetPl,
}

/// One ClosedTrades row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTradeRow {
    pub trade_id: TradeId,
    pub account_id: Option<AccountId>,
    pub account_name: Option<String>,
    pub account_kind: Option<String>,
    pub offer_id: Option<OfferId>,
    pub amount: Option<Decimal>,
    pub side: Option<Side>,
    pub gross_pl: Option<Decimal>,
    pub commission: Option<Decimal>,
    pub rollover_interest: Option<Decimal>,
    pub open_rate: Option<Decimal>,
    pub open_quote_id: Option<String>,
    pub open_time: Option<DateTime<Utc>>,
    pub open_order_id: Option<OrderId>,
    pub open_order_req_id: Option<RequestId>,
    pub close_rate: Option<Decimal>,
    pub close_quote_id: Option<String>,
    pub close_time: Option<DateTime<Utc>>,
    pub close_order_id: Option<OrderId>,
    pub close_order_req_id: Option<RequestId>,
    pub trade_id_origin: Option<TradeId>,
    pub trade_id_remain: Option<TradeId>,
    pub value_date: Option<String>,
    /// Table column: gross P/L net of commission and rollover
    pub net_pl: Option<Decimal>,
}

impl ClosedTradeRow {
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
            gross_pl: None,
            commission: None,
            rollover_interest: None,
            open_rate: None,
            open_quote_id: None,
            open_time: None,
            open_order_id: None,
            open_order_req_id: None,
            close_rate: None,
            close_quote_id: None,
            close_time: None,
            close_order_id: None,
            close_order_req_id: None,
            trade_id_origin: None,
            trade_id_remain: None,
            value_date: None,
            net_pl: None,
        }
    }
}

impl TableRow for ClosedTradeRow {
    type Field = ClosedTradeField;

    const KIND: TableKind = TableKind::ClosedTrades;

    const FIELDS: &'static [ClosedTradeField] = &[
        ClosedTradeField::TradeId,
        ClosedTradeField::AccountId,
        ClosedTradeField::AccountName,
        ClosedTradeField::AccountKind,
        ClosedTradeField::OfferId,
        ClosedTradeField::Amount,
        ClosedTradeField::Side,
        ClosedTradeField::GrossPl,
        ClosedTradeField::Commission,
        ClosedTradeField::RolloverInterest,
        ClosedTradeField::OpenRate,
        ClosedTradeField::OpenQuoteId,
        ClosedTradeField::OpenTime,
        ClosedTradeField::OpenOrderId,
        ClosedTradeField::OpenOrderReqId,
        ClosedTradeField::CloseRate,
        ClosedTradeField::CloseQuoteId,
        ClosedTradeField::CloseTime,
        ClosedTradeField::CloseOrderId,
        ClosedTradeField::CloseOrderReqId,
        ClosedTradeField::TradeIdOrigin,
        ClosedTradeField::TradeIdRemain,
        ClosedTradeField::ValueDate,
        ClosedTradeField::NetPl,
    ];

    fn row_id(&self) -> &str {
        self.trade_id.as_str()
    }

    fn cell(&self, field: ClosedTradeField) -> Option<Cell> {
        match field {
            ClosedTradeField::TradeId => Some(Cell::Text(self.trade_id.as_str().to_string())),
            ClosedTradeField::AccountId => {
                self.account_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            ClosedTradeField::AccountName => self.account_name.clone().map(Cell::Text),
            ClosedTradeField::AccountKind => self.account_kind.clone().map(Cell::Text),
            ClosedTradeField::OfferId => {
                self.offer_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            ClosedTradeField::Amount => self.amount.map(Cell::Decimal),
            ClosedTradeField::Side => self.side.map(|s| Cell::Text(s.as_code().to_string())),
            ClosedTradeField::GrossPl => self.gross_pl.map(Cell::Decimal),
            ClosedTradeField::Commission => self.commission.map(Cell::Decimal),
            ClosedTradeField::RolloverInterest => self.rollover_interest.map(Cell::Decimal),
            ClosedTradeField::OpenRate => self.open_rate.map(Cell::Decimal),
            ClosedTradeField::OpenQuoteId => self.open_quote_id.clone().map(Cell::Text),
            ClosedTradeField::OpenTime => self.open_time.map(Cell::Time),
            ClosedTradeField::OpenOrderId => {
                self.open_order_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            ClosedTradeField::OpenOrderReqId => {
                self.open_order_req_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            ClosedTradeField::CloseRate => self.close_rate.map(Cell::Decimal),
            ClosedTradeField::CloseQuoteId => self.close_quote_id.clone().map(Cell::Text),
            ClosedTradeField::CloseTime => self.close_time.map(Cell::Time),
            ClosedTradeField::CloseOrderId => {
                self.close_order_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            ClosedTradeField::CloseOrderReqId => {
                self.close_order_req_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            ClosedTradeField::TradeIdOrigin => {
                self.trade_id_origin.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            ClosedTradeField::TradeIdRemain => {
                self.trade_id_remain.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            ClosedTradeField::ValueDate => self.value_date.clone().map(Cell::Text),
            ClosedTradeField::NetPl => self.net_pl.map(Cell::Decimal),
        }
    }

    fn into_row(self) -> Row {
        Row::ClosedTrade(self)
    }

    fn from_row(row: Row) -> Option<Self> {
        match row {
            Row::ClosedTrade(r) => Some(r),
            _ => None,
        }
    }

    fn as_row(row: &Row) -> Option<&Self> {
        match row {
            Row::ClosedTrade(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_close_links() {
        let mut row = ClosedTradeRow::new("T-9");
        row.trade_id_origin = Some(TradeId::new("T-1"));
        row.trade_id_remain = Some(TradeId::new("T-10"));

        assert_eq!(row.row_id(), "T-9");
        assert_eq!(
            row.cell(ClosedTradeField::TradeIdRemain),
            Some(Cell::Text("T-10".to_string()))
        );
    }
}

//! Summary table row
//!
//! Per-instrument aggregation over the open positions of the session's
//! accounts, keyed by offer. Every column except the key is terminal-derived.

use crate::cell::Cell;
use crate::enums::TableKind;
use crate::ids::OfferId;
use crate::row::{Row, TableRow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Addressable columns of a Summary row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryField {
    OfferId,
    Instrument,
    DefaultSortOrder,
    SellNetPl,
    SellAmount,
    SellAvgOpen,
    SellClose,
    BuyNetPl,
    BuyAmount,
    BuyAvgOpen,
    BuyClose,
    Amount,
    GrossPl,
    NetPl,
}

/// One Summary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub offer_id: OfferId,
    pub instrument: Option<String>,
    pub default_sort_order: Option<i32>,
    pub sell_net_pl: Option<Decimal>,
    pub sell_amount: Option<Decimal>,
    pub sell_avg_open: Option<Decimal>,
    pub sell_close: Option<Decimal>,
    pub buy_net_pl: Option<Decimal>,
    pub buy_amount: Option<Decimal>,
    pub buy_avg_open: Option<Decimal>,
    pub buy_close: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub gross_pl: Option<Decimal>,
    pub net_pl: Option<Decimal>,
}

impl SummaryRow {
    /// Create a row with only the key set
    pub fn new(offer_id: impl Into<OfferId>) -> Self {
        Self {
            offer_id: offer_id.into(),
            instrument: None,
            default_sort_order: None,
            sell_net_pl: None,
            sell_amount: None,
            sell_avg_open: None,
            sell_close: None,
            buy_net_pl: None,
            buy_amount: None,
            buy_avg_open: None,
            buy_close: None,
            amount: None,
            gross_pl: None,
            net_pl: None,
        }
    }
}

impl TableRow for SummaryRow {
    type Field = SummaryField;

    const KIND: TableKind = TableKind::Summary;

    const FIELDS: &'static [SummaryField] = &[
        SummaryField::OfferId,
        SummaryField::Instrument,
        SummaryField::DefaultSortOrder,
        SummaryField::SellNetPl,
        SummaryField::SellAmount,
        SummaryField::SellAvgOpen,
        SummaryField::SellClose,
        SummaryField::BuyNetPl,
        SummaryField::BuyAmount,
        SummaryField::BuyAvgOpen,
        SummaryField::BuyClose,
        SummaryField::Amount,
        SummaryField::GrossPl,
        SummaryField::NetPl,
    ];

    fn row_id(&self) -> &str {
        self.offer_id.as_str()
    }

    fn cell(&self, field: SummaryField) -> Option<Cell> {
        match field {
            SummaryField::OfferId => Some(Cell::Text(self.offer_id.as_str().to_string())),
            SummaryField::Instrument => self.instrument.clone().map(Cell::Text),
            SummaryField::DefaultSortOrder => {
                self.default_sort_order.map(|v| Cell::Int(v as i64))
            }
            SummaryField::SellNetPl => self.sell_net_pl.map(Cell::Decimal),
            SummaryField::SellAmount => self.sell_amount.map(Cell::Decimal),
            SummaryField::SellAvgOpen => self.sell_avg_open.map(Cell::Decimal),
            SummaryField::SellClose => self.sell_close.map(Cell::Decimal),
            SummaryField::BuyNetPl => self.buy_net_pl.map(Cell::Decimal),
            SummaryField::BuyAmount => self.buy_amount.map(Cell::Decimal),
            SummaryField::BuyAvgOpen => self.buy_avg_open.map(Cell::Decimal),
            SummaryField::BuyClose => self.buy_close.map(Cell::Decimal),
            SummaryField::Amount => self.amount.map(Cell::Decimal),
            SummaryField::GrossPl => self.gross_pl.map(Cell::Decimal),
            SummaryField::NetPl => self.net_pl.map(Cell::Decimal),
        }
    }

    fn into_row(self) -> Row {
        Row::Summary(self)
    }

    fn from_row(row: Row) -> Option<Self> {
        match row {
            Row::Summary(r) => Some(r),
            _ => None,
        }
    }

    fn as_row(row: &Row) -> Option<&Self> {
        match row {
            Row::Summary(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_keyed_by_offer() {
        let mut row = SummaryRow::new("EUR/USD");
        row.amount = Some(Decimal::from(200000));

        assert_eq!(row.row_id(), "EUR/USD");
        assert_eq!(
            row.cell(SummaryField::Amount),
            Some(Cell::Decimal(Decimal::from(200000)))
        );
    }
}

//! Offers table row
//!
//! One row per quoted instrument. Base columns mirror the venue quote push;
//! `pip_cost` is a table column the terminal maintains on the mirrored row
//! only.

use crate::cell::Cell;
use crate::enums::TableKind;
use crate::ids::OfferId;
use crate::row::{Row, TableRow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Addressable columns of an Offers row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferField {
    OfferId,
    Instrument,
    QuoteId,
    Bid,
    Ask,
    Low,
    High,
    Volume,
    Time,
    BidTradable,
    AskTradable,
    SellInterest,
    BuyInterest,
    ContractCurrency,
    Digits,
    PointSize,
    SubscriptionStatus,
    InstrumentType,
    ContractMultiplier,
    TradingStatus,
    ValueDate,
    PipCost,
}

/// One Offers row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRow {
    pub offer_id: OfferId,
    pub instrument: Option<String>,
    pub quote_id: Option<String>,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub low: Option<Decimal>,
    pub high: Option<Decimal>,
    pub volume: Option<i64>,
    pub time: Option<DateTime<Utc>>,
    pub bid_tradable: Option<bool>,
    pub ask_tradable: Option<bool>,
    pub sell_interest: Option<Decimal>,
    pub buy_interest: Option<Decimal>,
    pub contract_currency: Option<String>,
    pub digits: Option<i32>,
    pub point_size: Option<Decimal>,
    pub subscription_status: Option<String>,
    pub instrument_type: Option<i32>,
    pub contract_multiplier: Option<Decimal>,
    pub trading_status: Option<String>,
    pub value_date: Option<String>,
    /// Table column: cost of one pip per contract, in account currency
    pub pip_cost: Option<Decimal>,
}

impl OfferRow {
    /// Create a row with only the key set
    pub fn new(offer_id: impl Into<OfferId>) -> Self {
        Self {
            offer_id: offer_id.into(),
            instrument: None,
            quote_id: None,
            bid: None,
            ask: None,
            low: None,
            high: None,
            volume: None,
            time: None,
            bid_tradable: None,
            ask_tradable: None,
            sell_interest: None,
            buy_interest: None,
            contract_currency: None,
            digits: None,
            point_size: None,
            subscription_status: None,
            instrument_type: None,
            contract_multiplier: None,
            trading_status: None,
            value_date: None,
            pip_cost: None,
        }
    }
}

impl TableRow for OfferRow {
    type Field = OfferField;

    const KIND: TableKind = TableKind::Offers;

    const FIELDS: &'static [OfferField] = &[
        OfferField::OfferId,
        OfferField::Instrument,
        OfferField::QuoteId,
        OfferField::Bid,
        OfferField::Ask,
        OfferField::Low,
        OfferField::High,
        OfferField::Volume,
        OfferField::Time,
        OfferField::BidTradable,
        OfferField::AskTradable,
        OfferField::SellInterest,
        OfferField::BuyInterest,
        OfferField::ContractCurrency,
        OfferField::Digits,
        OfferField::PointSize,
        OfferField::SubscriptionStatus,
        OfferField::InstrumentType,
        OfferField::ContractMultiplier,
        OfferField::TradingStatus,
        OfferField::ValueDate,
        OfferField::PipCost,
    ];

    fn row_id(&self) -> &str {
        self.offer_id.as_str()
    }

    fn cell(&self, field: OfferField) -> Option<Cell> {
        match field {
            OfferField::OfferId => Some(Cell::Text(self.offer_id.as_str().to_string())),
            OfferField::Instrument => self.instrument.clone().map(Cell::Text),
            OfferField::QuoteId => self.quote_id.clone().map(Cell::Text),
            OfferField::Bid => self.bid.map(Cell::Decimal),
            OfferField::Ask => self.ask.map(Cell::Decimal),
            OfferField::Low => self.low.map(Cell::Decimal),
            OfferField::High => self.high.map(Cell::Decimal),
            OfferField::Volume => self.volume.map(Cell::Int),
            OfferField::Time => self.time.map(Cell::Time),
            OfferField::BidTradable => self.bid_tradable.map(Cell::Bool),
            OfferField::AskTradable => self.ask_tradable.map(Cell::Bool),
            OfferField::SellInterest => self.sell_interest.map(Cell::Decimal),
            OfferField::BuyInterest => self.buy_interest.map(Cell::Decimal),
            OfferField::ContractCurrency => self.contract_currency.clone().map(Cell::Text),
            OfferField::Digits => self.digits.map(|v| Cell::Int(v as i64)),
            OfferField::PointSize => self.point_size.map(Cell::Decimal),
            OfferField::SubscriptionStatus => self.subscription_status.clone().map(Cell::Text),
            OfferField::InstrumentType => self.instrument_type.map(|v| Cell::Int(v as i64)),
            OfferField::ContractMultiplier => self.contract_multiplier.map(Cell::Decimal),
            OfferField::TradingStatus => self.trading_status.clone().map(Cell::Text),
            OfferField::ValueDate => self.value_date.clone().map(Cell::Text),
            OfferField::PipCost => self.pip_cost.map(Cell::Decimal),
        }
    }

    fn into_row(self) -> Row {
        Row::Offer(self)
    }

    fn from_row(row: Row) -> Option<Self> {
        match row {
            Row::Offer(r) => Some(r),
            _ => None,
        }
    }

    fn as_row(row: &Row) -> Option<&Self> {
        match row {
            Row::Offer(r) => Some(r),
            _ => None,
        }
    }
}

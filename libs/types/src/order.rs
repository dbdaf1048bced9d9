//! Orders table row
//!
//! Base columns mirror the venue order record; `stop`/`limit` and the linked
//! order ids are table columns resolved from contingent orders client-side.

use crate::cell::Cell;
use crate::enums::{Side, TableKind};
use crate::ids::{AccountId, OfferId, OrderId, RequestId, TradeId};
use crate::row::{Row, TableRow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Addressable columns of an Orders row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderField {
    OrderId,
    RequestId,
    Rate,
    ExecutionRate,
    RateMin,
    RateMax,
    TradeId,
    AccountId,
    AccountName,
    OfferId,
    NetQuantity,
    Side,
    Stage,
    OrderType,
    Status,
    StatusTime,
    Amount,
    Lifetime,
    AtMarket,
    TrailStep,
    TrailRate,
    TimeInForce,
    RequestTxt,
    ContingentOrderId,
    ContingencyType,
    PrimaryId,
    OriginAmount,
    FilledAmount,
    WorkingIndicator,
    PegType,
    PegOffset,
    ExpireDate,
    ValueDate,
    Stop,
    Limit,
    StopOrderId,
    LimitOrderId,
}

/// One Orders row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_id: OrderId,
    pub request_id: Option<RequestId>,
    pub rate: Option<Decimal>,
    pub execution_rate: Option<Decimal>,
    pub rate_min: Option<Decimal>,
    pub rate_max: Option<Decimal>,
    pub trade_id: Option<TradeId>,
    pub account_id: Option<AccountId>,
    pub account_name: Option<String>,
    pub offer_id: Option<OfferId>,
    pub net_quantity: Option<bool>,
    pub side: Option<Side>,
    /// "O" opens a position, "C" closes one
    pub stage: Option<String>,
    /// Venue order-type code ("LE", "SE", "STE", "OM", ...)
    pub order_type: Option<String>,
    /// Venue order-status code ("W" waiting, "P" in process, ...)
    pub status: Option<String>,
    pub status_time: Option<DateTime<Utc>>,
    pub amount: Option<Decimal>,
    pub lifetime: Option<i32>,
    pub at_market: Option<Decimal>,
    pub trail_step: Option<i32>,
    pub trail_rate: Option<Decimal>,
    /// "GTC", "IOC", "FOK", "DAY" or "GTD"
    pub time_in_force: Option<String>,
    pub request_txt: Option<String>,
    pub contingent_order_id: Option<OrderId>,
    pub contingency_type: Option<i32>,
    pub primary_id: Option<OrderId>,
    pub origin_amount: Option<Decimal>,
    pub filled_amount: Option<Decimal>,
    pub working_indicator: Option<bool>,
    pub peg_type: Option<String>,
    pub peg_offset: Option<Decimal>,
    pub expire_date: Option<DateTime<Utc>>,
    pub value_date: Option<String>,
    pub stop: Option<Decimal>,
    pub limit: Option<Decimal>,
    pub stop_order_id: Option<OrderId>,
    pub limit_order_id: Option<OrderId>,
}

impl OrderRow {
    /// Create a row with only the key set
    pub fn new(order_id: impl Into<OrderId>) -> Self {
        Self {
            order_id: order_id.into(),
            request_id: None,
            rate: None,
            execution_rate: None,
            rate_min: None,
            rate_max: None,
            trade_id: None,
            account_id: None,
            account_name: None,
            offer_id: None,
            net_quantity: None,
            side: None,
            stage: None,
            order_type: None,
            status: None,
            status_time: None,
            amount: None,
            lifetime: None,
            at_market: None,
            trail_step: None,
            trail_rate: None,
            time_in_force: None,
            request_txt: None,
            contingent_order_id: None,
            contingency_type: None,
            primary_id: None,
            origin_amount: None,
            filled_amount: None,
            working_indicator: None,
            peg_type: None,
            peg_offset: None,
            expire_date: None,
            value_date: None,
            stop: None,
            limit: None,
            stop_order_id: None,
            limit_order_id: None,
        }
    }

    /// Whether the order is currently working at the venue
    pub fn is_working(&self) -> bool {
        self.working_indicator.unwrap_or(false)
    }
}

impl TableRow for OrderRow {
    type Field = OrderField;

    const KIND: TableKind = TableKind::Orders;

    const FIELDS: &'static [OrderField] = &[
        OrderField::OrderId,
        OrderField::RequestId,
        OrderField::Rate,
        OrderField::ExecutionRate,
        OrderField::RateMin,
        OrderField::RateMax,
        OrderField::TradeId,
        OrderField::AccountId,
        OrderField::AccountName,
        OrderField::OfferId,
        OrderField::NetQuantity,
        OrderField::Side,
        OrderField::Stage,
        OrderField::OrderType,
        OrderField::Status,
        OrderField::StatusTime,
        OrderField::Amount,
        OrderField::Lifetime,
        OrderField::AtMarket,
        OrderField::TrailStep,
        OrderField::TrailRate,
        OrderField::TimeInForce,
        OrderField::RequestTxt,
        OrderField::ContingentOrderId,
        OrderField::ContingencyType,
        OrderField::PrimaryId,
        OrderField::OriginAmount,
        OrderField::FilledAmount,
        OrderField::WorkingIndicator,
        OrderField::PegType,
        OrderField::PegOffset,
        OrderField::ExpireDate,
        OrderField::ValueDate,
        OrderField::Stop,
        OrderField::Limit,
        OrderField::StopOrderId,
        OrderField::LimitOrderId,
    ];

    fn row_id(&self) -> &str {
        self.order_id.as_str()
    }

    fn cell(&self, field: OrderField) -> Option<Cell> {
        match field {
            OrderField::OrderId => Some(Cell::Text(self.order_id.as_str().to_string())),
            OrderField::RequestId => {
                self.request_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            OrderField::Rate => self.rate.map(Cell::Decimal),
            OrderField::ExecutionRate => self.execution_rate.map(Cell::Decimal),
            OrderField::RateMin => self.rate_min.map(Cell::Decimal),
            OrderField::RateMax => self.rate_max.map(Cell::Decimal),
            OrderField::TradeId => {
                self.trade_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            OrderField::AccountId => {
                self.account_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            OrderField::AccountName => self.account_name.clone().map(Cell::Text),
            OrderField::OfferId => {
                self.offer_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            OrderField::NetQuantity => self.net_quantity.map(Cell::Bool),
            OrderField::Side => self.side.map(|s| Cell::Text(s.as_code().to_string())),
            OrderField::Stage => self.stage.clone().map(Cell::Text),
            OrderField::OrderType => self.order_type.clone().map(Cell::Text),
            OrderField::Status => self.status.clone().map(Cell::Text),
            OrderField::StatusTime => self.status_time.map(Cell::Time),
            OrderField::Amount => self.amount.map(Cell::Decimal),
            OrderField::Lifetime => self.lifetime.map(|v| Cell::Int(v as i64)),
            OrderField::AtMarket => self.at_market.map(Cell::Decimal),
            OrderField::TrailStep => self.trail_step.map(|v| Cell::Int(v as i64)),
            OrderField::TrailRate => self.trail_rate.map(Cell::Decimal),
            OrderField::TimeInForce => self.time_in_force.clone().map(Cell::Text),
            OrderField::RequestTxt => self.request_txt.clone().map(Cell::Text),
            OrderField::ContingentOrderId => self
                .contingent_order_id
                .as_ref()
                .map(|v| Cell::Text(v.as_str().to_string())),
            OrderField::ContingencyType => self.contingency_type.map(|v| Cell::Int(v as i64)),
            OrderField::PrimaryId => {
                self.primary_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            OrderField::OriginAmount => self.origin_amount.map(Cell::Decimal),
            OrderField::FilledAmount => self.filled_amount.map(Cell::Decimal),
            OrderField::WorkingIndicator => self.working_indicator.map(Cell::Bool),
            OrderField::PegType => self.peg_type.clone().map(Cell::Text),
            OrderField::PegOffset => self.peg_offset.map(Cell::Decimal),
            OrderField::ExpireDate => self.expire_date.map(Cell::Time),
            OrderField::ValueDate => self.value_date.clone().map(Cell::Text),
            OrderField::Stop => self.stop.map(Cell::Decimal),
            OrderField::Limit => self.limit.map(Cell::Decimal),
            OrderField::StopOrderId => {
                self.stop_order_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
            OrderField::LimitOrderId => {
                self.limit_order_id.as_ref().map(|v| Cell::Text(v.as_str().to_string()))
            }
        }
    }

    fn into_row(self) -> Row {
        Row::Order(self)
    }

    fn from_row(row: Row) -> Option<Self> {
        match row {
            Row::Order(r) => Some(r),
            _ => None,
        }
    }

    fn as_row(row: &Row) -> Option<&Self> {
        match row {
            Row::Order(r) => Some(r),
            _ => None,
        }
    }
}

//! Accounts table row
//!
//! Base columns mirror the venue account record. The trailing block
//! (`used_margin` through `usable_margin`) are table columns: derived values
//! the terminal recalculates as quotes move, present only on the mirrored row.

use crate::cell::Cell;
use crate::enums::TableKind;
use crate::ids::AccountId;
use crate::row::{Row, TableRow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Addressable columns of an Accounts row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountField {
    AccountId,
    AccountName,
    AccountKind,
    Balance,
    NonTradeEquity,
    M2mEquity,
    MarginCallFlag,
    LastMarginCallDate,
    MaintenanceType,
    AmountLimit,
    BaseUnitSize,
    MaintenanceFlag,
    ManagerAccountId,
    LeverageProfileId,
    UsedMargin,
    Equity,
    DayPl,
    GrossPl,
    UsableMargin,
}

/// One Accounts row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    pub account_id: AccountId,
    pub account_name: Option<String>,
    /// Venue account-kind code (e.g. "32" self-traded, "36" managed)
    pub account_kind: Option<String>,
    pub balance: Option<Decimal>,
    pub non_trade_equity: Option<Decimal>,
    pub m2m_equity: Option<Decimal>,
    /// Margin call state code ("N", "W", "Q", "A", "Y")
    pub margin_call_flag: Option<String>,
    pub last_margin_call_date: Option<DateTime<Utc>>,
    /// Maintenance grouping code ("Y", "N", "0", "D")
    pub maintenance_type: Option<String>,
    pub amount_limit: Option<Decimal>,
    pub base_unit_size: Option<i32>,
    pub maintenance_flag: Option<bool>,
    pub manager_account_id: Option<String>,
    pub leverage_profile_id: Option<String>,
    /// Table column: margin currently committed to open positions
    pub used_margin: Option<Decimal>,
    /// Table column: balance plus floating profit/loss
    pub equity: Option<Decimal>,
    /// Table column: profit/loss realized today
    pub day_pl: Option<Decimal>,
    /// Table column: floating profit/loss across open positions
    pub gross_pl: Option<Decimal>,
    /// Table column: equity minus used margin
    pub usable_margin: Option<Decimal>,
}

impl AccountRow {
    /// Create a row with only the key set
    pub fn new(account_id: impl Into<AccountId>) -> Self {
        Self {
            account_id: account_id.into(),
            account_name: None,
            account_kind: None,
            balance: None,
            non_trade_equity: None,
            m2m_equity: None,
            margin_call_flag: None,
            last_margin_call_date: None,
            maintenance_type: None,
            amount_limit: None,
            base_unit_size: None,
            maintenance_flag: None,
            manager_account_id: None,
            leverage_profile_id: None,
            used_margin: None,
            equity: None,
            day_pl: None,
            gross_pl: None,
            usable_margin: None,
        }
    }

    /// Whether the venue has this account under margin call
    pub fn is_under_margin_call(&self) -> bool {
        matches!(self.margin_call_flag.as_deref(), Some("Y") | Some("A"))
    }
}

impl TableRow for AccountRow {
    type Field = AccountField;

    const KIND: TableKind = TableKind::Accounts;

    const FIELDS: &'static [AccountField] = &[
        AccountField::AccountId,
        AccountField::AccountName,
        AccountField::AccountKind,
        AccountField::Balance,
        AccountField::NonTradeEquity,
        AccountField::M2mEquity,
        AccountField::MarginCallFlag,
        AccountField::LastMarginCallDate,
        AccountField::MaintenanceType,
        AccountField::AmountLimit,
        AccountField::BaseUnitSize,
        AccountField::MaintenanceFlag,
        AccountField::ManagerAccountId,
        AccountField::LeverageProfileId,
        AccountField::UsedMargin,
        AccountField::Equity,
        AccountField::DayPl,
        AccountField::GrossPl,
        AccountField::UsableMargin,
    ];

    fn row_id(&self) -> &str {
        self.account_id.as_str()
    }

    fn cell(&self, field: AccountField) -> Option<Cell> {
        match field {
            AccountField::AccountId => Some(Cell::Text(self.account_id.as_str().to_string())),
            AccountField::AccountName => self.account_name.clone().map(Cell::Text),
            AccountField::AccountKind => self.account_kind.clone().map(Cell::Text),
            AccountField::Balance => self.balance.map(Cell::Decimal),
            AccountField::NonTradeEquity => self.non_trade_equity.map(Cell::Decimal),
            AccountField::M2mEquity => self.m2m_equity.map(Cell::Decimal),
            AccountField::MarginCallFlag => self.margin_call_flag.clone().map(Cell::Text),
            AccountField::LastMarginCallDate => self.last_margin_call_date.map(Cell::Time),
            AccountField::MaintenanceType => self.maintenance_type.clone().map(Cell::Text),
            AccountField::AmountLimit => self.amount_limit.map(Cell::Decimal),
            AccountField::BaseUnitSize => self.base_unit_size.map(|v| Cell::Int(v as i64)),
            AccountField::MaintenanceFlag => self.maintenance_flag.map(Cell::Bool),
            AccountField::ManagerAccountId => self.manager_account_id.clone().map(Cell::Text),
            AccountField::LeverageProfileId => self.leverage_profile_id.clone().map(Cell::Text),
            AccountField::UsedMargin => self.used_margin.map(Cell::Decimal),
            AccountField::Equity => self.equity.map(Cell::Decimal),
            AccountField::DayPl => self.day_pl.map(Cell::Decimal),
            AccountField::GrossPl => self.gross_pl.map(Cell::Decimal),
            AccountField::UsableMargin => self.usable_margin.map(Cell::Decimal),
        }
    }

    fn into_row(self) -> Row {
        Row::Account(self)
    }

    fn from_row(row: Row) -> Option<Self> {
        match row {
            Row::Account(r) => Some(r),
            _ => None,
        }
    }

    fn as_row(row: &Row) -> Option<&Self> {
        match row {
            Row::Account(r) => Some(r),
            _ => None,
        }
    }
}

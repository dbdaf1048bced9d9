//! Column predicates for filtered iteration
//!
//! A filter is a flat list of per-column conditions joined by one logic
//! operator; evaluation is a plain per-row boolean test. Tables hold hundreds
//! to low thousands of rows and are indexed only by key, so there is no query
//! planning.

use std::cmp::Ordering;
use types::cell::Cell;
use types::row::TableRow;

/// Relational operator of one condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOp {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    /// Inclusive range; carries a second bound
    Between,
}

/// How conditions combine across columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    And,
    Or,
}

/// One column condition.
///
/// An unset cell never matches, and neither does a value of a different cell
/// type; both cases are "no match", not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<F> {
    pub field: F,
    pub op: RelationalOp,
    pub value: Cell,
    /// Upper bound, set for `Between` only
    pub upper: Option<Cell>,
}

impl<F: Copy> Condition<F> {
    pub fn new(field: F, op: RelationalOp, value: impl Into<Cell>) -> Self {
        Self {
            field,
            op,
            value: value.into(),
            upper: None,
        }
    }

    /// Inclusive range condition
    pub fn between(field: F, lower: impl Into<Cell>, upper: impl Into<Cell>) -> Self {
        Self {
            field,
            op: RelationalOp::Between,
            value: lower.into(),
            upper: Some(upper.into()),
        }
    }

    fn matches_cell(&self, cell: &Cell) -> bool {
        match self.op {
            RelationalOp::EqualTo => cell == &self.value,
            RelationalOp::NotEqualTo => {
                matches!(cell.compare(&self.value), Some(ord) if ord != Ordering::Equal)
            }
            RelationalOp::GreaterThan => {
                matches!(cell.compare(&self.value), Some(Ordering::Greater))
            }
            RelationalOp::LessThan => matches!(cell.compare(&self.value), Some(Ordering::Less)),
            RelationalOp::GreaterOrEqual => matches!(
                cell.compare(&self.value),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            RelationalOp::LessOrEqual => matches!(
                cell.compare(&self.value),
                Some(Ordering::Less) | Some(Ordering::Equal)
            ),
            RelationalOp::Between => {
                let Some(upper) = &self.upper else {
                    return false;
                };
                let above_lower = matches!(
                    cell.compare(&self.value),
                    Some(Ordering::Greater) | Some(Ordering::Equal)
                );
                let below_upper = matches!(
                    cell.compare(upper),
                    Some(Ordering::Less) | Some(Ordering::Equal)
                );
                above_lower && below_upper
            }
        }
    }
}

/// Conditions joined by one logic operator
#[derive(Debug, Clone, PartialEq)]
pub struct RowFilter<F> {
    conditions: Vec<Condition<F>>,
    logic: LogicOp,
}

impl<F: Copy> RowFilter<F> {
    /// All conditions must hold
    pub fn all(conditions: Vec<Condition<F>>) -> Self {
        Self {
            conditions,
            logic: LogicOp::And,
        }
    }

    /// Any condition suffices
    pub fn any(conditions: Vec<Condition<F>>) -> Self {
        Self {
            conditions,
            logic: LogicOp::Or,
        }
    }

    /// Single equality condition
    pub fn equals(field: F, value: impl Into<Cell>) -> Self {
        Self::all(vec![Condition::new(field, RelationalOp::EqualTo, value)])
    }

    /// One column against a value set: matches when any value satisfies `op`
    pub fn any_of(field: F, op: RelationalOp, values: Vec<Cell>) -> Self {
        Self::any(
            values
                .into_iter()
                .map(|v| Condition::new(field, op, v))
                .collect(),
        )
    }

    pub fn logic(&self) -> LogicOp {
        self.logic
    }

    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    /// Evaluate against one row. An empty filter matches every row.
    pub fn matches<R: TableRow<Field = F>>(&self, row: &R) -> bool {
        let mut check = |c: &Condition<F>| match row.cell(c.field) {
            Some(cell) => c.matches_cell(&cell),
            None => false,
        };
        match self.logic {
            LogicOp::And => self.conditions.iter().all(&mut check),
            LogicOp::Or => {
                self.conditions.is_empty() || self.conditions.iter().any(&mut check)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use types::account::{AccountField, AccountRow};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn account(balance: &str, kind: &str) -> AccountRow {
        let mut row = AccountRow::new("A1");
        row.balance = Some(dec(balance));
        row.account_kind = Some(kind.to_string());
        row
    }

    #[test]
    fn test_equals() {
        let filter = RowFilter::equals(AccountField::AccountKind, "32");
        assert!(filter.matches(&account("1000", "32")));
        assert!(!filter.matches(&account("1000", "36")));
    }

    #[test]
    fn test_relational_ops() {
        let row = account("1000", "32");

        let gt = RowFilter::all(vec![Condition::new(
            AccountField::Balance,
            RelationalOp::GreaterThan,
            dec("999"),
        )]);
        assert!(gt.matches(&row));

        let lt = RowFilter::all(vec![Condition::new(
            AccountField::Balance,
            RelationalOp::LessThan,
            dec("999"),
        )]);
        assert!(!lt.matches(&row));

        let ne = RowFilter::all(vec![Condition::new(
            AccountField::Balance,
            RelationalOp::NotEqualTo,
            dec("999"),
        )]);
        assert!(ne.matches(&row));
    }

    #[test]
    fn test_between_is_inclusive() {
        let filter = RowFilter::all(vec![Condition::between(
            AccountField::Balance,
            dec("1000"),
            dec("2000"),
        )]);
        assert!(filter.matches(&account("1000", "32")));
        assert!(filter.matches(&account("1500", "32")));
        assert!(filter.matches(&account("2000", "32")));
        assert!(!filter.matches(&account("2001", "32")));
    }

    #[test]
    fn test_and_or_combination() {
        let both = RowFilter::all(vec![
            Condition::new(AccountField::AccountKind, RelationalOp::EqualTo, "32"),
            Condition::new(AccountField::Balance, RelationalOp::GreaterOrEqual, dec("1000")),
        ]);
        assert!(both.matches(&account("1000", "32")));
        assert!(!both.matches(&account("500", "32")));

        let either = RowFilter::any(vec![
            Condition::new(AccountField::AccountKind, RelationalOp::EqualTo, "36"),
            Condition::new(AccountField::Balance, RelationalOp::GreaterOrEqual, dec("1000")),
        ]);
        assert!(either.matches(&account("1000", "32")));
        assert!(either.matches(&account("500", "36")));
        assert!(!either.matches(&account("500", "32")));
    }

    #[test]
    fn test_unset_cell_never_matches() {
        let row = AccountRow::new("A1"); // balance unset

        let eq = RowFilter::equals(AccountField::Balance, dec("0"));
        assert!(!eq.matches(&row));

        // NotEqualTo does not match an unset cell either
        let ne = RowFilter::all(vec![Condition::new(
            AccountField::Balance,
            RelationalOp::NotEqualTo,
            dec("0"),
        )]);
        assert!(!ne.matches(&row));
    }

    #[test]
    fn test_type_mismatch_never_matches() {
        let row = account("1000", "32");
        let filter = RowFilter::all(vec![Condition::new(
            AccountField::Balance,
            RelationalOp::GreaterThan,
            "not-a-number",
        )]);
        assert!(!filter.matches(&row));
    }

    #[test]
    fn test_any_of_value_set() {
        let filter = RowFilter::any_of(
            AccountField::AccountKind,
            RelationalOp::EqualTo,
            vec!["32".into(), "36".into()],
        );
        assert!(filter.matches(&account("0", "32")));
        assert!(filter.matches(&account("0", "36")));
        assert!(!filter.matches(&account("0", "38")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(RowFilter::all(vec![]).matches(&account("0", "32")));
        assert!(RowFilter::any(vec![]).matches(&account("0", "32")));
    }
}

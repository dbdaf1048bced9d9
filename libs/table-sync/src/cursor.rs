//! Resumable row cursors
//!
//! A cursor holds a position into a table plus an optional column filter. It
//! keeps only a weak back-reference, so holding a cursor never pins the table
//! alive, and it is safe to keep across mutations: each advance reads the
//! table as it is at that moment (per-row consistency; positions freed by a
//! delete may shift under the cursor, which can skip or repeat rows around
//! the deletion point, so anchor on row ids when that matters).

use crate::query::RowFilter;
use crate::table::Table;
use std::sync::{Arc, Weak};
use types::row::TableRow;

/// Cursor over a table's rows, optionally filtered.
///
/// Created before the first row; advancing yields the next matching row.
/// Advancing past the last row exhausts the cursor permanently.
pub struct RowCursor<R: TableRow> {
    pub(crate) table: Weak<Table<R>>,
    pub(crate) filter: Option<RowFilter<R::Field>>,
    pub(crate) position: usize,
    pub(crate) exhausted: bool,
}

impl<R: TableRow> RowCursor<R> {
    pub(crate) fn new(table: &Arc<Table<R>>, filter: Option<RowFilter<R::Field>>) -> Self {
        Self {
            table: Arc::downgrade(table),
            filter,
            position: 0,
            exhausted: false,
        }
    }

    /// Rewind to before the first row
    pub fn reset(&mut self) {
        self.position = 0;
        self.exhausted = false;
    }

    /// Whether the cursor has advanced past the last row
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Index the next advance will scan from
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<R: TableRow> Iterator for RowCursor<R> {
    type Item = Arc<R>;

    /// `None` once exhausted, or when the table has been dropped
    fn next(&mut self) -> Option<Arc<R>> {
        let table = self.table.upgrade()?;
        table.next_row(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::enums::{UpdateOrigin, UpdateType};
    use types::offer::OfferRow;

    fn table_with(ids: &[&str]) -> Arc<Table<OfferRow>> {
        let table = Arc::new(Table::new());
        for id in ids {
            table
                .apply(UpdateType::Insert, OfferRow::new(*id), UpdateOrigin::Server)
                .unwrap();
        }
        table
    }

    #[test]
    fn test_cursor_visits_rows_in_index_order() {
        let table = table_with(&["EUR/USD", "GBP/USD", "USD/JPY"]);
        let ids: Vec<String> = table
            .cursor()
            .map(|row| row.row_id().to_string())
            .collect();
        assert_eq!(ids, vec!["EUR/USD", "GBP/USD", "USD/JPY"]);
    }

    #[test]
    fn test_exhausted_cursor_stays_exhausted() {
        let table = table_with(&["EUR/USD"]);
        let mut cursor = table.cursor();

        assert!(cursor.next().is_some());
        assert!(cursor.next().is_none());
        assert!(cursor.is_exhausted());

        // Rows inserted after exhaustion are not observed without a reset
        table
            .apply(UpdateType::Insert, OfferRow::new("GBP/USD"), UpdateOrigin::Server)
            .unwrap();
        assert!(cursor.next().is_none());

        cursor.reset();
        assert_eq!(cursor.count(), 2);
    }

    #[test]
    fn test_cursor_survives_table_drop() {
        let table = table_with(&["EUR/USD"]);
        let mut cursor = table.cursor();
        drop(table);
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_cursor_resumes_across_mutations() {
        let table = table_with(&["EUR/USD", "GBP/USD"]);
        let mut cursor = table.cursor();
        assert_eq!(cursor.next().unwrap().row_id(), "EUR/USD");

        table
            .apply(UpdateType::Insert, OfferRow::new("USD/JPY"), UpdateOrigin::Server)
            .unwrap();

        assert_eq!(cursor.next().unwrap().row_id(), "GBP/USD");
        assert_eq!(cursor.next().unwrap().row_id(), "USD/JPY");
        assert!(cursor.next().is_none());
    }
}

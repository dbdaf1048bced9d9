//! Property test: a table agrees with a model map over any mutation sequence.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use table_sync::Table;
use types::account::AccountRow;
use types::enums::{UpdateOrigin, UpdateType};
use types::errors::TableError;
use types::row::TableRow;

#[derive(Debug, Clone)]
enum Step {
    Insert(u8, i64),
    Update(u8, i64),
    Delete(u8),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u8..8, -10_000i64..10_000).prop_map(|(k, v)| Step::Insert(k, v)),
        (0u8..8, -10_000i64..10_000).prop_map(|(k, v)| Step::Update(k, v)),
        (0u8..8).prop_map(Step::Delete),
    ]
}

fn account(key: u8, balance: i64) -> AccountRow {
    let mut row = AccountRow::new(format!("A{key}"));
    row.balance = Some(Decimal::from(balance));
    row
}

proptest! {
    /// After every step, `find_row` returns the latest applied value (or
    /// nothing after delete), rejected steps mutate nothing, and the row
    /// count matches the model.
    #[test]
    fn table_agrees_with_model_map(steps in proptest::collection::vec(step_strategy(), 1..120)) {
        let table: Table<AccountRow> = Table::new();
        let mut model: HashMap<String, i64> = HashMap::new();

        for step in steps {
            match step {
                Step::Insert(key, balance) => {
                    let id = format!("A{key}");
                    let result = table.apply(
                        UpdateType::Insert,
                        account(key, balance),
                        UpdateOrigin::Server,
                    );
                    if model.contains_key(&id) {
                        let is_duplicate = matches!(result, Err(TableError::DuplicateKey { .. }));
                        prop_assert!(is_duplicate);
                    } else {
                        prop_assert!(result.is_ok());
                        model.insert(id, balance);
                    }
                }
                Step::Update(key, balance) => {
                    let id = format!("A{key}");
                    let result = table.apply(
                        UpdateType::Update,
                        account(key, balance),
                        UpdateOrigin::Server,
                    );
                    if model.contains_key(&id) {
                        prop_assert!(result.is_ok());
                        model.insert(id, balance);
                    } else {
                        let is_unknown = matches!(result, Err(TableError::UnknownRow { .. }));
                        prop_assert!(is_unknown);
                    }
                }
                Step::Delete(key) => {
                    let id = format!("A{key}");
                    let result = table.apply(
                        UpdateType::Delete,
                        AccountRow::new(id.as_str()),
                        UpdateOrigin::Server,
                    );
                    if model.remove(&id).is_some() {
                        prop_assert!(result.is_ok());
                    } else {
                        let is_unknown = matches!(result, Err(TableError::UnknownRow { .. }));
                        prop_assert!(is_unknown);
                    }
                }
            }

            // The table and the model agree on every key
            prop_assert_eq!(table.size(), model.len());
            for (id, balance) in &model {
                let row = table.find_row(id).expect("model row missing from table");
                prop_assert_eq!(row.balance, Some(Decimal::from(*balance)));
            }
        }

        // Index positions stay consistent with key lookup
        for position in 0..table.size() {
            let row = table.get_row(position).unwrap();
            prop_assert!(table.find_row(row.row_id()).is_some());
        }
    }

    /// The insert-type queue replays exactly the accepted inserts, in order.
    #[test]
    fn insert_queue_replays_accepted_inserts(steps in proptest::collection::vec(step_strategy(), 1..60)) {
        let table: Table<AccountRow> = Table::new();
        let queue = table.update_event_queue(UpdateType::Insert, false);
        let mut accepted = Vec::new();

        for step in steps {
            let (update_type, row) = match step {
                Step::Insert(key, balance) => (UpdateType::Insert, account(key, balance)),
                Step::Update(key, balance) => (UpdateType::Update, account(key, balance)),
                Step::Delete(key) => {
                    (UpdateType::Delete, AccountRow::new(format!("A{key}")))
                }
            };
            let id = row.row_id().to_string();
            if table.apply(update_type, row, UpdateOrigin::Server).is_ok()
                && update_type == UpdateType::Insert
            {
                accepted.push(id);
            }
        }

        let mut replayed = Vec::new();
        while let Some(row) = queue.try_get() {
            replayed.push(row.row_id().to_string());
        }
        prop_assert_eq!(replayed, accepted);
    }
}

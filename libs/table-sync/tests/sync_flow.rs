//! End-to-end scenarios: feed in, tables and queues out.

use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use table_sync::{FeedUpdate, TableManager};
use types::account::{AccountField, AccountRow};
use types::enums::{TableKind, UpdateOrigin, UpdateType, UpdatesProcessStatus};
use types::offer::OfferRow;
use types::order::OrderRow;
use types::row::TableRow;
use types::trade::TradeRow;

fn account(id: &str, balance: i64) -> AccountRow {
    let mut row = AccountRow::new(id);
    row.balance = Some(Decimal::from(balance));
    row
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn account_lifecycle_insert_update_delete() {
    init_tracing();
    let manager = TableManager::new();
    let deletes = manager.accounts().update_event_queue(UpdateType::Delete, false);
    let updates = manager.accounts().update_event_queue(UpdateType::Update, false);

    // Insert: the row is found with a valid balance cell
    manager
        .apply_update(FeedUpdate::server(
            UpdateType::Insert,
            account("A1", 1000).into_row(),
        ))
        .unwrap();
    let found = manager.accounts().find_row("A1").unwrap();
    assert_eq!(found.balance, Some(Decimal::from(1000)));
    assert!(found.cell(AccountField::Balance).is_some());

    // Update: changed-cell flag set, previous value retrievable from the event
    let applied = manager
        .accounts()
        .apply(UpdateType::Update, account("A1", 1200), UpdateOrigin::Server)
        .unwrap();
    assert!(manager
        .accounts()
        .is_cell_changed(0, AccountField::Balance)
        .unwrap());
    assert_eq!(
        applied.previous.unwrap().balance,
        Some(Decimal::from(1000))
    );
    assert_eq!(
        updates.try_get().unwrap().balance,
        Some(Decimal::from(1200))
    );

    // Delete: lookup is empty, the event carries the last-known row
    manager
        .apply_update(FeedUpdate::server(
            UpdateType::Delete,
            AccountRow::new("A1").into_row(),
        ))
        .unwrap();
    assert!(manager.accounts().find_row("A1").is_none());
    assert_eq!(
        deletes.try_get().unwrap().balance,
        Some(Decimal::from(1200))
    );
}

#[test]
fn queue_order_matches_application_order_across_threads() {
    let manager = Arc::new(TableManager::new());
    let queue = manager.offers().update_event_queue(UpdateType::Insert, false);

    let producer = {
        let manager = manager.clone();
        thread::spawn(move || {
            for i in 0..200 {
                manager
                    .apply_update(FeedUpdate::server(
                        UpdateType::Insert,
                        OfferRow::new(format!("I{i}").as_str()).into_row(),
                    ))
                    .unwrap();
            }
        })
    };

    let consumer = thread::spawn(move || {
        (0..200)
            .map(|_| queue.wait_get().row_id().to_string())
            .collect::<Vec<_>>()
    });

    producer.join().unwrap();
    let received = consumer.join().unwrap();
    let expected: Vec<String> = (0..200).map(|i| format!("I{i}")).collect();
    assert_eq!(received, expected);
}

#[test]
fn two_queues_drain_independently_under_concurrency() {
    let manager = Arc::new(TableManager::new());
    let first = manager.trades().update_event_queue(UpdateType::Insert, false);
    let second = manager.trades().update_event_queue(UpdateType::Insert, false);

    let drain_first = thread::spawn(move || {
        (0..50)
            .map(|_| first.wait_get().row_id().to_string())
            .collect::<Vec<_>>()
    });

    for i in 0..50 {
        manager
            .apply_update(FeedUpdate::server(
                UpdateType::Insert,
                TradeRow::new(format!("T{i}").as_str()).into_row(),
            ))
            .unwrap();
    }

    let from_first = drain_first.join().unwrap();
    let from_second: Vec<String> = (0..50)
        .map(|_| second.try_get().unwrap().row_id().to_string())
        .collect();

    let expected: Vec<String> = (0..50).map(|i| format!("T{i}")).collect();
    assert_eq!(from_first, expected);
    assert_eq!(from_second, expected);
}

#[test]
fn locked_batch_appears_atomically_on_manager_queue() {
    let manager = Arc::new(TableManager::new());
    let queue = manager.tables_update_queue(false);

    manager.lock_updates();
    manager
        .apply_update(FeedUpdate::server(
            UpdateType::Insert,
            OrderRow::new("O1").into_row(),
        ))
        .unwrap();
    manager
        .apply_update(FeedUpdate::server(
            UpdateType::Insert,
            TradeRow::new("T1").into_row(),
        ))
        .unwrap();
    manager
        .apply_update(FeedUpdate::server(
            UpdateType::Update,
            OrderRow::new("O1").into_row(),
        ))
        .unwrap();
    manager.unlock_updates();

    let consumer = thread::spawn(move || {
        let mut items = Vec::new();
        for _ in 0..5 {
            items.push(queue.timed_wait_get(Duration::from_secs(1)).unwrap());
        }
        items
    });

    let items = consumer.join().unwrap();
    assert_eq!(
        items[0].process_status(),
        Some(UpdatesProcessStatus::BeginTablesUpdate)
    );
    let events: Vec<(TableKind, UpdateType)> = items[1..4]
        .iter()
        .map(|i| {
            let e = i.as_update().unwrap();
            (e.kind, e.update_type)
        })
        .collect();
    assert_eq!(
        events,
        vec![
            (TableKind::Orders, UpdateType::Insert),
            (TableKind::Trades, UpdateType::Insert),
            (TableKind::Orders, UpdateType::Update),
        ]
    );
    assert_eq!(
        items[4].process_status(),
        Some(UpdatesProcessStatus::EndTablesUpdate)
    );
}

#[test]
fn copy_queue_rows_survive_later_mutation() {
    let manager = TableManager::new();
    let detached = manager.accounts().update_event_queue(UpdateType::Insert, true);
    let shared = manager.accounts().update_event_queue(UpdateType::Insert, false);

    manager
        .apply_update(FeedUpdate::server(
            UpdateType::Insert,
            account("A1", 1000).into_row(),
        ))
        .unwrap();
    manager
        .apply_update(FeedUpdate::server(
            UpdateType::Update,
            account("A1", 9999).into_row(),
        ))
        .unwrap();

    // Both still show the insert-time value: rows are immutable snapshots,
    // the copy flag only controls whether the Arc is shared with the table.
    assert_eq!(
        detached.try_get().unwrap().balance,
        Some(Decimal::from(1000))
    );
    assert_eq!(shared.try_get().unwrap().balance, Some(Decimal::from(1000)));
}

#[test]
fn breakable_wait_is_cancelled_from_another_thread() {
    let manager = TableManager::new();
    let queue = manager.messages().update_event_queue(UpdateType::Insert, false);
    let keep_waiting = Arc::new(AtomicBool::new(true));

    let consumer = {
        let keep_waiting = keep_waiting.clone();
        thread::spawn(move || queue.breakable_wait_get(&keep_waiting))
    };

    thread::sleep(Duration::from_millis(30));
    keep_waiting.store(false, Ordering::Release);
    assert!(consumer.join().unwrap().is_none());
}

#[test]
fn concurrent_readers_see_whole_rows_during_mutation() {
    init_tracing();
    let manager = Arc::new(TableManager::new());
    for i in 0..100 {
        manager
            .apply_update(FeedUpdate::server(
                UpdateType::Insert,
                account(format!("A{i}").as_str(), 1000).into_row(),
            ))
            .unwrap();
    }

    let writer = {
        let manager = manager.clone();
        thread::spawn(move || {
            for round in 0..50 {
                for i in 0..100 {
                    manager
                        .apply_update(FeedUpdate::server(
                            UpdateType::Update,
                            account(format!("A{i}").as_str(), 1000 + round).into_row(),
                        ))
                        .unwrap();
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let manager = manager.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    manager.accounts().for_each(|row| {
                        // Every observed row is a complete snapshot
                        assert!(row.balance.unwrap() >= Decimal::from(1000));
                    });
                    let mut count = 0;
                    let mut cursor = manager.accounts().cursor();
                    while cursor.next().is_some() {
                        count += 1;
                    }
                    assert_eq!(count, 100);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

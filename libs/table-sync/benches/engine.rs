//! Benchmarks for the hot paths: mutation apply and queue throughput.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rust_decimal::Decimal;
use table_sync::Table;
use types::enums::{UpdateOrigin, UpdateType};
use types::offer::OfferRow;

fn offer(id: usize, bid: i64) -> OfferRow {
    let mut row = OfferRow::new(format!("I{id}"));
    row.bid = Some(Decimal::new(bid, 5));
    row.ask = Some(Decimal::new(bid + 5, 5));
    row
}

fn populated_table(rows: usize) -> Table<OfferRow> {
    let table = Table::new();
    for i in 0..rows {
        table
            .apply(UpdateType::Insert, offer(i, 109_341), UpdateOrigin::Server)
            .unwrap();
    }
    table
}

fn bench_apply_update(c: &mut Criterion) {
    let table = populated_table(1_000);
    let mut tick = 0i64;
    c.bench_function("apply_update_1k_rows", |b| {
        b.iter(|| {
            tick += 1;
            table
                .apply(
                    UpdateType::Update,
                    offer(500, 109_341 + (tick % 50)),
                    UpdateOrigin::Server,
                )
                .unwrap()
        })
    });
}

fn bench_find_row(c: &mut Criterion) {
    let table = populated_table(1_000);
    c.bench_function("find_row_1k_rows", |b| {
        b.iter(|| table.find_row("I500").unwrap())
    });
}

fn bench_queue_roundtrip(c: &mut Criterion) {
    let table = populated_table(0);
    let queue = table.update_event_queue(UpdateType::Insert, false);
    let mut next = 0usize;
    c.bench_function("queue_push_pop", |b| {
        b.iter_batched(
            || {
                next += 1;
                offer(next, 109_341)
            },
            |row| {
                table
                    .apply(UpdateType::Insert, row, UpdateOrigin::Server)
                    .unwrap();
                queue.try_get().unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_apply_update, bench_find_row, bench_queue_roundtrip);
criterion_main!(benches);

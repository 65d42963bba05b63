use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use stockline_core::{Sku, UserId};
use stockline_events::RecordingPublisher;
use stockline_infra::ReservationConfig;
use stockline_infra::order_ledger::InMemoryOrderLedger;
use stockline_infra::reservation::ReservationCoordinator;
use stockline_infra::stock_store::{InMemoryStockStore, StockStore};
use stockline_inventory::{LowStockAlert, StockRecord};
use stockline_sales::{OrderRequestLine, PlaceOrder};

type Coordinator = ReservationCoordinator<
    Arc<InMemoryStockStore>,
    Arc<InMemoryOrderLedger>,
    Arc<RecordingPublisher<LowStockAlert>>,
>;

/// Catalog large enough that no benchmark iteration ever runs out of stock.
fn coordinator(skus: usize) -> Coordinator {
    let records = (0..skus).map(|i| {
        StockRecord::new(Sku::parse(&format!("SKU-{i:04}")).unwrap(), format!("part {i}"), 1_000, i64::MAX / 2)
            .unwrap()
    });
    ReservationCoordinator::new(
        Arc::new(InMemoryStockStore::with_records(records).unwrap()),
        Arc::new(InMemoryOrderLedger::new()),
        Arc::new(RecordingPublisher::new()),
        ReservationConfig::default(),
    )
}

fn order(lines: usize) -> PlaceOrder {
    PlaceOrder {
        user_id: UserId::new().to_string(),
        items: (0..lines)
            .map(|i| OrderRequestLine::new(format!("SKU-{i:04}"), 1))
            .collect(),
        shipping_address: None,
        contact_info: None,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bench_place_order_latency(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("place_order_latency");

    for lines in [1usize, 5, 20].iter() {
        let coordinator = coordinator(*lines);
        let cmd = order(*lines);
        group.throughput(Throughput::Elements(*lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), lines, |b, _| {
            b.to_async(&rt)
                .iter(|| async { black_box(coordinator.place_order(black_box(&cmd)).await.unwrap()) });
        });
    }

    group.finish();
}

fn bench_decrement_increment_round_trip(c: &mut Criterion) {
    let rt = runtime();
    let store = InMemoryStockStore::with_records([StockRecord::new(
        Sku::parse("SKU-0000").unwrap(),
        "part 0",
        1_000,
        1_000,
    )
    .unwrap()])
    .unwrap();
    let sku = Sku::parse("SKU-0000").unwrap();

    c.bench_function("decrement_then_compensate", |b| {
        b.to_async(&rt).iter(|| async {
            let outcome = store.conditional_decrement(&sku, 1).await.unwrap();
            store.increment(&sku, 1).await.unwrap();
            black_box(outcome)
        });
    });
}

fn bench_concurrent_placement(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("concurrent_placement");
    group.sample_size(20);

    for concurrency in [8usize, 64].iter() {
        let coordinator = Arc::new(coordinator(4));
        group.throughput(Throughput::Elements(*concurrency as u64));
        group.bench_with_input(BenchmarkId::from_parameter(concurrency), concurrency, |b, &n| {
            b.to_async(&rt).iter(|| {
                let coordinator = coordinator.clone();
                async move {
                    let tasks: Vec<_> = (0..n)
                        .map(|_| {
                            let coordinator = coordinator.clone();
                            tokio::spawn(async move { coordinator.place_order(&order(4)).await.is_ok() })
                        })
                        .collect();
                    for t in tasks {
                        black_box(t.await.unwrap());
                    }
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_place_order_latency,
    bench_decrement_increment_round_trip,
    bench_concurrent_placement
);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use scanstock_core::{Barcode, Price, VendorId};
use scanstock_infra::{InMemoryInventoryStore, InventoryStore};
use scanstock_inventory::{InventoryTable, NewInventoryRecord};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime")
}

fn record(vendor_id: VendorId, i: usize) -> NewInventoryRecord {
    NewInventoryRecord {
        vendor_id,
        barcode: Barcode::parse(&format!("SKU-{i:06}")).expect("barcode"),
        product_name: format!("Item {i}"),
        description: String::new(),
        price: Price::from_cents(1_999),
        quantity: 1,
        size: String::new(),
        color: String::new(),
        condition: None,
    }
}

/// Populate `table` with `n` records for one vendor plus `n` for another.
fn seeded_store(n: usize) -> (InMemoryInventoryStore, VendorId) {
    let store = InMemoryInventoryStore::new();
    let vendor_id = VendorId::new();
    let other = VendorId::new();
    for i in 0..n {
        store
            .seed(InventoryTable::Generic, record(vendor_id, i))
            .expect("seed");
        store
            .seed(InventoryTable::Generic, record(other, i))
            .expect("seed");
    }
    (store, vendor_id)
}

fn bench_lookup_by_barcode(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("lookup_by_barcode");

    for size in [100usize, 1_000, 10_000] {
        let (store, vendor_id) = seeded_store(size);
        let hit = Barcode::parse(&format!("SKU-{:06}", size / 2)).expect("barcode");
        let miss = Barcode::parse("SKU-NOPE").expect("barcode");

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("hit", size), &hit, |b, barcode| {
            b.iter(|| {
                rt.block_on(store.find_by_barcode(InventoryTable::Generic, vendor_id, black_box(barcode)))
                    .expect("lookup")
            })
        });
        group.bench_with_input(BenchmarkId::new("miss", size), &miss, |b, barcode| {
            b.iter(|| {
                rt.block_on(store.find_by_barcode(InventoryTable::Generic, vendor_id, black_box(barcode)))
                    .expect("lookup")
            })
        });
    }

    group.finish();
}

fn bench_quantity_updates(c: &mut Criterion) {
    let rt = runtime();
    let (store, vendor_id) = seeded_store(1_000);
    let target = rt
        .block_on(store.find_by_barcode(
            InventoryTable::Generic,
            vendor_id,
            &Barcode::parse("SKU-000500").expect("barcode"),
        ))
        .expect("lookup")
        .remove(0);

    let mut group = c.benchmark_group("update_quantity");
    group.throughput(Throughput::Elements(1));
    let mut quantity = 0u32;
    group.bench_function("single_record", |b| {
        b.iter(|| {
            quantity = quantity.wrapping_add(1);
            rt.block_on(store.update_quantity(
                InventoryTable::Generic,
                target.id_typed(),
                black_box(quantity),
            ))
            .expect("update")
        })
    });
    group.finish();
}

criterion_group!(benches, bench_lookup_by_barcode, bench_quantity_updates);
criterion_main!(benches);

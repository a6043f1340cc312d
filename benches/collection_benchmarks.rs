/*!
# Collection Benchmarks

Benchmarks for the in-memory provider pipeline and full protocol round trips.

## Usage

```bash
# Run all benchmarks
cargo bench --bench collection_benchmarks

# Run one group
cargo bench --bench collection_benchmarks -- "Collection Provider"

# Quick run with fewer samples
cargo bench --bench collection_benchmarks -- --quick
```

HTML reports are generated in `target/criterion/report/index.html`.
*/

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use datatable::prelude::*;
use serde_json::json;

const SIZES: [usize; 3] = [100, 1_000, 10_000];
const CITIES: [&str; 5] = ["Bern", "Basel", "Zurich", "Geneva", "Lugano"];

fn records(size: usize) -> Vec<Record> {
    (0..size)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("user {i:05}"),
                "city": CITIES[i % CITIES.len()],
                "score": (i * 7919) % 1000,
            })
            .as_object()
            .cloned()
            .unwrap()
        })
        .collect()
}

fn columns() -> Vec<ColumnConfiguration> {
    ["id", "name", "city", "score"]
        .into_iter()
        .map(|name| ColumnConfiguration::builder().name(name).build().unwrap())
        .collect()
}

fn process(provider: &mut CollectionProvider, query: &QueryConfiguration, columns: &[ColumnConfiguration]) -> ProcessedResult {
    provider.prepare_for_processing(query, columns).unwrap();
    provider.process().unwrap()
}

fn bench_collection_provider(c: &mut Criterion) {
    let columns = columns();

    for size in SIZES {
        let mut provider = CollectionProvider::new(records(size));
        let mut group = c.benchmark_group(format!("Collection Provider ({size} records)"));
        group.measurement_time(Duration::from_secs(5));

        let plain = QueryConfiguration::builder().length(10).build().unwrap();
        group.bench_with_input(BenchmarkId::new("page", size), &size, |b, _| {
            b.iter(|| black_box(process(&mut provider, &plain, &columns)));
        });

        let search = QueryConfiguration::builder()
            .search_value("BERN")
            .length(10)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("global_search", size), &size, |b, _| {
            b.iter(|| black_box(process(&mut provider, &search, &columns)));
        });

        let sorted = QueryConfiguration::builder()
            .column_order("city", "asc")
            .column_order("score", "desc")
            .length(10)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("multi_sort", size), &size, |b, _| {
            b.iter(|| black_box(process(&mut provider, &sorted, &columns)));
        });

        let complex = QueryConfiguration::builder()
            .search_value("user")
            .column_search("city", "b")
            .column_order("score", "asc")
            .start(20)
            .length(25)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("complex_query", size), &size, |b, _| {
            b.iter(|| black_box(process(&mut provider, &complex, &columns)));
        });

        group.finish();
    }
}

fn bench_protocol_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("Protocol Round Trip");
    let data = records(1_000);

    let request: RequestParams = [
        ("draw", "4"),
        ("start", "10"),
        ("length", "25"),
        ("search[value]", "basel"),
        ("columns[0][data]", "id"),
        ("columns[1][data]", "name"),
        ("columns[2][data]", "city"),
        ("columns[3][data]", "score"),
        ("order[0][column]", "3"),
        ("order[0][dir]", "desc"),
    ]
    .into_iter()
    .collect();

    group.bench_function("datatable110", |b| {
        b.iter(|| {
            let engine = VersionEngine::for_request(request.clone());
            let mut service =
                DatatableService::new(CollectionProvider::new(data.clone()), columns(), engine).unwrap();
            black_box(service.handle_request().unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_collection_provider, bench_protocol_round_trip);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use shelfwise_core::Sku;
use shelfwise_inventory::Product;
use shelfwise_optimizer::{OrderQuantityCalculator, economic_order_quantity, reorder_point};

fn catalog(size: usize) -> Vec<Product> {
    (0..size)
        .map(|i| {
            Product::new(
                Sku::parse(format!("SKU-{i:06}")).unwrap(),
                "Bench Item",
                "Casual Tops",
                "M",
                "Black",
                25.0,
                10.0 + (i % 50) as f64,
                (i % 200) as u32,
            )
            .with_lead_time_days(1 + (i % 30) as u32)
            .with_annual_demand((i * 37 % 5000) as u32)
        })
        .collect()
}

fn bench_formulas(c: &mut Criterion) {
    let mut group = c.benchmark_group("formulas");

    group.bench_function("economic_order_quantity", |b| {
        b.iter(|| economic_order_quantity(black_box(500), black_box(10.0), 50.0, 0.20));
    });

    group.bench_function("reorder_point", |b| {
        b.iter(|| reorder_point(black_box(1200), black_box(7)));
    });

    group.finish();
}

fn bench_report_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_generation");
    let calc = OrderQuantityCalculator::default();

    for size in [10, 100, 1000, 10000].iter() {
        let products = catalog(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("report", size), &products, |b, products| {
            b.iter(|| black_box(calc.report(products)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_formulas, bench_report_generation);
criterion_main!(benches);

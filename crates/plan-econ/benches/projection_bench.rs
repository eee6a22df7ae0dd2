use criterion::{criterion_group, criterion_main, Criterion};
use plan_core::{CostDrivers, Equipment, Product};
use rust_decimal::Decimal;

fn bench_projection(c: &mut Criterion) {
    let equipment: Vec<Equipment> = (0..10)
        .map(|i| Equipment {
            name: format!("Mill {i}"),
            cost: Decimal::new(250_000, 0),
            useful_life: 8,
            max_capacity: 5_000,
            financing: None,
        })
        .collect();
    let products: Vec<Product> = (0..25)
        .map(|i| Product {
            name: format!("Part {i}"),
            initial_units: 500 + i,
            unit_price: Decimal::new(12_50, 2),
            unit_cost: Some(Decimal::new(7_25, 2)),
            growth_rate: Decimal::new(8, 2),
            cost_driver: None,
        })
        .collect();
    let drivers = CostDrivers::new();
    c.bench_function("project_25_products_10_years", |b| {
        b.iter(|| plan_econ::project(&equipment, &products, &drivers, 2025, 10))
    });
    let series = plan_econ::project(&equipment, &products, &drivers, 2025, 10);
    let config = plan_core::ScenarioConfig::default();
    c.bench_function("build_statements_10_years", |b| {
        b.iter(|| plan_econ::build_statements(&series, &config))
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);

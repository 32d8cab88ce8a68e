use criterion::{criterion_group, criterion_main, Criterion};

use gbce::market::Market;

fn index_core_loop_test() {
    let market = Market::random(1000);
    let _ = market.all_share_index();
}

fn benchmarks(c: &mut Criterion) {
    c.bench_function("all share index", |b| b.iter(index_core_loop_test));
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};

use dlmm_quote_engine::graph::TokenGraph;
use dlmm_quote_engine::router::find_best_route;
use dlmm_quote_engine::store::{InMemoryStateStore, StateStore};

fn bench_find_best_route(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryStateStore::with_sample_data();
    let pairs = runtime
        .block_on(store.get_token_graph("v1"))
        .expect("sample fixture graph");
    let graph = TokenGraph::from_pairs(&pairs);

    c.bench_function("find_best_route_btc_usdc", |b| {
        b.iter(|| {
            runtime
                .block_on(find_best_route(&store, &graph, "BTC", "USDC", 1_000_000, 3))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_find_best_route);
criterion_main!(benches);

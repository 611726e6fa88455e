//! End-to-end scenarios against the in-memory fixture store, mirroring the
//! original system's `test_quotes.py`/`test_routing.py` suites.

use dlmm_quote_engine::graph::TokenGraph;
use dlmm_quote_engine::router::find_best_route;
use dlmm_quote_engine::store::{InMemoryStateStore, StateStore};

async fn fixture_graph(store: &InMemoryStateStore) -> TokenGraph {
    let pairs = store.get_token_graph("v1").await.unwrap();
    TokenGraph::from_pairs(&pairs)
}

fn step_amount_in(step: &dlmm_quote_engine::types::ExecutionStep) -> u128 {
    step.x_amount
        .as_deref()
        .or(step.y_amount.as_deref())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

#[tokio::test]
async fn small_swap_resolves_in_single_step_at_active_bin() {
    let store = InMemoryStateStore::with_sample_data();
    let graph = fixture_graph(&store).await;

    let route = find_best_route(&store, &graph, "BTC", "USDC", 1_000, 3)
        .await
        .unwrap();

    assert_eq!(route.execution_path.len(), 1);
    assert_eq!(route.execution_path[0].bin_id, 500);
}

#[tokio::test]
async fn larger_swap_walks_multiple_bins() {
    let store = InMemoryStateStore::with_sample_data();
    let graph = fixture_graph(&store).await;

    let route = find_best_route(&store, &graph, "BTC", "USDC", 500_000_000, 3)
        .await
        .unwrap();

    assert!(route.execution_path.len() > 1);
}

#[tokio::test]
async fn execution_path_amount_sum_matches_requested_input_exactly() {
    let store = InMemoryStateStore::with_sample_data();
    let graph = fixture_graph(&store).await;

    let amount_in = 123_456_789u128;
    let route = find_best_route(&store, &graph, "BTC", "USDC", amount_in, 3)
        .await
        .unwrap();

    let summed: u128 = route.execution_path.iter().map(step_amount_in).sum();
    assert_eq!(summed, amount_in);
}

#[tokio::test]
async fn multi_hop_route_found_through_shared_quote_token() {
    let store = InMemoryStateStore::with_sample_data();
    let graph = fixture_graph(&store).await;

    let route = find_best_route(&store, &graph, "SOL", "BTC", 10_000_000, 3)
        .await
        .unwrap();

    assert!(route.route_path.len() >= 2);
    assert_eq!(route.route_path.first().unwrap(), "SOL");
    assert_eq!(route.route_path.last().unwrap(), "BTC");
}

#[tokio::test]
async fn identical_requests_are_fully_deterministic() {
    let store = InMemoryStateStore::with_sample_data();
    let graph = fixture_graph(&store).await;

    let route_a = find_best_route(&store, &graph, "BTC", "USDC", 2_000_000, 3)
        .await
        .unwrap();
    let route_b = find_best_route(&store, &graph, "BTC", "USDC", 2_000_000, 3)
        .await
        .unwrap();

    assert_eq!(route_a, route_b);
}

#[tokio::test]
async fn fee_is_strictly_less_than_requested_amount_for_nonzero_fee_rate() {
    let store = InMemoryStateStore::with_sample_data();
    let graph = fixture_graph(&store).await;

    let amount_in = 5_000_000u128;
    let route = find_best_route(&store, &graph, "BTC", "USDC", amount_in, 3)
        .await
        .unwrap();

    assert!(route.total_fee < amount_in);
    assert!(route.amount_out > 0);
}

#[tokio::test]
async fn hop_bound_of_one_excludes_multihop_route() {
    let store = InMemoryStateStore::with_sample_data();
    let graph = fixture_graph(&store).await;

    let result = find_best_route(&store, &graph, "SOL", "BTC", 10_000_000, 1).await;
    assert!(result.is_err());
}

//! Shared-data prefetch: one batched round trip for every pool touched by
//! any candidate path, plus each pool's active bin, before simulation
//! starts. Grounded in `core/data.py::pre_fetch_shared_data`. Everything
//! this does NOT capture (non-active bin reserves) is deliberately left to
//! be re-read per hop through `StateStore::batch_get_bins`, so simulation
//! never works from stale liquidity.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::store::StateStore;
use crate::types::{Bin, CandidatePath, Pool};

#[derive(Debug, Clone)]
pub struct SharedPoolData {
    pub pool: Pool,
    pub active_bin_id: i64,
    pub active_bin_price: Decimal,
    pub active_bin: Option<Bin>,
}

/// Request-scoped cache of everything known to be consistent for the
/// duration of one quote request. Never shared across requests — a fresh
/// map is built per call.
pub type SharedData = HashMap<String, SharedPoolData>;

pub async fn prefetch_shared_data(
    store: &dyn StateStore,
    paths: &[CandidatePath],
    graph: &crate::graph::TokenGraph,
) -> anyhow::Result<SharedData> {
    let mut unique_pool_ids: Vec<String> = Vec::new();
    for path in paths {
        for window in path.tokens.windows(2) {
            for pool_id in graph.pools_for_pair(&window[0], &window[1]) {
                if !unique_pool_ids.iter().any(|p| p == pool_id) {
                    unique_pool_ids.push(pool_id.clone());
                }
            }
        }
    }

    let pools = store.batch_get_pools(&unique_pool_ids).await?;

    let mut shared = SharedData::new();
    for (pool_id, pool) in pools {
        let active_bin_id = pool.active_bin;
        let active_bin_price = match store.get_bin_price(&pool_id, active_bin_id).await? {
            Some(price) => price,
            None => {
                tracing::warn!(pool_id, "active bin price unavailable, dropping pool");
                continue;
            }
        };
        let active_bin = store.get_bin(&pool_id, active_bin_id).await?;

        shared.insert(
            pool_id,
            SharedPoolData {
                pool,
                active_bin_id,
                active_bin_price,
                active_bin,
            },
        );
    }

    Ok(shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TokenGraph;
    use crate::store::InMemoryStateStore;
    use crate::types::CandidatePath;

    #[tokio::test]
    async fn prefetch_collects_union_of_pools_across_paths() {
        let store = InMemoryStateStore::with_sample_data();
        let pairs = store.get_token_graph("v1").await.unwrap();
        let graph = TokenGraph::from_pairs(&pairs);

        let paths = vec![
            CandidatePath { tokens: vec!["BTC".into(), "USDC".into()] },
            CandidatePath { tokens: vec!["SOL".into(), "USDC".into()] },
        ];

        let shared = prefetch_shared_data(&store, &paths, &graph).await.unwrap();
        assert!(shared.contains_key("BTC-USDC-25"));
        assert!(shared.contains_key("BTC-USDC-50"));
        assert!(shared.contains_key("SOL-USDC-25"));
    }

    #[tokio::test]
    async fn prefetch_is_empty_for_no_paths() {
        let store = InMemoryStateStore::with_sample_data();
        let pairs = store.get_token_graph("v1").await.unwrap();
        let graph = TokenGraph::from_pairs(&pairs);
        let shared = prefetch_shared_data(&store, &[], &graph).await.unwrap();
        assert!(shared.is_empty());
    }
}

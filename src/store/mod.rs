//! Persistence boundary. `StateStore` is the one trait-object seam in this
//! crate: everything above it (graph, prefetch, simulator, router) is
//! synchronous and generic only over "something that implements
//! `StateStore`", so a request can run against either `RedisStateStore` or
//! `InMemoryStateStore` without the caller knowing which.

mod memory_store;
mod redis_store;
mod row;

pub use memory_store::InMemoryStateStore;
pub use redis_store::RedisStateStore;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::{Bin, Pool, Token};

/// Redis key layout, mirroring the original `redis/schemas.py::RedisSchema`.
pub mod schema {
    pub fn pool_key(pool_id: &str) -> String {
        format!("pool:{pool_id}")
    }

    pub fn bin_key(pool_id: &str, bin_id: i64) -> String {
        format!("bin:{pool_id}:{bin_id}")
    }

    pub fn pool_bins_zset_key(pool_id: &str) -> String {
        format!("pool:{pool_id}:bins")
    }

    pub fn token_graph_key(version: &str) -> String {
        format!("token_graph:{version}")
    }

    pub fn token_key(symbol: &str) -> String {
        format!("token:{symbol}")
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get_pool(&self, pool_id: &str) -> anyhow::Result<Option<Pool>>;

    async fn get_bin(&self, pool_id: &str, bin_id: i64) -> anyhow::Result<Option<Bin>>;

    async fn get_bin_price(&self, pool_id: &str, bin_id: i64) -> anyhow::Result<Option<rust_decimal::Decimal>>;

    /// Bin ids for `pool_id` with price >= `from_price`, ascending.
    async fn get_bin_prices_ascending(
        &self,
        pool_id: &str,
        from_price: rust_decimal::Decimal,
    ) -> anyhow::Result<Vec<i64>>;

    /// Bin ids for `pool_id` with price <= `from_price`, descending.
    async fn get_bin_prices_descending(
        &self,
        pool_id: &str,
        from_price: rust_decimal::Decimal,
    ) -> anyhow::Result<Vec<i64>>;

    async fn get_token_graph(&self, version: &str) -> anyhow::Result<HashMap<String, Vec<String>>>;

    async fn get_token(&self, symbol: &str) -> anyhow::Result<Option<Token>>;

    /// Single batched fetch for a set of pools. Missing pools are simply
    /// absent from the returned map; that is not an error.
    async fn batch_get_pools(&self, pool_ids: &[String]) -> anyhow::Result<HashMap<String, Pool>>;

    /// Single batched fetch for a set of bins within one pool.
    async fn batch_get_bins(
        &self,
        pool_id: &str,
        bin_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Bin>>;
}

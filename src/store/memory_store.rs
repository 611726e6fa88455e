//! Fixture `StateStore` backed by plain `HashMap`s, grounded in
//! `dlmm-simulator/src/quote_engine.py::MockRedisClient`: a handful of
//! sample pools with bell-curve liquidity around the active bin, usable by
//! tests and benches without a live Redis instance.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::math::fixture_bin_price;
use crate::types::{Bin, Pool, Token};

use super::StateStore;

#[derive(Default)]
pub struct InMemoryStateStore {
    pools: RwLock<HashMap<String, Pool>>,
    bins: RwLock<HashMap<(String, i64), Bin>>,
    graph: RwLock<HashMap<String, Vec<String>>>,
    tokens: RwLock<HashMap<String, Token>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_pool(&self, pool: Pool) {
        self.pools.write().unwrap().insert(pool.pool_id.clone(), pool);
    }

    pub fn insert_bin(&self, pool_id: &str, bin: Bin) {
        self.bins
            .write()
            .unwrap()
            .insert((pool_id.to_string(), bin.bin_id), bin);
    }

    pub fn insert_token(&self, token: Token) {
        self.tokens.write().unwrap().insert(token.symbol.clone(), token);
    }

    pub fn link_pair(&self, token_a: &str, token_b: &str, pool_id: &str) {
        let mut graph = self.graph.write().unwrap();
        let key = format!("{token_a}->{token_b}");
        let entry = graph.entry(key).or_default();
        if !entry.iter().any(|p| p == pool_id) {
            entry.push(pool_id.to_string());
        }
    }

    /// Populates the same three pools the original fixture data ships
    /// (BTC-USDC-25, BTC-USDC-50, SOL-USDC-25), each with bell-curve
    /// liquidity centered on its active bin.
    pub fn with_sample_data() -> Self {
        let store = Self::new();

        store.insert_token(Token { symbol: "BTC".into(), decimals: 8 });
        store.insert_token(Token { symbol: "USDC".into(), decimals: 6 });
        store.insert_token(Token { symbol: "SOL".into(), decimals: 9 });

        let btc_25 = Pool {
            pool_id: "BTC-USDC-25".into(),
            token0: "BTC".into(),
            token1: "USDC".into(),
            bin_step: Decimal::new(25, 4),
            active_bin: 500,
            active: true,
            x_protocol_fee_bps: 1,
            x_provider_fee_bps: 2,
            x_variable_fee_bps: 2,
            y_protocol_fee_bps: 1,
            y_provider_fee_bps: 2,
            y_variable_fee_bps: 2,
        };
        let btc_50 = Pool {
            bin_step: Decimal::new(50, 4),
            pool_id: "BTC-USDC-50".into(),
            ..btc_25.clone()
        };
        let sol_25 = Pool {
            pool_id: "SOL-USDC-25".into(),
            token0: "SOL".into(),
            token1: "USDC".into(),
            bin_step: Decimal::new(25, 4),
            active_bin: 500,
            active: true,
            x_protocol_fee_bps: 1,
            x_provider_fee_bps: 2,
            x_variable_fee_bps: 2,
            y_protocol_fee_bps: 1,
            y_provider_fee_bps: 2,
            y_variable_fee_bps: 2,
        };

        for pool in [btc_25, btc_50, sol_25] {
            store.link_pair(&pool.token0, &pool.token1, &pool.pool_id);
            seed_bell_curve_bins(&store, &pool);
            store.insert_pool(pool);
        }

        store
    }
}

/// Seeds 21 bins (active bin +/- 10) with liquidity falling off away from
/// the active bin, matching the general shape of the original fixture's
/// bell-curve generator.
fn seed_bell_curve_bins(store: &InMemoryStateStore, pool: &Pool) {
    const RADIUS: i64 = 10;
    const PEAK_LIQUIDITY: u128 = 1_000_000_000;

    for offset in -RADIUS..=RADIUS {
        let bin_id = pool.active_bin + offset;
        let falloff = 1.0 - (offset.unsigned_abs() as f64 / (RADIUS as f64 + 1.0));
        let liquidity = (PEAK_LIQUIDITY as f64 * falloff) as u128;
        // Fixture generation has no independent authoritative price to
        // read, so it's the one legitimate caller of the formula — once
        // stored here, `Bin::price` is what every lookup uses.
        let price = fixture_bin_price(pool, bin_id);

        let (reserve_x, reserve_y) = if offset <= 0 {
            // at/below active: composed of both sides, mostly Y
            (liquidity / 10, liquidity)
        } else {
            // above active: X-only liquidity
            (liquidity, 0)
        };

        store.insert_bin(
            &pool.pool_id,
            Bin {
                bin_id,
                price,
                reserve_x,
                reserve_y,
                liquidity,
            },
        );
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get_pool(&self, pool_id: &str) -> Result<Option<Pool>> {
        Ok(self.pools.read().unwrap().get(pool_id).cloned())
    }

    async fn get_bin(&self, pool_id: &str, bin_id: i64) -> Result<Option<Bin>> {
        Ok(self
            .bins
            .read()
            .unwrap()
            .get(&(pool_id.to_string(), bin_id))
            .copied())
    }

    async fn get_bin_price(&self, pool_id: &str, bin_id: i64) -> Result<Option<Decimal>> {
        Ok(self
            .bins
            .read()
            .unwrap()
            .get(&(pool_id.to_string(), bin_id))
            .map(|b| b.price))
    }

    async fn get_bin_prices_ascending(&self, pool_id: &str, from_price: Decimal) -> Result<Vec<i64>> {
        let bins = self.bins.read().unwrap();
        let mut ids: Vec<i64> = bins
            .iter()
            .filter(|((pid, _), _)| pid == pool_id)
            .filter(|(_, bin)| bin.price >= from_price)
            .map(|((_, bin_id), _)| *bin_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn get_bin_prices_descending(&self, pool_id: &str, from_price: Decimal) -> Result<Vec<i64>> {
        let bins = self.bins.read().unwrap();
        let mut ids: Vec<i64> = bins
            .iter()
            .filter(|((pid, _), _)| pid == pool_id)
            .filter(|(_, bin)| bin.price <= from_price)
            .map(|((_, bin_id), _)| *bin_id)
            .collect();
        ids.sort_by(|a, b| b.cmp(a));
        Ok(ids)
    }

    async fn get_token_graph(&self, _version: &str) -> Result<HashMap<String, Vec<String>>> {
        Ok(self.graph.read().unwrap().clone())
    }

    async fn get_token(&self, symbol: &str) -> Result<Option<Token>> {
        Ok(self.tokens.read().unwrap().get(symbol).cloned())
    }

    async fn batch_get_pools(&self, pool_ids: &[String]) -> Result<HashMap<String, Pool>> {
        let pools = self.pools.read().unwrap();
        Ok(pool_ids
            .iter()
            .filter_map(|id| pools.get(id).map(|p| (id.clone(), p.clone())))
            .collect())
    }

    async fn batch_get_bins(&self, pool_id: &str, bin_ids: &[i64]) -> Result<HashMap<i64, Bin>> {
        let bins = self.bins.read().unwrap();
        Ok(bin_ids
            .iter()
            .filter_map(|&id| bins.get(&(pool_id.to_string(), id)).map(|b| (id, *b)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_data_round_trips_pool_lookup() {
        let store = InMemoryStateStore::with_sample_data();
        let pool = store.get_pool("BTC-USDC-25").await.unwrap().unwrap();
        assert_eq!(pool.active_bin, 500);
    }

    #[tokio::test]
    async fn batch_get_pools_skips_missing_ids() {
        let store = InMemoryStateStore::with_sample_data();
        let result = store
            .batch_get_pools(&["BTC-USDC-25".to_string(), "NOPE".to_string()])
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn ascending_bin_prices_are_sorted() {
        let store = InMemoryStateStore::with_sample_data();
        let ids = store
            .get_bin_prices_ascending("BTC-USDC-25", Decimal::MIN)
            .await
            .unwrap();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}

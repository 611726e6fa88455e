//! Redis-backed `StateStore`. Batched reads go through a single
//! `redis::pipe()` round trip, mirroring `core/data.py::pre_fetch_shared_data`
//! and `batch_load_bin_reserves`, which pipeline one `HGETALL` per pool/bin
//! instead of issuing them serially.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::{Bin, Pool, Token};

use super::row;
use super::schema;
use super::StateStore;

pub struct RedisStateStore {
    manager: redis::aio::ConnectionManager,
}

impl RedisStateStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("building redis client")?;
        let manager = client
            .get_connection_manager()
            .await
            .context("establishing redis connection manager")?;
        Ok(Self { manager })
    }

    async fn hgetall(&self, key: &str) -> Result<Option<HashMap<String, String>>> {
        let mut conn = self.manager.clone();
        let map: HashMap<String, String> = conn.hgetall(key).await.context("HGETALL")?;
        if map.is_empty() {
            Ok(None)
        } else {
            Ok(Some(map))
        }
    }

    /// Reads a bin's authoritative price straight off its score in the
    /// `pool:{pool_id}:bins` sorted set — never recomputed from the formula.
    async fn zscore_price(&self, pool_id: &str, bin_id: i64) -> Result<Option<Decimal>> {
        let mut conn = self.manager.clone();
        let score: Option<f64> = conn
            .zscore(schema::pool_bins_zset_key(pool_id), bin_id)
            .await
            .context("ZSCORE")?;
        Ok(score.and_then(Decimal::from_f64_retain))
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get_pool(&self, pool_id: &str) -> Result<Option<Pool>> {
        match self.hgetall(&schema::pool_key(pool_id)).await? {
            Some(raw) => Ok(Some(row::decode_pool(&raw)?)),
            None => Ok(None),
        }
    }

    async fn get_bin(&self, pool_id: &str, bin_id: i64) -> Result<Option<Bin>> {
        let raw = self.hgetall(&schema::bin_key(pool_id, bin_id)).await?;
        let Some(raw) = raw else { return Ok(None) };
        let Some(price) = self.zscore_price(pool_id, bin_id).await? else {
            return Ok(None);
        };
        Ok(Some(row::decode_bin(&raw, price)?))
    }

    async fn get_bin_price(&self, pool_id: &str, bin_id: i64) -> Result<Option<Decimal>> {
        self.zscore_price(pool_id, bin_id).await
    }

    async fn get_bin_prices_ascending(&self, pool_id: &str, from_price: Decimal) -> Result<Vec<i64>> {
        let mut conn = self.manager.clone();
        let lower = from_price.to_f64().unwrap_or(f64::MIN);
        let ids: Vec<i64> = conn
            .zrangebyscore(schema::pool_bins_zset_key(pool_id), lower, f64::MAX)
            .await
            .context("ZRANGEBYSCORE ascending")?;
        Ok(ids)
    }

    async fn get_bin_prices_descending(&self, pool_id: &str, from_price: Decimal) -> Result<Vec<i64>> {
        let mut conn = self.manager.clone();
        let upper = from_price.to_f64().unwrap_or(f64::MAX);
        let ids: Vec<i64> = conn
            .zrevrangebyscore(schema::pool_bins_zset_key(pool_id), upper, f64::MIN)
            .await
            .context("ZREVRANGEBYSCORE descending")?;
        Ok(ids)
    }

    async fn get_token_graph(&self, version: &str) -> Result<HashMap<String, Vec<String>>> {
        let mut conn = self.manager.clone();
        let raw: HashMap<String, String> = conn
            .hgetall(schema::token_graph_key(version))
            .await
            .context("HGETALL token_graph")?;
        raw.into_iter()
            .map(|(pair, pools_json)| {
                let pools: Vec<String> =
                    serde_json::from_str(&pools_json).context("decoding token_graph pool list")?;
                Ok((pair, pools))
            })
            .collect()
    }

    async fn get_token(&self, symbol: &str) -> Result<Option<Token>> {
        match self.hgetall(&schema::token_key(symbol)).await? {
            Some(raw) => {
                let decimals: u8 = raw
                    .get("decimals")
                    .context("missing decimals")?
                    .parse()
                    .context("decimals not a number")?;
                Ok(Some(Token {
                    symbol: symbol.to_string(),
                    decimals,
                }))
            }
            None => Ok(None),
        }
    }

    async fn batch_get_pools(&self, pool_ids: &[String]) -> Result<HashMap<String, Pool>> {
        if pool_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.manager.clone();
        let mut pipe = redis::pipe();
        for pool_id in pool_ids {
            pipe.hgetall(schema::pool_key(pool_id));
        }
        let rows: Vec<HashMap<String, String>> =
            pipe.query_async(&mut conn).await.context("pipelined pool batch fetch")?;

        let mut out = HashMap::new();
        for (pool_id, raw) in pool_ids.iter().zip(rows) {
            if raw.is_empty() {
                continue;
            }
            match row::decode_pool(&raw) {
                Ok(pool) => {
                    out.insert(pool_id.clone(), pool);
                }
                Err(e) => tracing::warn!(pool_id, error = %e, "dropping pool with invalid row"),
            }
        }
        Ok(out)
    }

    async fn batch_get_bins(&self, pool_id: &str, bin_ids: &[i64]) -> Result<HashMap<i64, Bin>> {
        if bin_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.manager.clone();
        let zset_key = schema::pool_bins_zset_key(pool_id);
        let mut pipe = redis::pipe();
        for bin_id in bin_ids {
            pipe.hgetall(schema::bin_key(pool_id, *bin_id));
            pipe.zscore(&zset_key, *bin_id);
        }
        // Interleaved HGETALL/ZSCORE replies come back as one flat sequence,
        // so each command's reply type is parsed individually off raw `Value`s.
        let replies: Vec<redis::Value> =
            pipe.query_async(&mut conn).await.context("pipelined bin batch fetch")?;

        let mut out = HashMap::new();
        for (i, bin_id) in bin_ids.iter().enumerate() {
            let raw: HashMap<String, String> =
                redis::FromRedisValue::from_redis_value(&replies[2 * i]).context("decoding bin hash reply")?;
            if raw.is_empty() {
                continue;
            }
            let score: Option<f64> =
                redis::FromRedisValue::from_redis_value(&replies[2 * i + 1]).context("decoding bin score reply")?;
            let Some(price) = score.and_then(Decimal::from_f64_retain) else {
                continue;
            };
            if let Ok(bin) = row::decode_bin(&raw, price) {
                out.insert(*bin_id, bin);
            }
        }
        Ok(out)
    }
}

//! Decodes raw persisted rows into typed domain values and applies the
//! validation rules the original `PoolData.validate()`/`BinData.validate()`
//! performed in Python before trusting a row for simulation.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;

use crate::types::{Bin, Pool};

fn field<'a>(row: &'a HashMap<String, String>, name: &str) -> Result<&'a str> {
    row.get(name)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("missing field `{name}` in persisted row"))
}

fn parse_field<T: FromStr>(row: &HashMap<String, String>, name: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    field(row, name)?
        .parse::<T>()
        .map_err(|e| anyhow!("field `{name}` failed to parse: {e}"))
}

pub fn decode_pool(row: &HashMap<String, String>) -> Result<Pool> {
    let pool = Pool {
        pool_id: field(row, "pool_id")?.to_string(),
        token0: field(row, "token0")?.to_string(),
        token1: field(row, "token1")?.to_string(),
        bin_step: parse_field(row, "bin_step").context("bin_step")?,
        active_bin: parse_field(row, "active_bin").context("active_bin")?,
        active: parse_field::<u8>(row, "active").context("active")? != 0,
        x_protocol_fee_bps: parse_field(row, "x_protocol_fee").context("x_protocol_fee")?,
        x_provider_fee_bps: parse_field(row, "x_provider_fee").context("x_provider_fee")?,
        x_variable_fee_bps: parse_field(row, "x_variable_fee").context("x_variable_fee")?,
        y_protocol_fee_bps: parse_field(row, "y_protocol_fee").context("y_protocol_fee")?,
        y_provider_fee_bps: parse_field(row, "y_provider_fee").context("y_provider_fee")?,
        y_variable_fee_bps: parse_field(row, "y_variable_fee").context("y_variable_fee")?,
    };
    validate_pool(&pool)?;
    Ok(pool)
}

pub fn validate_pool(pool: &Pool) -> Result<()> {
    if pool.pool_id.is_empty() {
        return Err(anyhow!("pool_id must not be empty"));
    }
    if pool.token0.is_empty() || pool.token1.is_empty() || pool.token0 == pool.token1 {
        return Err(anyhow!("pool {} has invalid token pair", pool.pool_id));
    }
    if pool.bin_step <= Decimal::ZERO {
        return Err(anyhow!("pool {} has non-positive bin_step", pool.pool_id));
    }
    Ok(())
}

/// `price` is the bin's score in the `pool:{pool_id}:bins` sorted set —
/// passed in separately because it lives outside the bin's own hash row.
pub fn decode_bin(row: &HashMap<String, String>, price: Decimal) -> Result<Bin> {
    let bin = Bin {
        bin_id: parse_field(row, "bin_id").context("bin_id")?,
        price,
        reserve_x: parse_field(row, "reserve_x").context("reserve_x")?,
        reserve_y: parse_field(row, "reserve_y").context("reserve_y")?,
        liquidity: parse_field(row, "liquidity").context("liquidity")?,
    };
    Ok(bin)
}

//! Bin-price formula, grounded in `dlmm-simulator/src/math.py`
//! (`DLMMMath.calculate_bin_price`): `P(i) = P_active * (1+s)^(i-active_id)`.
//!
//! The persisted price (the `pool:{pool_id}:bins` sorted-set score) is
//! authoritative once a bin has been read from the store — neither the
//! store layer nor the simulator recompute it from this formula. The only
//! legitimate caller of `fixture_bin_price` is fixture generation, which
//! has no independent authoritative price to read and must derive one.

use rust_decimal::Decimal;

use crate::types::Pool;

pub fn fixture_bin_price(pool: &Pool, bin_id: i64) -> Decimal {
    let exponent = bin_id - pool.active_bin;
    let base = Decimal::ONE + pool.bin_step;
    pow_decimal(base, exponent)
}

/// Integer-exponent `Decimal` power; `rust_decimal` has no native `powi`
/// for negative exponents, so this multiplies out the magnitude and
/// inverts for negative exponents.
pub fn pow_decimal(base: Decimal, exponent: i64) -> Decimal {
    if exponent == 0 {
        return Decimal::ONE;
    }
    let magnitude = exponent.unsigned_abs();
    let mut result = Decimal::ONE;
    for _ in 0..magnitude {
        result *= base;
    }
    if exponent < 0 {
        Decimal::ONE / result
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_pool() -> Pool {
        Pool {
            pool_id: "BTC-USDC-25".into(),
            token0: "BTC".into(),
            token1: "USDC".into(),
            bin_step: dec!(0.0025),
            active_bin: 500,
            active: true,
            x_protocol_fee_bps: 1,
            x_provider_fee_bps: 2,
            x_variable_fee_bps: 0,
            y_protocol_fee_bps: 1,
            y_provider_fee_bps: 2,
            y_variable_fee_bps: 0,
        }
    }

    #[test]
    fn active_bin_price_is_one() {
        let pool = sample_pool();
        assert_eq!(fixture_bin_price(&pool, pool.active_bin), Decimal::ONE);
    }

    #[test]
    fn price_increases_moving_away_from_active_bin_upward() {
        let pool = sample_pool();
        let p_active = fixture_bin_price(&pool, 500);
        let p_above = fixture_bin_price(&pool, 501);
        assert!(p_above > p_active);
    }

    #[test]
    fn price_decreases_moving_below_active_bin() {
        let pool = sample_pool();
        let p_active = fixture_bin_price(&pool, 500);
        let p_below = fixture_bin_price(&pool, 499);
        assert!(p_below < p_active);
    }
}

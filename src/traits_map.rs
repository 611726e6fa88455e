//! Compile-time mapping from pool ids / token symbols to the opaque
//! contract-trait identifiers an on-chain router addresses calls with.
//! Grounded in the original system's `utils/traits.py::TraitMappings`:
//! a hardcoded table with documented fallback rules for anything absent
//! from it.

use once_cell::sync::Lazy;
use std::collections::HashMap;

const DEFAULT_POOL_TRAIT: &str = "dlmm-pool-trait-v-1-1";

static POOL_TRAITS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("BTC-USDC-25", "dlmm-pool-btc-usdc-v-1-1"),
        ("BTC-USDC-50", "dlmm-pool-btc-usdc-v-1-1"),
        ("SOL-USDC-25", "dlmm-pool-sol-usdc-v-1-1"),
    ])
});

static TOKEN_TRAITS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("BTC", "sbtc-trait"),
        ("SOL", "ssol-trait"),
        ("USDC", "susdc-trait"),
    ])
});

/// Resolves a pool's on-chain trait, falling back to the generic DLMM pool
/// trait for any pool id not explicitly listed.
pub fn pool_trait(pool_id: &str) -> String {
    POOL_TRAITS
        .get(pool_id)
        .map(|s| s.to_string())
        .unwrap_or_else(|| DEFAULT_POOL_TRAIT.to_string())
}

/// Resolves a token's on-chain trait, falling back to
/// `{lowercase(symbol)}-trait` for any symbol not explicitly listed.
pub fn token_trait(symbol: &str) -> String {
    TOKEN_TRAITS
        .get(symbol)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}-trait", symbol.to_lowercase()))
}

/// Names the contract entry point for a given swap direction.
pub fn function_name(swap_for_y: bool) -> &'static str {
    if swap_for_y {
        "swap-x-for-y"
    } else {
        "swap-y-for-x"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pool_resolves_explicit_trait() {
        assert_eq!(pool_trait("BTC-USDC-25"), "dlmm-pool-btc-usdc-v-1-1");
    }

    #[test]
    fn unknown_pool_falls_back_to_default() {
        assert_eq!(pool_trait("ETH-USDC-10"), DEFAULT_POOL_TRAIT);
    }

    #[test]
    fn unknown_token_falls_back_to_lowercase_trait() {
        assert_eq!(token_trait("ETH"), "eth-trait");
    }

    #[test]
    fn function_name_matches_direction() {
        assert_eq!(function_name(true), "swap-x-for-y");
        assert_eq!(function_name(false), "swap-y-for-x");
    }
}

//! Domain types shared across the graph, prefetch, simulator and router
//! modules. These replace the EVM-flavored `SwapStep`/`SwapPath` pair with
//! the on-chain-trait-addressed shapes the DLMM execution layer expects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub decimals: u8,
}

/// Pool metadata as persisted under `pool:{pool_id}`. Fee fields are basis
/// points (1 bps = 0.01%), summed across protocol/provider/variable
/// components per side before being applied as a fraction of `amount_in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub pool_id: String,
    pub token0: String,
    pub token1: String,
    pub bin_step: Decimal,
    pub active_bin: i64,
    pub active: bool,
    pub x_protocol_fee_bps: u32,
    pub x_provider_fee_bps: u32,
    pub x_variable_fee_bps: u32,
    pub y_protocol_fee_bps: u32,
    pub y_provider_fee_bps: u32,
    pub y_variable_fee_bps: u32,
}

impl Pool {
    pub fn x_fee_rate(&self) -> Decimal {
        Decimal::from(self.x_protocol_fee_bps + self.x_provider_fee_bps + self.x_variable_fee_bps)
            / Decimal::from(10_000u32)
    }

    pub fn y_fee_rate(&self) -> Decimal {
        Decimal::from(self.y_protocol_fee_bps + self.y_provider_fee_bps + self.y_variable_fee_bps)
            / Decimal::from(10_000u32)
    }

    pub fn other_token(&self, token: &str) -> Option<&str> {
        if token == self.token0 {
            Some(&self.token1)
        } else if token == self.token1 {
            Some(&self.token0)
        } else {
            None
        }
    }
}

/// A single bin's reserves, as persisted under `bin:{pool_id}:{bin_id}`.
/// `price` is the stored score of that bin's entry in the
/// `pool:{pool_id}:bins` sorted set — authoritative, never recomputed from
/// the `P(i) = P_active * (1+s)^(i-active)` formula once it has been read
/// off a real row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub bin_id: i64,
    pub price: Decimal,
    pub reserve_x: u128,
    pub reserve_y: u128,
    pub liquidity: u128,
}

/// One entry of a flattened, replayable execution path. Mirrors the shape
/// an on-chain router expects: a contract trait to call, the two token
/// traits involved, which bin it fills against, which function to invoke,
/// and the exact input amount attributable to that step. Only one of
/// `x_amount`/`y_amount` is ever populated — which one depends on
/// `function_name` — the other is left absent entirely, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub pool_trait: String,
    pub x_token_trait: String,
    pub y_token_trait: String,
    pub bin_id: i64,
    pub function_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_amount: Option<String>,
}

/// A candidate multi-hop route through the token graph, prior to
/// simulation: just the ordered list of token symbols it visits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidatePath {
    pub tokens: Vec<String>,
}

impl CandidatePath {
    pub fn hops(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }
}

/// Result of simulating a single pool hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolQuote {
    pub success: bool,
    pub amount_out: u128,
    pub execution_path: Vec<ExecutionStep>,
    pub fee_amount: u128,
    pub effective_amount_in: u128,
}

/// Result of selecting the best route across all candidate paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuote {
    pub amount_in: u128,
    pub amount_out: u128,
    pub route_path: Vec<String>,
    pub execution_path: Vec<ExecutionStep>,
    pub total_fee: u128,
    pub fee_rate_avg: Decimal,
    pub price_impact_bps: u32,
}

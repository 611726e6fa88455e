//! Per-pool bin-walk swap simulator: `compute_quote`. Grounded in
//! `core/quote.py::compute_quote`, generalized from
//! `Calculator::compute_amount_out`'s dispatch-by-protocol shape (one
//! function per pool type, called from the router's per-hop loop) to a
//! single DLMM bin-walk routine, since there is only one pool type here.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::APP_CONFIG;
use crate::prefetch::SharedData;
use crate::store::StateStore;
use crate::traits_map::{function_name, pool_trait, token_trait};
use crate::types::{ExecutionStep, PoolQuote};

fn to_u128_rounded(value: Decimal) -> u128 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_u128()
        .unwrap_or(0)
}

/// Reads whichever of `x_amount`/`y_amount` is populated on a step — exactly
/// one always is, since each step fills against only one side of the bin.
fn step_amount_in(step: &ExecutionStep) -> u128 {
    step.x_amount
        .as_deref()
        .or(step.y_amount.as_deref())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

fn set_step_amount_in(step: &mut ExecutionStep, amount: u128) {
    if step.x_amount.is_some() {
        step.x_amount = Some(amount.to_string());
    } else {
        step.y_amount = Some(amount.to_string());
    }
}

/// Simulates filling `amount_in` of `input_token` against `pool_id`,
/// returning the exact output and a replayable execution path.
///
/// Per-bin fill rule: only the *output*-side reserve constrains how much
/// of a bin can be used (the input-side reserve is never checked) — this
/// matches `math.py::swap_within_bin`, which the distilled input-side
/// reserve question had left open.
pub async fn compute_quote(
    store: &dyn StateStore,
    shared: &SharedData,
    pool_id: &str,
    input_token: &str,
    output_token: &str,
    amount_in: u128,
) -> anyhow::Result<PoolQuote> {
    let Some(shared_pool) = shared.get(pool_id) else {
        return Ok(PoolQuote {
            success: false,
            amount_out: 0,
            execution_path: Vec::new(),
            fee_amount: 0,
            effective_amount_in: 0,
        });
    };
    let pool = &shared_pool.pool;

    let swap_for_y = input_token == pool.token0;
    if !swap_for_y && input_token != pool.token1 {
        anyhow::bail!("token {input_token} is not part of pool {pool_id}");
    }
    if output_token != pool.other_token(input_token).unwrap_or_default() {
        anyhow::bail!("token pair {input_token}/{output_token} does not match pool {pool_id}");
    }

    let fee_rate = if swap_for_y { pool.x_fee_rate() } else { pool.y_fee_rate() };
    let amount_in_dec = Decimal::from(amount_in);
    let fee_amount_dec = amount_in_dec * fee_rate;
    let effective_amount_in_dec = amount_in_dec - fee_amount_dec;

    let bin_ids = if swap_for_y {
        store
            .get_bin_prices_descending(pool_id, shared_pool.active_bin_price)
            .await?
    } else {
        store
            .get_bin_prices_ascending(pool_id, shared_pool.active_bin_price)
            .await?
    };
    let bin_ids: Vec<i64> = bin_ids.into_iter().take(APP_CONFIG.max_bin_traversal).collect();

    let bins = store.batch_get_bins(pool_id, &bin_ids).await?;

    let x_trait = token_trait(&pool.token0);
    let y_trait = token_trait(&pool.token1);
    let trait_id = pool_trait(pool_id);
    let func_name = function_name(swap_for_y);

    let mut remaining = effective_amount_in_dec;
    let mut total_out = Decimal::ZERO;
    let mut execution_path: Vec<ExecutionStep> = Vec::new();

    for &bin_id in &bin_ids {
        if remaining <= Decimal::ZERO {
            break;
        }
        let Some(bin) = bins.get(&bin_id) else { continue };
        let price = bin.price;

        let (used_effective, out_this) = if swap_for_y {
            let available_y = Decimal::from(bin.reserve_y);
            if available_y.is_zero() || price.is_zero() {
                continue;
            }
            let max_x_usable = available_y / price;
            let used = remaining.min(max_x_usable);
            (used, used * price)
        } else {
            let available_x = Decimal::from(bin.reserve_x);
            if available_x.is_zero() {
                continue;
            }
            let max_y_usable = available_x * price;
            let used = remaining.min(max_y_usable);
            (used, if price.is_zero() { Decimal::ZERO } else { used / price })
        };

        if used_effective <= Decimal::ZERO {
            continue;
        }

        remaining -= used_effective;
        total_out += out_this;

        let partial_amount_in = if fee_rate < Decimal::ONE {
            used_effective / (Decimal::ONE - fee_rate)
        } else {
            used_effective
        };

        let partial_amount_in = to_u128_rounded(partial_amount_in);
        let (x_amount, y_amount) = if swap_for_y {
            (Some(partial_amount_in.to_string()), None)
        } else {
            (None, Some(partial_amount_in.to_string()))
        };

        execution_path.push(ExecutionStep {
            pool_trait: trait_id.clone(),
            x_token_trait: x_trait.clone(),
            y_token_trait: y_trait.clone(),
            bin_id,
            function_name: func_name.to_string(),
            x_amount,
            y_amount,
        });
    }

    if execution_path.is_empty() {
        return Ok(PoolQuote {
            success: false,
            amount_out: 0,
            execution_path: Vec::new(),
            fee_amount: to_u128_rounded(fee_amount_dec),
            effective_amount_in: to_u128_rounded(effective_amount_in_dec),
        });
    }

    // Rounding reconciliation: force the sum of per-step input amounts to
    // equal amount_in exactly by folding the residual into the last step.
    let summed: u128 = execution_path.iter().map(step_amount_in).sum();
    let last = execution_path.last_mut().expect("checked non-empty above");
    let last_amount = step_amount_in(last);
    let reconciled = if summed > amount_in {
        last_amount.saturating_sub(summed - amount_in)
    } else if summed < amount_in {
        last_amount + (amount_in - summed)
    } else {
        last_amount
    };
    set_step_amount_in(last, reconciled);

    Ok(PoolQuote {
        success: true,
        amount_out: to_u128_rounded(total_out),
        execution_path,
        fee_amount: to_u128_rounded(fee_amount_dec),
        effective_amount_in: to_u128_rounded(effective_amount_in_dec),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TokenGraph;
    use crate::prefetch::prefetch_shared_data;
    use crate::store::InMemoryStateStore;
    use crate::types::CandidatePath;

    async fn shared_for(store: &InMemoryStateStore, a: &str, b: &str) -> SharedData {
        let pairs = store.get_token_graph("v1").await.unwrap();
        let graph = TokenGraph::from_pairs(&pairs);
        let paths = vec![CandidatePath { tokens: vec![a.into(), b.into()] }];
        prefetch_shared_data(store, &paths, &graph).await.unwrap()
    }

    #[tokio::test]
    async fn small_swap_fills_within_active_bin_only() {
        let store = InMemoryStateStore::with_sample_data();
        let shared = shared_for(&store, "BTC", "USDC").await;

        // A tiny swap should resolve in a single step at the active bin.
        let quote = compute_quote(&store, &shared, "BTC-USDC-25", "BTC", "USDC", 1_000)
            .await
            .unwrap();

        assert!(quote.success);
        assert_eq!(quote.execution_path.len(), 1);
        assert_eq!(quote.execution_path[0].bin_id, 500);
    }

    #[tokio::test]
    async fn execution_path_amounts_sum_to_amount_in_exactly() {
        let store = InMemoryStateStore::with_sample_data();
        let shared = shared_for(&store, "BTC", "USDC").await;

        let amount_in = 50_000_000u128;
        let quote = compute_quote(&store, &shared, "BTC-USDC-25", "BTC", "USDC", amount_in)
            .await
            .unwrap();

        let summed: u128 = quote.execution_path.iter().map(step_amount_in).sum();
        assert_eq!(summed, amount_in);
    }

    #[tokio::test]
    async fn unrelated_token_pair_is_rejected() {
        let store = InMemoryStateStore::with_sample_data();
        let shared = shared_for(&store, "BTC", "USDC").await;

        let result = compute_quote(&store, &shared, "BTC-USDC-25", "SOL", "USDC", 1_000).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn missing_pool_in_shared_data_yields_unsuccessful_quote() {
        let store = InMemoryStateStore::with_sample_data();
        let shared = SharedData::new();
        let quote = compute_quote(&store, &shared, "BTC-USDC-25", "BTC", "USDC", 1_000)
            .await
            .unwrap();
        assert!(!quote.success);
    }
}

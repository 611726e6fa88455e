//! Route selection: `find_best_route` picks, per hop, the single pool that
//! maximizes realized output, and across candidate paths the one with the
//! best end-to-end output. Modeled on
//! `Calculator::find_best_route` (hop loop tracking a running amount and a
//! best-so-far profit) generalized to multi-hop/multi-path selection, and
//! cross-checked against `core/quote.py::find_best_route` for the exact
//! field set returned.

use rust_decimal::Decimal;

use crate::error::{QuoteError, Result};
use crate::graph::TokenGraph;
use crate::prefetch::prefetch_shared_data;
use crate::simulator::compute_quote;
use crate::store::StateStore;
use crate::types::{ExecutionStep, RouteQuote};

struct HopOutcome {
    amount_out: u128,
    fee_amount: u128,
    execution_path: Vec<ExecutionStep>,
}

async fn best_pool_for_hop(
    store: &dyn StateStore,
    shared: &crate::prefetch::SharedData,
    graph: &TokenGraph,
    token_in: &str,
    token_out: &str,
    amount_in: u128,
) -> anyhow::Result<Option<HopOutcome>> {
    let mut best: Option<HopOutcome> = None;

    for pool_id in graph.pools_for_pair(token_in, token_out) {
        let quote = compute_quote(store, shared, pool_id, token_in, token_out, amount_in).await?;
        if !quote.success {
            continue;
        }
        if best.as_ref().map(|b| quote.amount_out > b.amount_out).unwrap_or(true) {
            best = Some(HopOutcome {
                amount_out: quote.amount_out,
                fee_amount: quote.fee_amount,
                execution_path: quote.execution_path,
            });
        }
    }

    Ok(best)
}

struct PathOutcome {
    amount_out: u128,
    total_fee: u128,
    execution_path: Vec<ExecutionStep>,
}

async fn simulate_path(
    store: &dyn StateStore,
    shared: &crate::prefetch::SharedData,
    graph: &TokenGraph,
    path: &crate::types::CandidatePath,
    amount_in: u128,
) -> anyhow::Result<Option<PathOutcome>> {
    let mut current_amount = amount_in;
    let mut total_fee = 0u128;
    let mut execution_path = Vec::new();

    for window in path.tokens.windows(2) {
        let (token_in, token_out) = (&window[0], &window[1]);
        match best_pool_for_hop(store, shared, graph, token_in, token_out, current_amount).await? {
            Some(hop) => {
                current_amount = hop.amount_out;
                total_fee += hop.fee_amount;
                execution_path.extend(hop.execution_path);
            }
            None => return Ok(None),
        }
    }

    Ok(Some(PathOutcome {
        amount_out: current_amount,
        total_fee,
        execution_path,
    }))
}

pub async fn find_best_route(
    store: &dyn StateStore,
    graph: &TokenGraph,
    input_token: &str,
    output_token: &str,
    amount_in: u128,
    max_hops: usize,
) -> Result<RouteQuote> {
    if input_token == output_token {
        return Err(QuoteError::InvalidRequest(
            "input_token and output_token must differ".into(),
        ));
    }
    // A zero-amount request is a trivial, successful no-op quote rather than
    // an invalid one — it short-circuits before touching the graph or store.
    if amount_in == 0 {
        return Ok(RouteQuote {
            amount_in: 0,
            amount_out: 0,
            route_path: vec![input_token.to_string(), output_token.to_string()],
            execution_path: Vec::new(),
            total_fee: 0,
            fee_rate_avg: Decimal::ZERO,
            price_impact_bps: 0,
        });
    }

    let paths = graph.enumerate_paths(input_token, output_token, max_hops);
    if paths.is_empty() {
        return Err(QuoteError::NoRouteFound);
    }

    let shared = prefetch_shared_data(store, &paths, graph)
        .await
        .map_err(QuoteError::StoreFailure)?;

    let mut best_path: Option<(&crate::types::CandidatePath, PathOutcome)> = None;

    for path in &paths {
        let Some(outcome) = simulate_path(store, &shared, graph, path, amount_in)
            .await
            .map_err(QuoteError::StoreFailure)?
        else {
            continue;
        };

        let is_better = best_path
            .as_ref()
            .map(|(_, best)| outcome.amount_out > best.amount_out)
            .unwrap_or(true);

        if is_better {
            best_path = Some((path, outcome));
        }
    }

    let (path, outcome) = best_path.ok_or(QuoteError::NoViableQuote)?;

    let fee_rate_avg = Decimal::from(outcome.total_fee) / Decimal::from(amount_in);

    Ok(RouteQuote {
        amount_in,
        amount_out: outcome.amount_out,
        route_path: path.tokens.clone(),
        execution_path: outcome.execution_path,
        total_fee: outcome.total_fee,
        fee_rate_avg,
        // Left at zero: see the Design Notes resolution on price_impact_bps.
        price_impact_bps: 0,
    })
}

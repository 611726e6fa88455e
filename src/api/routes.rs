use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;

use crate::config::APP_CONFIG;
use crate::error::QuoteError;
use crate::graph::TokenGraph;
use crate::router::find_best_route;
use crate::store::StateStore;

use super::models::{HealthResponse, QuoteRequest, QuoteResponse};

pub struct AppState {
    pub store: Arc<dyn StateStore>,
    pub token_graph_version: String,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/quote", post(quote))
        .route("/pools", get(list_pools))
        .route("/tokens", get(list_tokens))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn quote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> impl IntoResponse {
    let amount_in: u128 = match request.amount_in.parse() {
        Ok(v) => v,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(QuoteResponse::failure("amount_in must be a non-negative integer")),
            )
        }
    };
    let max_hops = request.max_hops.unwrap_or(APP_CONFIG.max_hops);

    let pairs = match state.store.get_token_graph(&state.token_graph_version).await {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::error!(error = %e, "failed to load token graph");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(QuoteResponse::failure(e.to_string())));
        }
    };
    let graph = TokenGraph::from_pairs(&pairs);

    match find_best_route(
        state.store.as_ref(),
        &graph,
        &request.input_token,
        &request.output_token,
        amount_in,
        max_hops,
    )
    .await
    {
        Ok(route) => (StatusCode::OK, Json(route.into())),
        Err(QuoteError::StoreFailure(e)) => {
            tracing::error!(error = %e, "state store failure while computing route");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(QuoteResponse::failure(e.to_string())))
        }
        Err(QuoteError::InvalidRequest(msg)) => (StatusCode::BAD_REQUEST, Json(QuoteResponse::failure(msg))),
        Err(other) => (StatusCode::OK, Json(QuoteResponse::failure(other.to_string()))),
    }
}

async fn list_pools(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.get_token_graph(&state.token_graph_version).await {
        Ok(pairs) => {
            let mut pool_ids: Vec<String> = pairs.values().flatten().cloned().collect();
            pool_ids.sort();
            pool_ids.dedup();
            (StatusCode::OK, Json(pool_ids))
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(vec![e.to_string()])),
    }
}

async fn list_tokens(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.get_token_graph(&state.token_graph_version).await {
        Ok(pairs) => {
            let mut tokens: Vec<String> = pairs
                .keys()
                .filter_map(|k| k.split_once("->"))
                .flat_map(|(a, b)| [a.to_string(), b.to_string()])
                .collect();
            tokens.sort();
            tokens.dedup();
            (StatusCode::OK, Json(tokens))
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(vec![e.to_string()])),
    }
}

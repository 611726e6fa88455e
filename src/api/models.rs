//! Wire types for the HTTP surface. Amounts are serialized as strings:
//! `serde_json` numbers cannot round-trip `u128` precisely, and on-chain
//! router inputs are bignums in practice regardless.

use serde::{Deserialize, Serialize};

use crate::types::{ExecutionStep, RouteQuote};

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub input_token: String,
    pub output_token: String,
    pub amount_in: String,
    #[serde(default)]
    pub max_hops: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_path: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_path: Option<Vec<ExecutionStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_rate_avg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_impact_bps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RouteQuote> for QuoteResponse {
    fn from(route: RouteQuote) -> Self {
        Self {
            success: true,
            amount_in: Some(route.amount_in.to_string()),
            amount_out: Some(route.amount_out.to_string()),
            route_path: Some(route.route_path),
            execution_path: Some(route.execution_path),
            total_fee: Some(route.total_fee.to_string()),
            fee_rate_avg: Some(route.fee_rate_avg.to_string()),
            price_impact_bps: Some(route.price_impact_bps),
            error: None,
        }
    }
}

impl QuoteResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            amount_in: None,
            amount_out: None,
            route_path: None,
            execution_path: None,
            total_fee: None,
            fee_rate_avg: None,
            price_impact_bps: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

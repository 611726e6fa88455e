mod models;
mod routes;

pub use models::{HealthResponse, QuoteRequest, QuoteResponse};
pub use routes::{build_router, AppState};

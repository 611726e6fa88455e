use thiserror::Error;

/// Typed failure modes surfaced by the quote engine core.
///
/// `StoreFailure` is the only variant considered fatal to a request; every
/// other variant is either a validation failure on the way in or a
/// "nothing viable was found" outcome and is reported back to the caller
/// as a normal (non-5xx) response.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no route found between the requested tokens")]
    NoRouteFound,

    #[error("no viable quote could be computed for any candidate route")]
    NoViableQuote,

    #[error("pool {0} is unavailable and was dropped from consideration")]
    PoolUnavailable(String),

    #[error("state store failure: {0}")]
    StoreFailure(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, QuoteError>;

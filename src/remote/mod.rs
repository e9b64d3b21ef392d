pub mod generate;
pub mod keys;
pub mod search;

use thiserror::Error;

/// Failure of a remote collaborator call. Every variant degrades to a
/// user-facing message or a local fallback at the call site; none is fatal.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("{0} API key not configured")]
    MissingKey(&'static str),
    #[error("request failed: {0}")]
    Http(String),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("{0}")]
    InvalidInput(String),
}

/// Anything that can produce a motivational quote on demand. The quote cache
/// takes an implementor so tests can swap the remote generator for a stub.
pub trait QuoteSource {
    fn fetch_quote(&self) -> impl std::future::Future<Output = Result<String, RemoteError>>;
}

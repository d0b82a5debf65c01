use thiserror::Error;

/// Failure reported by a [`CandidateProvider`](crate::CandidateProvider).
///
/// "Not found" is not an error: single-item lookups signal it with
/// `Ok(None)` and the pipeline logs and skips.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider backend error: {0}")]
    Backend(String),

    #[error("selection cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("malformed requirement expression: {0}")]
    Parse(String),

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("invalid mode value: {0}")]
    Value(String),

    #[error("no entity is selected")]
    EmptyPool,
}

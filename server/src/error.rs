use crate::store::StoreError;

pub type EngineResult<T> = Result<T, EngineError>;

/// Request-scoped failures of the ranking and rewards engines. Nothing here
/// is fatal to the process; the transport layer owns any retry policy.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Rejected before any store call: unknown sort strategy, non-positive
    /// limit, or a cursor whose shape does not fit the strategy.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A store read or write failed; propagated unchanged, never retried
    /// here.
    #[error("storage unavailable")]
    StorageUnavailable(#[source] anyhow::Error),

    /// The caller's timeout or cancellation fired; mutating operations leave
    /// no partial state behind.
    #[error("request cancelled")]
    Cancelled,

    /// A concurrent claim already consumed the reward events. Benign: the
    /// caller should re-read the (now zero) claimable total.
    #[error("reward events were claimed concurrently")]
    ClaimConflict,
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument(message.into())
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(source) => EngineError::StorageUnavailable(source),
            StoreError::Cancelled => EngineError::Cancelled,
            StoreError::Conflict => EngineError::ClaimConflict,
        }
    }
}

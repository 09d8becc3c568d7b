use thiserror::Error;

/// Failure of one area scan. Always recoverable: the area stays eligible for
/// another attempt on a later viewport change.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery source is not configured: {0}")]
    NotConfigured(String),

    #[error("discovery request failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DiscoveryError {
    pub fn from_source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Box::new(err))
    }
}

//! Enrichment errors.

use thiserror::Error;

use common::AppError;

use super::provider::ProviderKind;

/// Failure of one attribute lookup, or of the enrichment as a whole.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// The request never produced a readable response
    #[error("{provider} lookup failed: {source}")]
    Transport {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status
    #[error("{provider} lookup returned HTTP {status}")]
    Status {
        provider: ProviderKind,
        status: reqwest::StatusCode,
    },

    /// The provider answered with a body that is not the expected JSON
    #[error("{provider} lookup returned malformed JSON: {source}")]
    Decode {
        provider: ProviderKind,
        #[source]
        source: serde_json::Error,
    },

    /// The caller gave up before all lookups finished
    #[error("Enrichment cancelled")]
    Cancelled,
}

impl EnrichError {
    /// Provider that failed, if the failure belongs to one.
    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            EnrichError::Transport { provider, .. }
            | EnrichError::Status { provider, .. }
            | EnrichError::Decode { provider, .. } => Some(*provider),
            EnrichError::Cancelled => None,
        }
    }
}

impl From<EnrichError> for AppError {
    fn from(err: EnrichError) -> Self {
        match err {
            EnrichError::Cancelled => AppError::Cancelled,
            other => AppError::enrichment(other.to_string()),
        }
    }
}

/// Result type alias for enrichment operations
pub type EnrichResult<T> = Result<T, EnrichError>;

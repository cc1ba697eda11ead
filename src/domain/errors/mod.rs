// Domain errors - Error types for the domain layer

use serde::Serialize;
use thiserror::Error;

/// Domain-specific error types shared by every port
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),
    /// Project does not exist in the store
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    /// No inference credential was supplied
    #[error("Inference credential missing: configure an API key before analyzing")]
    CredentialMissing,
    /// The inference service refused the credential
    #[error("Inference credential rejected: {0}")]
    CredentialRejected(String),
    /// The inference call failed
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    /// The inference call returned something that is not a scene list
    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),
    /// The inference call did not answer in time
    #[error("Inference timed out after {0}s")]
    InferenceTimeout(u64),
    /// Chunk payload could not be loaded
    #[error("Chunk payload unavailable: {0}")]
    PayloadUnavailable(String),
    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(String),
    /// A run for the same project is already active
    #[error("Analysis already in progress for project {0}")]
    AnalysisInProgress(String),
    /// Run aborted by the caller
    #[error("Analysis cancelled")]
    Cancelled,
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Whether the caller can fix this by configuring a credential
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            DomainError::CredentialMissing | DomainError::CredentialRejected(_)
        )
    }
}

/// Reason a single chunk contributed no scenes.
///
/// Chunk failures are isolated: they are recorded, never propagated.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ChunkFailure {
    #[error("inference error: {0}")]
    Inference(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("credential rejected: {0}")]
    Unauthorized(String),
    #[error("payload unavailable: {0}")]
    Payload(String),
}

impl ChunkFailure {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ChunkFailure::Unauthorized(_))
    }
}

impl From<DomainError> for ChunkFailure {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::CredentialMissing => ChunkFailure::Unauthorized(error.to_string()),
            DomainError::CredentialRejected(msg) => ChunkFailure::Unauthorized(msg),
            DomainError::MalformedResponse(msg) => ChunkFailure::Malformed(msg),
            DomainError::InferenceTimeout(secs) => ChunkFailure::Timeout(secs),
            DomainError::PayloadUnavailable(msg) => ChunkFailure::Payload(msg),
            other => ChunkFailure::Inference(other.to_string()),
        }
    }
}

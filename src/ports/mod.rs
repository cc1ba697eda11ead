// Ports - Interface definitions (contracts)

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the visual-inference capability
#[async_trait]
pub trait InferencePort: Send + Sync {
    /// Check a credential before any chunk is dispatched.
    ///
    /// Adapters that cannot check up front accept every non-blank value.
    async fn validate_credential(&self, _credential: &Credential) -> Result<(), DomainError> {
        Ok(())
    }

    /// Send one chunk with the instruction contract and return the model's
    /// raw text output. Validation of that text is the caller's job.
    async fn detect_scenes(
        &self,
        credential: &Credential,
        payload: &ChunkPayload,
        instructions: &str,
    ) -> Result<String, DomainError>;
}

/// Port for project persistence
#[async_trait]
pub trait ProjectStorePort: Send + Sync {
    /// Store a new project
    async fn create_project(&self, project: Project) -> Result<(), DomainError>;

    /// Read a project and its scene list
    async fn read_project(&self, id: &ProjectId) -> Result<Project, DomainError>;

    /// Append scenes to the end of the project's list
    async fn append_scenes(&self, id: &ProjectId, scenes: &[Scene]) -> Result<(), DomainError>;

    /// Set status and the stored error message (`None` clears it)
    async fn set_status(
        &self,
        id: &ProjectId,
        status: ProjectStatus,
        error: Option<String>,
    ) -> Result<(), DomainError>;

    /// Drop every scene, ahead of reprocessing
    async fn clear_scenes(&self, id: &ProjectId) -> Result<(), DomainError>;

    /// Replace the whole scene list
    async fn replace_scenes(&self, id: &ProjectId, scenes: Vec<Scene>) -> Result<(), DomainError>;
}

/// Port resolving a chunk's payload reference to encoded media
#[async_trait]
pub trait ChunkSourcePort: Send + Sync {
    async fn load_payload(&self, chunk: &ChunkDescriptor) -> Result<ChunkPayload, DomainError>;
}

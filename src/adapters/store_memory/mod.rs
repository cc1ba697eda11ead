// In-memory project store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Project store backed by a map, for tests and embedding callers
#[derive(Default)]
pub struct MemoryProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: &ProjectId, apply: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Project),
    {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(id)
            .ok_or_else(|| DomainError::ProjectNotFound(id.to_string()))?;
        apply(project);
        Ok(())
    }
}

#[async_trait]
impl ProjectStorePort for MemoryProjectStore {
    async fn create_project(&self, project: Project) -> Result<(), DomainError> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(DomainError::BadArgs(format!(
                "Project already exists: {}",
                project.id
            )));
        }
        projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn read_project(&self, id: &ProjectId) -> Result<Project, DomainError> {
        self.projects
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::ProjectNotFound(id.to_string()))
    }

    async fn append_scenes(&self, id: &ProjectId, scenes: &[Scene]) -> Result<(), DomainError> {
        self.update(id, |project| project.append_scenes(scenes)).await
    }

    async fn set_status(
        &self,
        id: &ProjectId,
        status: ProjectStatus,
        error: Option<String>,
    ) -> Result<(), DomainError> {
        self.update(id, |project| project.set_status(status, error)).await
    }

    async fn clear_scenes(&self, id: &ProjectId) -> Result<(), DomainError> {
        self.update(id, Project::clear_scenes).await
    }

    async fn replace_scenes(&self, id: &ProjectId, scenes: Vec<Scene>) -> Result<(), DomainError> {
        self.update(id, |project| project.replace_scenes(scenes)).await
    }
}

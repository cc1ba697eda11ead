// JSON file project store - one document per project

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Stores each project as `<dir>/<id>.json`.
///
/// Mutations are read-modify-write under one lock, and every write goes
/// through a temp file and rename so readers never see a torn document.
pub struct JsonFileProjectStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileProjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn project_path(&self, id: &ProjectId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_str()))
    }

    async fn load(&self, id: &ProjectId) -> Result<Project, DomainError> {
        let path = self.project_path(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DomainError::ProjectNotFound(id.to_string()));
            }
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            DomainError::Storage(format!("Corrupt project file {}: {}", path.display(), e))
        })
    }

    async fn persist(&self, project: &Project) -> Result<(), DomainError> {
        let content = serde_json::to_vec_pretty(project)
            .map_err(|e| DomainError::Storage(format!("Failed to encode project: {}", e)))?;
        let dir = self.dir.clone();
        let path = self.project_path(&project.id);

        tokio::task::spawn_blocking(move || write_atomically(&dir, &path, &content))
            .await
            .map_err(|e| DomainError::Internal(format!("Store writer panicked: {}", e)))?
    }

    async fn update<F>(&self, id: &ProjectId, apply: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Project),
    {
        let _guard = self.write_lock.lock().await;
        let mut project = self.load(id).await?;
        apply(&mut project);
        self.persist(&project).await
    }
}

fn write_atomically(dir: &Path, path: &Path, content: &[u8]) -> Result<(), DomainError> {
    let storage = |e: std::io::Error| {
        DomainError::Storage(format!("Failed to write {}: {}", path.display(), e))
    };

    std::fs::create_dir_all(dir).map_err(storage)?;
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(storage)?;
    file.write_all(content).map_err(storage)?;
    file.as_file().sync_all().map_err(storage)?;
    file.persist(path).map_err(|e| storage(e.error))?;
    Ok(())
}

#[async_trait]
impl ProjectStorePort for JsonFileProjectStore {
    async fn create_project(&self, project: Project) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(self.project_path(&project.id))
            .await
            .unwrap_or(false)
        {
            return Err(DomainError::BadArgs(format!(
                "Project already exists: {}",
                project.id
            )));
        }
        self.persist(&project).await?;
        tracing::info!(project_id = %project.id, path = %self.dir.display(), "Project created");
        Ok(())
    }

    async fn read_project(&self, id: &ProjectId) -> Result<Project, DomainError> {
        self.load(id).await
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

//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sceneline::adapters::MemoryProjectStore;
use sceneline::app::{AnalysisSettings, AnalyzeInteractor};
use sceneline::domain::model::{
    ChunkDescriptor, ChunkPayload, Credential, PayloadRef, Project, ProjectId,
};
use sceneline::ports::{ChunkSourcePort, InferencePort, ProjectStorePort};
use sceneline::DomainError;

/// Scripted answer for one chunk
#[derive(Clone)]
pub enum Script {
    Reply { delay_ms: u64, text: String },
    Fail(DomainError),
}

/// Inference double answering per payload reference; unscripted chunks
/// return an empty scene list
pub struct ScriptedInference {
    scripts: HashMap<String, Script>,
    reject_credential: bool,
    calls: AtomicUsize,
}

impl ScriptedInference {
    pub fn new(scripts: Vec<(usize, Script)>) -> Self {
        Self {
            scripts: scripts
                .into_iter()
                .map(|(i, s)| (PayloadRef::for_chunk(i).as_str().to_string(), s))
                .collect(),
            reject_credential: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting_credentials() -> Self {
        Self {
            reject_credential: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferencePort for ScriptedInference {
    async fn validate_credential(&self, _credential: &Credential) -> Result<(), DomainError> {
        if self.reject_credential {
            return Err(DomainError::CredentialRejected("key revoked".to_string()));
        }
        Ok(())
    }

    async fn detect_scenes(
        &self,
        _credential: &Credential,
        payload: &ChunkPayload,
        _instructions: &str,
    ) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.scripts.get(payload.reference.as_str()) {
            Some(Script::Reply { delay_ms, text }) => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(text.clone())
            }
            Some(Script::Fail(error)) => Err(error.clone()),
            None => Ok(r#"{"scenes": []}"#.to_string()),
        }
    }
}

/// Chunk source handing out empty payloads
pub struct StaticChunkSource;

#[async_trait]
impl ChunkSourcePort for StaticChunkSource {
    async fn load_payload(&self, chunk: &ChunkDescriptor) -> Result<ChunkPayload, DomainError> {
        Ok(ChunkPayload {
            reference: chunk.payload.clone(),
            bytes: Vec::new(),
            mime_type: "video/mp4".to_string(),
        })
    }
}

/// Model output listing the given chunk-relative scenes
pub fn scenes_json(scenes: &[(&str, &str, &str)]) -> String {
    let items: Vec<serde_json::Value> = scenes
        .iter()
        .map(|(start, end, description)| {
            serde_json::json!({
                "startTime": start,
                "endTime": end,
                "description": description,
            })
        })
        .collect();
    serde_json::json!({ "scenes": items }).to_string()
}

pub fn reply(delay_ms: u64, scenes: &[(&str, &str, &str)]) -> Script {
    Script::Reply {
        delay_ms,
        text: scenes_json(scenes),
    }
}

pub async fn seeded_store(duration: f64) -> (Arc<MemoryProjectStore>, ProjectId) {
    let store = Arc::new(MemoryProjectStore::new());
    let project = Project::new("fixture", duration).expect("valid project");
    let id = project.id.clone();
    store.create_project(project).await.expect("create project");
    (store, id)
}

pub fn interactor(
    store: Arc<MemoryProjectStore>,
    inference: Arc<ScriptedInference>,
    settings: AnalysisSettings,
) -> AnalyzeInteractor {
    AnalyzeInteractor::new(store, inference, Arc::new(StaticChunkSource), settings)
}

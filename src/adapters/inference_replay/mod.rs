// Replay inference adapter - canned responses from disk

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::model::{ChunkPayload, Credential};
use crate::ports::InferencePort;

/// Answers each chunk with `<dir>/<payload ref>.json`, verbatim.
///
/// Lets a run be replayed offline from previously captured model output.
pub struct ReplayInferenceAdapter {
    dir: PathBuf,
}

impl ReplayInferenceAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl InferencePort for ReplayInferenceAdapter {
    async fn detect_scenes(
        &self,
        _credential: &Credential,
        payload: &ChunkPayload,
        _instructions: &str,
    ) -> Result<String, DomainError> {
        let path = self.dir.join(format!("{}.json", payload.reference));
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            DomainError::InferenceFailed(format!("no recorded response at {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PayloadRef;

    fn payload(index: usize) -> ChunkPayload {
        ChunkPayload {
            reference: PayloadRef::for_chunk(index),
            bytes: Vec::new(),
            mime_type: "video/mp4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_replays_recorded_response() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chunk-0001.json"), r#"{"scenes": []}"#).unwrap();
        let adapter = ReplayInferenceAdapter::new(dir.path());
        let credential = Credential::parse(Some("k")).unwrap();

        let text = adapter.detect_scenes(&credential, &payload(1), "").await.unwrap();
        assert_eq!(text, r#"{"scenes": []}"#);

        let missing = adapter.detect_scenes(&credential, &payload(2), "").await;
        assert!(matches!(missing, Err(DomainError::InferenceFailed(_))));
    }
}

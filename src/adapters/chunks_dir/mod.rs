// Directory chunk source - pre-encoded chunk files on disk

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::model::{ChunkDescriptor, ChunkPayload};
use crate::ports::ChunkSourcePort;

/// Resolves a payload reference to `<dir>/<ref>.<ext>`
pub struct DirectoryChunkSource {
    dir: PathBuf,
}

impl DirectoryChunkSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn find(&self, stem: &str) -> Result<PathBuf, DomainError> {
        let unavailable = |reason: String| {
            DomainError::PayloadUnavailable(format!("{} in {}: {}", stem, self.dir.display(), reason))
        };

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let mut candidates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| unavailable(e.to_string()))?
        {
            let path = entry.path();
            if path.file_stem().and_then(|s| s.to_str()) == Some(stem) && path.is_file() {
                candidates.push(path);
            }
        }

        // Directory order is unspecified; keep the choice stable
        candidates.sort();
        candidates
            .into_iter()
            .next()
            .ok_or_else(|| unavailable("no matching file".to_string()))
    }
}

/// MIME type from a media file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("mpeg") | Some("mpg") => "video/mpeg",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl ChunkSourcePort for DirectoryChunkSource {
    async fn load_payload(&self, chunk: &ChunkDescriptor) -> Result<ChunkPayload, DomainError> {
        let path = self.find(chunk.payload.as_str()).await?;
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            DomainError::PayloadUnavailable(format!("Failed to read {}: {}", path.display(), e))
        })?;

        tracing::trace!(chunk = chunk.index, bytes = bytes.len(), path = %path.display(), "Loaded chunk payload");

        Ok(ChunkPayload {
            reference: chunk.payload.clone(),
            bytes,
            mime_type: mime_type_for(&path).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ChunkPlanner;

    #[tokio::test]
    async fn test_loads_matching_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chunk-0000.webm"), b"media").unwrap();
        let source = DirectoryChunkSource::new(dir.path());
        let chunks = ChunkPlanner::plan(300.0, 240.0).unwrap();

        let payload = source.load_payload(&chunks[0]).await.unwrap();
        assert_eq!(payload.bytes, b"media");
        assert_eq!(payload.mime_type, "video/webm");

        let missing = source.load_payload(&chunks[1]).await;
        assert!(matches!(missing, Err(DomainError::PayloadUnavailable(_))));
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("a/chunk.MOV")), "video/quicktime");
        assert_eq!(mime_type_for(Path::new("chunk")), "application/octet-stream");
    }
}

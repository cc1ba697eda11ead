// Domain models - Core types and data structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::errors::{ChunkFailure, DomainError};

/// Stable project identity, safe to use as a file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Generate a fresh random identity
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Parse an identity supplied by a caller
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::BadArgs("Project id cannot be empty".to_string()));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::BadArgs(format!(
                "Project id may only contain letters, digits, '-' and '_': {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a project's analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Uploaded,
    Analyzing,
    Analyzed,
    Error,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Uploaded => "uploaded",
            ProjectStatus::Analyzing => "analyzing",
            ProjectStatus::Analyzed => "analyzed",
            ProjectStatus::Error => "error",
        }
    }

    /// Parse status from string
    pub fn parse(status: &str) -> Result<Self, DomainError> {
        match status.trim().to_lowercase().as_str() {
            "uploaded" => Ok(ProjectStatus::Uploaded),
            "analyzing" => Ok(ProjectStatus::Analyzing),
            "analyzed" => Ok(ProjectStatus::Analyzed),
            "error" => Ok(ProjectStatus::Error),
            other => Err(DomainError::BadArgs(format!(
                "Invalid project status: {}. Valid statuses: uploaded, analyzing, analyzed, error",
                other
            ))),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scene on the project timeline, in absolute seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// 1-based position within the project
    pub sequence: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub description: String,
}

impl Scene {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// A video project and its accumulated timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Total media duration in seconds
    pub duration: f64,
    pub status: ProjectStatus,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub error: Option<String>,
    pub last_modified: DateTime<Utc>,
}

impl Project {
    /// Create a freshly uploaded project
    pub fn new(name: impl Into<String>, duration: f64) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::BadArgs("Project name cannot be empty".to_string()));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Project duration must be a non-negative number of seconds, got {}",
                duration
            )));
        }

        Ok(Self {
            id: ProjectId::generate(),
            name,
            duration,
            status: ProjectStatus::Uploaded,
            scenes: Vec::new(),
            error: None,
            last_modified: Utc::now(),
        })
    }

    /// Replace the generated identity
    pub fn with_id(mut self, id: ProjectId) -> Self {
        self.id = id;
        self
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_analyzing(&self) -> bool {
        self.status == ProjectStatus::Analyzing
    }

    pub fn append_scenes(&mut self, scenes: &[Scene]) {
        self.scenes.extend_from_slice(scenes);
        self.touch();
    }

    pub fn replace_scenes(&mut self, scenes: Vec<Scene>) {
        self.scenes = scenes;
        self.touch();
    }

    pub fn clear_scenes(&mut self) {
        self.scenes.clear();
        self.touch();
    }

    pub fn set_status(&mut self, status: ProjectStatus, error: Option<String>) {
        self.status = status;
        self.error = error;
        self.touch();
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

/// Opaque reference to a chunk's encoded media
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadRef(String);

impl PayloadRef {
    /// Conventional reference for the chunk at `index`
    pub fn for_chunk(index: usize) -> Self {
        Self(format!("chunk-{:04}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One planned time window of the source media
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDescriptor {
    pub index: usize,
    /// Inclusive, seconds
    pub start_offset: f64,
    /// Exclusive, seconds
    pub end_offset: f64,
    pub payload: PayloadRef,
}

impl ChunkDescriptor {
    pub fn duration(&self) -> f64 {
        self.end_offset - self.start_offset
    }
}

/// Encoded media handed to the inference capability
#[derive(Debug, Clone)]
pub struct ChunkPayload {
    pub reference: PayloadRef,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Scene exactly as the inference service reported it, chunk-relative
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScene {
    #[serde(deserialize_with = "time_text")]
    pub start_time: String,
    #[serde(deserialize_with = "time_text")]
    pub end_time: String,
    #[serde(default)]
    pub description: String,
}

impl RawScene {
    pub fn new(
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            description: description.into(),
        }
    }
}

/// Accept `"01:30.000"` as well as bare JSON numbers like `90.5`
fn time_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TimeText {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TimeText::deserialize(deserializer)? {
        TimeText::Text(text) => text,
        TimeText::Number(number) => number.to_string(),
    })
}

/// Result of dispatching one chunk, validated at the dispatch boundary
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkResult {
    pub index: usize,
    pub outcome: Result<Vec<RawScene>, ChunkFailure>,
}

impl ChunkResult {
    pub fn success(index: usize, scenes: Vec<RawScene>) -> Self {
        Self {
            index,
            outcome: Ok(scenes),
        }
    }

    pub fn failure(index: usize, failure: ChunkFailure) -> Self {
        Self {
            index,
            outcome: Err(failure),
        }
    }

    /// Scenes contributed by this chunk; a failed chunk contributes none
    pub fn scenes(&self) -> &[RawScene] {
        match &self.outcome {
            Ok(scenes) => scenes,
            Err(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// How chunks are sent to the inference capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// One call in flight, results reported chunk by chunk
    #[default]
    Sequential,
    /// Every chunk in flight at once, results re-emitted in index order
    Parallel,
}

impl DispatchMode {
    pub fn parse(mode: &str) -> Result<Self, DomainError> {
        match mode.trim().to_lowercase().as_str() {
            "sequential" => Ok(DispatchMode::Sequential),
            "parallel" => Ok(DispatchMode::Parallel),
            other => Err(DomainError::BadArgs(format!(
                "Invalid dispatch mode: {}. Valid modes: sequential, parallel",
                other
            ))),
        }
    }
}

/// Inference credential injected at run start
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Reject absent or blank credentials
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Ok(Self(value.to_string())),
            _ => Err(DomainError::CredentialMissing),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Read-through view served to polling clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub status: ProjectStatus,
    pub progress: u8,
    pub scenes_found: usize,
    pub is_analyzing: bool,
    pub error: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// Outcome of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub project_id: ProjectId,
    pub chunks_total: usize,
    pub chunks_succeeded: usize,
    pub chunks_failed: Vec<FailedChunk>,
    pub scenes_found: usize,
    pub status: ProjectStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedChunk {
    pub index: usize,
    pub failure: ChunkFailure,
}
